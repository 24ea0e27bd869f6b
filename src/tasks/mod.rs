//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Limiter sweep: forgets rate limiter keys whose buckets have refilled

mod sweep;

pub use sweep::spawn_limiter_sweep;
