//! Limiter Module
//!
//! Per-key token bucket rate limiting.

mod keyed;

pub use keyed::KeyedRateLimiter;
