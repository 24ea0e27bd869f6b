//! lru_guard - bounded in-process caching and rate limiting
//!
//! Provides an LRU cache bounded by entry count and payload memory, a per-key
//! token bucket limiter, and small helpers around them.

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod tasks;
pub mod units;

pub use cache::{CacheStats, EvictionReason, LruCache};
pub use config::Config;
pub use error::{Error, Result};
pub use limiter::KeyedRateLimiter;
pub use tasks::spawn_limiter_sweep;
pub use units::format_bytes;
