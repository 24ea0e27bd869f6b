//! Configuration Module
//!
//! Loads cache and limiter settings from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cache entries, 0 = unbounded
    pub max_entries: usize,
    /// Maximum total payload bytes, 0 = unbounded
    pub max_memory: u64,
    /// Token bucket capacity per limiter key
    pub limiter_burst: u32,
    /// Tokens added to each bucket per second
    pub limiter_rate: u32,
    /// Idle limiter key sweep interval in seconds
    pub sweep_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_MAX_MEMORY` - Maximum payload bytes (default: 64 MiB)
    /// - `LIMITER_BURST` - Bucket capacity per key (default: 10)
    /// - `LIMITER_RATE` - Refill tokens per second (default: 1)
    /// - `SWEEP_INTERVAL` - Idle key sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            max_memory: env_or("CACHE_MAX_MEMORY", defaults.max_memory),
            limiter_burst: env_or("LIMITER_BURST", defaults.limiter_burst),
            limiter_rate: env_or("LIMITER_RATE", defaults.limiter_rate),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }

    /// Rejects settings the limiter and sweep task cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.limiter_burst == 0 {
            return Err(Error::InvalidConfig("LIMITER_BURST must be positive".to_string()));
        }
        if self.limiter_rate == 0 {
            return Err(Error::InvalidConfig("LIMITER_RATE must be positive".to_string()));
        }
        if self.sweep_interval == 0 {
            return Err(Error::InvalidConfig("SWEEP_INTERVAL must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_memory: 64 * 1024 * 1024,
            limiter_burst: 10,
            limiter_rate: 1,
            sweep_interval: 60,
        }
    }
}
