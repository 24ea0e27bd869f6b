//! Keyed Rate Limiter
//!
//! One token bucket per key (client address, user id, ...). Buckets are
//! created full on first sight and refill at a fixed rate.

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroU32;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::trace;

use crate::error::{Error, Result};

// == Keyed Rate Limiter ==
/// Per-key token bucket limiter. `C` is the time source, wall clock by default.
pub struct KeyedRateLimiter<K = String, C = DefaultClock>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    inner: RateLimiter<K, DefaultKeyedStateStore<K>, C, NoOpMiddleware<C::Instant>>,
    burst: NonZeroU32,
    per_second: NonZeroU32,
}

impl<K> KeyedRateLimiter<K>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a limiter refilling one token per second with `burst` capacity.
    pub fn new(burst: u32) -> Result<Self> {
        Self::with_rate(1, burst)
    }

    /// Creates a limiter refilling `per_second` tokens per second with `burst` capacity.
    pub fn with_rate(per_second: u32, burst: u32) -> Result<Self> {
        Self::with_clock(per_second, burst, DefaultClock::default())
    }
}

impl<K, C> KeyedRateLimiter<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(per_second: u32, burst: u32, clock: C) -> Result<Self> {
        let per_second = NonZeroU32::new(per_second)
            .ok_or_else(|| Error::InvalidQuota("refill rate must be positive".to_string()))?;
        let burst = NonZeroU32::new(burst)
            .ok_or_else(|| Error::InvalidQuota("burst must be positive".to_string()))?;

        let quota = Quota::per_second(per_second).allow_burst(burst);
        Ok(Self {
            inner: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock),
            burst,
            per_second,
        })
    }

    // == Allow ==
    /// Takes one token from `key`'s bucket. Returns false when the bucket is empty.
    pub fn allow(&self, key: &K) -> bool {
        let allowed = self.inner.check_key(key).is_ok();
        if !allowed {
            trace!("rate limit reached for key");
        }
        allowed
    }

    // == Idle Keys ==
    /// Number of keys currently holding bucket state.
    pub fn tracked_keys(&self) -> usize {
        self.inner.len()
    }

    /// Drops buckets that have refilled completely and returns how many went away.
    pub fn forget_idle(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain_recent();
        before.saturating_sub(self.inner.len())
    }

    pub fn burst(&self) -> u32 {
        self.burst.get()
    }

    pub fn per_second(&self) -> u32 {
        self.per_second.get()
    }
}

impl<K, C> fmt::Debug for KeyedRateLimiter<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedRateLimiter")
            .field("burst", &self.burst)
            .field("per_second", &self.per_second)
            .field("tracked_keys", &self.tracked_keys())
            .finish()
    }
}
