//! Limiter Sweep Task
//!
//! Background task that periodically drops idle rate limiter buckets so the
//! key map does not grow with every client ever seen.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::Clock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::limiter::KeyedRateLimiter;

/// Spawns a background task that forgets idle limiter keys.
///
/// The task sleeps for `interval_secs` between runs and never exits on its
/// own; abort the returned handle on shutdown.
///
/// # Example
/// ```ignore
/// let limiter = Arc::new(KeyedRateLimiter::<String>::new(10)?);
/// let sweep = spawn_limiter_sweep(limiter.clone(), 60);
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_limiter_sweep<K, C>(
    limiter: Arc<KeyedRateLimiter<K, C>>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting limiter sweep task with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let removed = limiter.forget_idle();
            if removed > 0 {
                info!("Limiter sweep: forgot {} idle keys", removed);
            } else {
                debug!("Limiter sweep: no idle keys");
            }
        }
    })
}
