//! lru_guard demo driver
//!
//! Builds a cache and limiter from the environment, pushes a synthetic
//! workload through them and prints the resulting cache statistics as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_guard::{format_bytes, spawn_limiter_sweep, Config, KeyedRateLimiter, LruCache};

const CLIENTS: usize = 8;
const REQUESTS: usize = 2_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_guard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: max_entries={}, max_memory={}, burst={}, rate={}/s, sweep={}s",
        config.max_entries,
        format_bytes(config.max_memory),
        config.limiter_burst,
        config.limiter_rate,
        config.sweep_interval
    );

    let cache = LruCache::from_config(&config).on_evicted(|key, payload, reason| {
        debug!(key, size = %format_bytes(payload.len() as u64), %reason, "entry left cache");
    });
    let limiter = Arc::new(
        KeyedRateLimiter::<String>::with_rate(config.limiter_rate, config.limiter_burst)
            .context("failed to build rate limiter")?,
    );
    let sweep = spawn_limiter_sweep(limiter.clone(), config.sweep_interval);

    let mut throttled = 0usize;
    for i in 0..REQUESTS {
        let client = format!("client-{}", i % CLIENTS);
        if !limiter.allow(&client) {
            throttled += 1;
            continue;
        }
        let key = format!("object-{}", i % 512);
        if cache.get(&key).is_none() {
            cache.add(key, vec![0u8; 1024 + (i % 7) * 512]);
        }
    }

    let stats = cache.stats();
    info!(
        "Workload done: {} requests, {} throttled, {} entries, {} in use, hit rate {:.1}%",
        REQUESTS,
        throttled,
        stats.total_entries,
        format_bytes(stats.memory_bytes),
        stats.hit_rate() * 100.0
    );

    println!("{}", serde_json::to_string_pretty(&stats)?);

    sweep.abort();
    info!("Shutdown complete");
    Ok(())
}
