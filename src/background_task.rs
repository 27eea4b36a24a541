use std::time::Duration;

use tokio::time::interval;

use crate::{limiter::rate_limiter::FixedWindowLimiter, spam::classifier::SpamClassifier};

/// Periodically evicts idle rate-limit counters so the keyed state table
/// does not grow for the lifetime of the process.
pub async fn start_limiter_sweep_task(limiter: FixedWindowLimiter) {
    let mut interval = interval(Duration::from_secs(60));

    loop {
        interval.tick().await;

        let evicted = limiter.sweep();
        if evicted > 0 {
            tracing::info!("Evicted {} idle rate-limit entries", evicted);
        }
    }
}

/// Re-reads the spam patterns file so the screen list can evolve without a
/// redeploy. A failed reload keeps the previous list active.
pub async fn start_pattern_reload_task(
    classifier: SpamClassifier,
    path: String,
    every: Duration,
) {
    let mut interval = interval(every);
    // First tick fires immediately; patterns were already loaded at startup.
    interval.tick().await;

    loop {
        interval.tick().await;

        match classifier.reload_from_file(&path) {
            Ok(count) => tracing::debug!("Reloaded {} spam patterns from {}", count, path),
            Err(e) => tracing::error!("Spam pattern reload failed: {}", e),
        }
    }
}
