use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

/// Quota numbers for one accepted check, used by the HTTP layer for the
/// X-RateLimit-* headers.
#[derive(Debug, Clone, Copy)]
pub struct QuotaSnapshot {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitExceeded {
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

impl From<RateLimitExceeded> for AppError {
    fn from(e: RateLimitExceeded) -> Self {
        AppError::RateLimited {
            limit: e.limit,
            reset_at: e.reset_at,
        }
    }
}

#[derive(Debug)]
struct WindowState {
    tokens_remaining: u32,
    window_start: Instant,
    window_reset_at: DateTime<Utc>,
    last_seen: Instant,
}

impl WindowState {
    fn new(limit: u32, window: Duration) -> Self {
        let now = Instant::now();
        Self {
            tokens_remaining: limit,
            window_start: now,
            window_reset_at: Utc::now() + window,
            last_seen: now,
        }
    }
}

/// Keyed by `(identity, limit)` so one identity can be subject to several
/// policies at once without the counters interfering.
type Key = (String, u32);

/// Fixed-window rate limiter over a concurrent map of per-key states.
/// The check-and-decrement for one key happens under that key's lock, so
/// two in-flight requests can never both consume the last token.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    map: Arc<DashMap<Key, Arc<Mutex<WindowState>>>>,
    entry_ttl: Duration,
}

impl FixedWindowLimiter {
    pub fn new(entry_ttl: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            entry_ttl,
        }
    }

    /// Consume one token for `identity` under the given policy. State is
    /// created lazily on first sight of a key and the window restarts once
    /// `window` has elapsed. A rejected call consumes nothing; the counter
    /// never goes below zero.
    pub fn check(
        &self,
        identity: &str,
        limit: u32,
        window: Duration,
    ) -> Result<QuotaSnapshot, RateLimitExceeded> {
        let state = self.get_state(identity, limit, window);
        let mut s = state.lock();

        let now = Instant::now();
        s.last_seen = now;

        if now.duration_since(s.window_start) >= window {
            s.tokens_remaining = limit;
            s.window_start = now;
            s.window_reset_at = Utc::now() + window;
        }

        if s.tokens_remaining == 0 {
            return Err(RateLimitExceeded {
                limit,
                reset_at: s.window_reset_at,
            });
        }

        s.tokens_remaining -= 1;
        Ok(QuotaSnapshot {
            limit,
            remaining: s.tokens_remaining,
            reset_at: s.window_reset_at,
        })
    }

    fn get_state(&self, identity: &str, limit: u32, window: Duration) -> Arc<Mutex<WindowState>> {
        let key = (identity.to_string(), limit);
        if let Some(existing) = self.map.get(&key) {
            existing.clone()
        } else {
            let state = Arc::new(Mutex::new(WindowState::new(limit, window)));
            match self.map.entry(key) {
                dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(state.clone());
                    state
                }
            }
        }
    }

    /// Drop entries not seen within the TTL. Called periodically from the
    /// background sweep task; without it stale keys accumulate for the
    /// lifetime of the process.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let ttl = self.entry_ttl;
        let keys_to_remove: Vec<Key> = self
            .map
            .iter()
            .filter_map(|entry| {
                let s = entry.value().lock();
                if now.duration_since(s.last_seen) > ttl {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect();

        let evicted = keys_to_remove.len();
        for k in keys_to_remove {
            self.map.remove(&k);
        }
        evicted
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}
