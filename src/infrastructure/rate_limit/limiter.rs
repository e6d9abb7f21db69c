//! Fixed-window rate limiter
//!
//! Counts requests per opaque key inside a fixed window. Once a window has
//! elapsed the counter starts over; there is no sliding carry-over.
//!
//! State is process-local. Several instances behind a load balancer each
//! enforce their own budget.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::{Clock, RateLimitConfig, SystemClock};

/// How often `check` sweeps elapsed windows out of the map
const PURGE_INTERVAL_SECS: i64 = 300;

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the current window ends
    pub reset_in: Duration,
}

impl RateLimitDecision {
    /// Whole seconds to advertise in a `Retry-After` header, at least 1
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_in.as_secs();
        if self.reset_in.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_started_at: DateTime<Utc>,
}

/// Per-key fixed-window counter
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, WindowState>,
    clock: Arc<dyn Clock>,
    last_purge: Mutex<DateTime<Utc>>,
}

impl FixedWindowRateLimiter {
    /// Create a limiter on the system clock
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a limiter with an injected clock
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            config,
            windows: DashMap::new(),
            clock,
            last_purge: Mutex::new(now),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request for `key` and report whether it must be rejected
    pub fn is_rate_limited(&self, key: &str) -> bool {
        !self.check(key).allowed
    }

    /// Count a request for `key` and return the full decision
    ///
    /// The read-modify-write happens under the map's per-shard write lock,
    /// so concurrent bursts on one key never exceed `max_requests`.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        self.maybe_purge(now);

        let limit = self.config.max_requests;
        let window = self.config.window();

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(WindowState {
                count: 0,
                window_started_at: now,
            });
        let state = entry.value_mut();

        if state.count == 0 || now - state.window_started_at >= window {
            *state = WindowState {
                count: 0,
                window_started_at: now,
            };
        }

        let allowed = state.count < limit;
        if allowed {
            state.count += 1;
        }

        let decision = RateLimitDecision {
            allowed,
            remaining: limit.saturating_sub(state.count),
            limit,
            reset_in: remaining_in_window(window_end(state.window_started_at, window), now),
        };
        drop(entry);

        if allowed {
            debug!(key, remaining = decision.remaining, "Request admitted");
        } else {
            warn!(
                key,
                limit,
                reset_in_ms = decision.reset_in.as_millis() as u64,
                "Rate limit exceeded"
            );
        }

        decision
    }

    /// Requests left for `key` in its current, possibly fresh, window
    pub fn remaining_requests(&self, key: &str) -> u32 {
        let now = self.clock.now();

        match self.windows.get(key) {
            Some(state) if !self.has_elapsed(&state, now) => {
                self.config.max_requests.saturating_sub(state.count)
            }
            _ => self.config.max_requests,
        }
    }

    /// End of the current window for `key`, if one is open
    pub fn reset_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.clock.now();

        self.windows
            .get(key)
            .filter(|state| !self.has_elapsed(state, now))
            .map(|state| window_end(state.window_started_at, self.config.window()))
    }

    /// Forget all state for `key`
    pub fn reset(&self, key: &str) {
        self.windows.remove(key);
    }

    /// Drop every elapsed window; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        let window = self.config.window();

        self.windows
            .retain(|_, state| now - state.window_started_at < window);
        *self.last_purge.lock() = now;

        before.saturating_sub(self.windows.len())
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    fn has_elapsed(&self, state: &WindowState, now: DateTime<Utc>) -> bool {
        now - state.window_started_at >= self.config.window()
    }

    fn maybe_purge(&self, now: DateTime<Utc>) {
        let due = {
            let last = self.last_purge.lock();
            now - *last >= chrono::Duration::seconds(PURGE_INTERVAL_SECS)
        };

        if due {
            let removed = self.purge_expired();
            debug!(removed, "Purged elapsed rate limit windows");
        }
    }
}

fn window_end(started_at: DateTime<Utc>, window: chrono::Duration) -> DateTime<Utc> {
    started_at
        .checked_add_signed(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn remaining_in_window(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (ends_at - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;

    fn limiter(max_requests: u32) -> (FixedWindowRateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let limiter = FixedWindowRateLimiter::with_clock(
            RateLimitConfig::new(60_000, max_requests),
            clock.clone(),
        );
        (limiter, clock)
    }

    #[test]
    fn test_unvalidated_huge_window_does_not_overflow() {
        let clock = Arc::new(ManualClock::starting_now());
        let limiter =
            FixedWindowRateLimiter::with_clock(RateLimitConfig::new(u64::MAX, 1), clock.clone());

        let decision = limiter.check("k");
        assert!(decision.allowed);
        assert_eq!(decision.reset_in, Duration::from_secs(86_400));
        assert!(limiter.is_rate_limited("k"));
        assert_eq!(
            limiter.reset_at("k"),
            Some(clock.now() + chrono::Duration::days(1))
        );
    }

    #[test]
    fn test_sixth_request_is_limited_until_window_elapses() {
        let (limiter, clock) = limiter(5);

        for _ in 0..5 {
            assert!(!limiter.is_rate_limited("203.0.113.7"));
        }
        assert!(limiter.is_rate_limited("203.0.113.7"));
        assert!(limiter.is_rate_limited("203.0.113.7"));

        clock.advance(chrono::Duration::milliseconds(60_001));
        assert!(!limiter.is_rate_limited("203.0.113.7"));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let (limiter, clock) = limiter(1);

        assert!(!limiter.is_rate_limited("k"));
        clock.advance(chrono::Duration::milliseconds(59_999));
        assert!(limiter.is_rate_limited("k"));

        clock.advance(chrono::Duration::milliseconds(1));
        assert!(!limiter.is_rate_limited("k"));
    }

    #[test]
    fn test_remaining_requests() {
        let (limiter, clock) = limiter(5);

        assert_eq!(limiter.remaining_requests("fresh"), 5);

        limiter.is_rate_limited("k");
        limiter.is_rate_limited("k");
        assert_eq!(limiter.remaining_requests("k"), 3);

        for _ in 0..10 {
            limiter.is_rate_limited("k");
        }
        assert_eq!(limiter.remaining_requests("k"), 0);

        clock.advance(chrono::Duration::seconds(61));
        assert_eq!(limiter.remaining_requests("k"), 5);
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _) = limiter(1);

        assert!(!limiter.is_rate_limited("a"));
        assert!(limiter.is_rate_limited("a"));
        assert!(!limiter.is_rate_limited("b"));
    }

    #[test]
    fn test_check_reports_retry_hint() {
        let (limiter, clock) = limiter(2);

        let first = limiter.check("k");
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.limit, 2);
        assert_eq!(first.reset_in, Duration::from_secs(60));

        limiter.check("k");
        clock.advance(chrono::Duration::seconds(20));

        let rejected = limiter.check("k");
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.reset_in, Duration::from_secs(40));
        assert_eq!(rejected.retry_after_secs(), 40);
    }

    #[test]
    fn test_reset_at_and_reset() {
        let (limiter, clock) = limiter(1);
        let start = clock.now();

        assert_eq!(limiter.reset_at("k"), None);

        limiter.is_rate_limited("k");
        assert_eq!(
            limiter.reset_at("k"),
            Some(start + chrono::Duration::seconds(60))
        );

        limiter.reset("k");
        assert_eq!(limiter.reset_at("k"), None);
        assert!(!limiter.is_rate_limited("k"));
    }

    #[test]
    fn test_purge_expired() {
        let (limiter, clock) = limiter(5);

        limiter.is_rate_limited("old");
        clock.advance(chrono::Duration::seconds(30));
        limiter.is_rate_limited("recent");
        clock.advance(chrono::Duration::seconds(31));

        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.remaining_requests("recent"), 4);
    }

    #[test]
    fn test_opportunistic_purge() {
        let (limiter, clock) = limiter(5);

        limiter.is_rate_limited("stale");
        clock.advance(chrono::Duration::seconds(PURGE_INTERVAL_SECS));
        limiter.is_rate_limited("new");

        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_concurrent_burst_never_exceeds_limit() {
        let (limiter, _) = limiter(50);
        let admitted = std::sync::atomic::AtomicU32::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        if !limiter.is_rate_limited("burst") {
                            admitted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.into_inner(), 50);
        assert_eq!(limiter.remaining_requests("burst"), 0);
    }
}
