//! Per-sender command rate limiting.
//!
//! Uses the `governor` crate's token bucket with one token per configured
//! interval and no burst: a sender gets one command, then must wait the
//! full interval for the next.

use std::time::Duration;

use crate::config::RateLimitConfig;
use dashmap::DashMap;
use governor::{Quota, RateLimiter as GovRateLimiter};
use tokio::time::Instant;
use tracing::debug;

/// Type alias for governor's direct rate limiter.
type DirectRateLimiter = governor::DefaultDirectRateLimiter;

/// Senders tracked before a check forces a prune.
const MAX_ENTRIES: usize = 10_000;

#[derive(Debug)]
struct SenderLimit {
    limiter: DirectRateLimiter,
    last_seen: Instant,
}

/// Thread-safe per-sender command limiter.
///
/// Disabled (every check passes) when the config turns it off or the
/// interval is zero.
#[derive(Debug)]
pub struct RateLimitManager {
    limiters: DashMap<String, SenderLimit>,
    quota: Option<Quota>,
    interval: Duration,
}

impl RateLimitManager {
    pub fn new(config: &RateLimitConfig) -> Self {
        let quota = if config.enabled {
            Quota::with_period(config.interval())
        } else {
            None
        };
        Self {
            limiters: DashMap::new(),
            quota,
            interval: config.interval(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.quota.is_some()
    }

    /// Check whether `sender` may run a command now.
    ///
    /// Returns `true` if allowed, `false` if rate limited.
    pub fn check_command_rate(&self, sender: &str) -> bool {
        let Some(quota) = self.quota else {
            return true;
        };

        if self.limiters.len() >= MAX_ENTRIES {
            self.prune_idle();
        }

        let now = Instant::now();
        let mut entry = self
            .limiters
            .entry(sender.to_owned())
            .or_insert_with(|| SenderLimit {
                limiter: GovRateLimiter::direct(quota),
                last_seen: now,
            });
        entry.last_seen = now;

        let allowed = entry.limiter.check().is_ok();
        if !allowed {
            debug!(sender = %sender, "command rate limit exceeded");
        }
        allowed
    }

    /// Number of senders currently tracked.
    pub fn tracked(&self) -> usize {
        self.limiters.len()
    }

    /// Forget senders idle for a full interval.
    ///
    /// Their buckets have refilled, so a fresh limiter behaves the same.
    pub fn prune_idle(&self) -> usize {
        let before = self.limiters.len();
        let interval = self.interval;
        self.limiters
            .retain(|_, limit| limit.last_seen.elapsed() < interval);
        let pruned = before.saturating_sub(self.limiters.len());
        if pruned > 0 {
            debug!(pruned, remaining = self.limiters.len(), "pruned idle rate limiters");
        }
        pruned
    }

    /// Cleanup old entries to prevent memory growth.
    ///
    /// Called between connections and on month rollover.
    pub fn cleanup(&self) {
        self.prune_idle();
        if self.limiters.len() > MAX_ENTRIES {
            self.limiters.clear();
            debug!("cleared command rate limiters (exceeded {} entries)", MAX_ENTRIES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(interval_secs: u64) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            interval_secs,
        }
    }

    #[test]
    fn test_second_command_within_interval_is_limited() {
        let manager = RateLimitManager::new(&enabled(60));

        assert!(manager.check_command_rate("alice"));
        assert!(!manager.check_command_rate("alice"));
    }

    #[test]
    fn test_senders_are_independent() {
        let manager = RateLimitManager::new(&enabled(60));

        assert!(manager.check_command_rate("alice"));
        assert!(manager.check_command_rate("bob"));
        assert!(!manager.check_command_rate("alice"));
        assert_eq!(manager.tracked(), 2);
    }

    #[test]
    fn test_disabled_always_allows() {
        let manager = RateLimitManager::new(&RateLimitConfig::default());
        assert!(!manager.is_enabled());
        for _ in 0..10 {
            assert!(manager.check_command_rate("alice"));
        }
        assert_eq!(manager.tracked(), 0);
    }

    #[test]
    fn test_zero_interval_disables() {
        let manager = RateLimitManager::new(&enabled(0));
        assert!(!manager.is_enabled());
        assert!(manager.check_command_rate("alice"));
        assert!(manager.check_command_rate("alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_senders_are_pruned() {
        let manager = RateLimitManager::new(&enabled(60));
        assert!(manager.check_command_rate("alice"));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(manager.check_command_rate("bob"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(manager.prune_idle(), 1);
        assert_eq!(manager.tracked(), 1);

        manager.cleanup();
        assert_eq!(manager.tracked(), 1);
        tokio::time::advance(Duration::from_secs(30)).await;
        manager.cleanup();
        assert_eq!(manager.tracked(), 0);
    }
}
