//! Sliding window rate limiter keyed by client

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::RateLimitSettings;

/// Request budget per client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Whether client keys may come from proxy headers
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            trust_proxy: false,
        }
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, Duration::from_secs(settings.window_secs))
            .with_trust_proxy(settings.trust_proxy)
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the oldest request in the window expires (in seconds)
    pub reset_in_seconds: u64,
}

/// Sliding window rate limiter
///
/// Each client key keeps the timestamps of its admitted requests within the
/// window; rejected requests are not recorded.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    records: RwLock<HashMap<String, VecDeque<Instant>>>,
    cleanup_interval: Duration,
    last_cleanup: RwLock<Instant>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: RwLock::new(HashMap::new()),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: RwLock::new(Instant::now()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Checks the budget for `key` and records the request when admitted
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let window = self.config.window;
        let limit = self.config.max_requests;

        let mut records = self.records.write().await;
        let timestamps = records.entry(key.to_string()).or_default();

        while timestamps
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            timestamps.pop_front();
        }

        let used = u32::try_from(timestamps.len()).unwrap_or(u32::MAX);

        if used >= limit {
            let reset_in_seconds = timestamps
                .front()
                .map(|oldest| {
                    let remaining = window.saturating_sub(now.duration_since(*oldest));
                    remaining.as_secs_f64().ceil() as u64
                })
                .unwrap_or_else(|| window.as_secs());

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit,
                reset_in_seconds,
            };
        }

        timestamps.push_back(now);

        let reset_in_seconds = timestamps
            .front()
            .map(|oldest| window.saturating_sub(now.duration_since(*oldest)).as_secs())
            .unwrap_or_else(|| window.as_secs());

        RateLimitResult {
            allowed: true,
            remaining: limit.saturating_sub(used + 1),
            limit,
            reset_in_seconds,
        }
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if !should_cleanup {
            return;
        }

        *self.last_cleanup.write().await = Instant::now();

        let now = Instant::now();
        let window = self.config.window;

        let mut records = self.records.write().await;
        for timestamps in records.values_mut() {
            timestamps.retain(|t| now.duration_since(*t) < window);
        }
        records.retain(|_, v| !v.is_empty());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig::new(
            max_requests,
            Duration::from_secs(window_secs),
        ))
    }

    #[tokio::test]
    async fn test_allows_first_request() {
        let limiter = RateLimiter::default();

        let result = limiter.check_and_record("10.0.0.1").await;

        assert!(result.allowed);
        assert_eq!(result.remaining, 99);
        assert_eq!(result.limit, 100);
    }

    #[tokio::test]
    async fn test_blocks_over_limit() {
        let limiter = limiter(2, 60);

        assert!(limiter.check_and_record("10.0.0.1").await.allowed);
        assert!(limiter.check_and_record("10.0.0.1").await.allowed);

        let result = limiter.check_and_record("10.0.0.1").await;
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.reset_in_seconds <= 60);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = limiter(1, 60);

        limiter.check_and_record("10.0.0.1").await;

        assert!(limiter.check_and_record("10.0.0.2").await.allowed);
        assert!(!limiter.check_and_record("10.0.0.1").await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = limiter(2, 60);

        limiter.check_and_record("client").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check_and_record("client").await;

        assert!(!limiter.check_and_record("client").await.allowed);

        // The first request leaves the window, the second is still in it
        tokio::time::advance(Duration::from_secs(31)).await;
        let result = limiter.check_and_record("client").await;
        assert!(result.allowed);
        assert_eq!(result.remaining, 0);

        assert!(!limiter.check_and_record("client").await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_in_reports_oldest_expiry() {
        let limiter = limiter(1, 900);

        limiter.check_and_record("client").await;
        tokio::time::advance(Duration::from_secs(100)).await;

        let result = limiter.check_and_record("client").await;
        assert!(!result.allowed);
        assert_eq!(result.reset_in_seconds, 800);
    }

    #[test]
    fn test_config_from_settings() {
        let config = RateLimitConfig::from(&RateLimitSettings::default());

        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window, Duration::from_secs(900));
        assert!(!config.trust_proxy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_idle_keys() {
        let limiter = limiter(1, 60);

        limiter.check_and_record("idle").await;
        tokio::time::advance(Duration::from_secs(301)).await;
        limiter.check_and_record("active").await;

        let records = limiter.records.read().await;
        assert!(!records.contains_key("idle"));
        assert!(records.contains_key("active"));
    }
}
