//! Rate limiting for upstream API calls.
//!
//! Sliding window limiter keyed by tool name. Consulted only on cache misses,
//! so cached answers never count against a tool's budget.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::types::{Error, Result};

/// Rate limit window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            requests_per_hour: 1000,
            burst_size: 10,
        }
    }
}

/// Sliding window for tracking requests.
#[derive(Debug)]
struct SlidingWindow {
    timestamps: VecDeque<DateTime<Utc>>,
}

impl SlidingWindow {
    fn new() -> Self {
        Self {
            timestamps: VecDeque::new(),
        }
    }

    /// Check if request is allowed under rate limits.
    fn check_and_record(&mut self, config: &RateLimitConfig, now: DateTime<Utc>) -> Result<()> {
        // Remove timestamps outside the hour window
        let hour_ago = now - Duration::hours(1);
        while let Some(&ts) = self.timestamps.front() {
            if ts < hour_ago {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() >= config.requests_per_hour as usize {
            return Err(Error::rate_limited(format!(
                "{} requests per hour",
                config.requests_per_hour
            )));
        }

        let minute_ago = now - Duration::minutes(1);
        if self.count_since(minute_ago) >= config.requests_per_minute as usize {
            return Err(Error::rate_limited(format!(
                "{} requests per minute",
                config.requests_per_minute
            )));
        }

        let ten_seconds_ago = now - Duration::seconds(10);
        if self.count_since(ten_seconds_ago) >= config.burst_size as usize {
            return Err(Error::rate_limited(format!(
                "burst of {} requests per 10 seconds",
                config.burst_size
            )));
        }

        self.timestamps.push_back(now);
        Ok(())
    }

    fn count_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.timestamps.iter().filter(|&&ts| ts >= cutoff).count()
    }
}

/// Per-tool rate limiter.
///
/// Interior mutability so a shared executor can check limits through `&self`.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, SlidingWindow>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check the limit for a tool and record the request if allowed.
    pub fn check(&self, tool: &str) -> Result<()> {
        self.check_at(tool, Utc::now())
    }

    fn check_at(&self, tool: &str, now: DateTime<Utc>) -> Result<()> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| Error::internal("rate limiter lock poisoned"))?;
        windows
            .entry(tool.to_string())
            .or_insert_with(SlidingWindow::new)
            .check_and_record(&self.config, now)
    }

    /// Requests recorded for a tool in the last minute.
    pub fn current_rate(&self, tool: &str) -> usize {
        let minute_ago = Utc::now() - Duration::minutes(1);
        self.windows
            .lock()
            .map(|windows| {
                windows
                    .get(tool)
                    .map_or(0, |window| window.count_since(minute_ago))
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(per_minute: u32, per_hour: u32, burst: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests_per_minute: per_minute,
            requests_per_hour: per_hour,
            burst_size: burst,
        })
    }

    #[test]
    fn test_burst_limit() {
        let limiter = limiter(100, 1000, 3);
        let now = Utc::now();
        for _ in 0..3 {
            limiter.check_at("weather", now).unwrap();
        }
        let err = limiter.check_at("weather", now).unwrap_err();
        assert!(matches!(err, Error::RateLimited(_)));
        assert!(err.to_string().contains("burst"));

        // Burst window has passed.
        limiter.check_at("weather", now + Duration::seconds(11)).unwrap();
    }

    #[test]
    fn test_minute_limit() {
        let limiter = limiter(2, 1000, 100);
        let now = Utc::now();
        limiter.check_at("weather", now).unwrap();
        limiter.check_at("weather", now + Duration::seconds(20)).unwrap();
        let err = limiter.check_at("weather", now + Duration::seconds(40)).unwrap_err();
        assert!(err.to_string().contains("per minute"));

        limiter.check_at("weather", now + Duration::seconds(61)).unwrap();
    }

    #[test]
    fn test_hour_limit_and_expiry() {
        let limiter = limiter(100, 2, 100);
        let now = Utc::now();
        limiter.check_at("weather", now).unwrap();
        limiter.check_at("weather", now + Duration::minutes(5)).unwrap();
        let err = limiter.check_at("weather", now + Duration::minutes(10)).unwrap_err();
        assert!(err.to_string().contains("per hour"));

        limiter
            .check_at("weather", now + Duration::minutes(61))
            .unwrap();
    }

    #[test]
    fn test_tools_are_independent() {
        let limiter = limiter(1, 1000, 100);
        limiter.check("weather").unwrap();
        assert!(limiter.check("weather").is_err());
        limiter.check("github_user").unwrap();

        assert_eq!(limiter.current_rate("weather"), 1);
        assert_eq!(limiter.current_rate("unknown"), 0);
    }
}
