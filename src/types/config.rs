//! Configuration structures.
//!
//! Configuration is loaded from environment variables and config files.

use crate::executor::rate_limiter::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API executor configuration.
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Defaults overridden by `URBAN_TOOLS_*` environment variables.
    ///
    /// Unparsable numeric overrides are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("URBAN_TOOLS_CACHE_DIR") {
            if !dir.is_empty() {
                config.executor.cache_dir = PathBuf::from(dir);
            }
        }
        if let Some(secs) = env_secs("URBAN_TOOLS_CACHE_TTL_SECS") {
            config.executor.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("URBAN_TOOLS_TIMEOUT_SECS") {
            config.executor.request_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn env_secs(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// API executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Directory holding one `<fingerprint>.json` file per cached response.
    pub cache_dir: PathBuf,

    /// Maximum age of a cache entry before it is purged on read.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Timeout applied to every upstream request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Per-tool rate limit, disabled when absent.
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./Cache/api"),
            cache_ttl: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(30),
            rate_limit: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
