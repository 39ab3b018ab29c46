//! Tool executors.
//!
//! Every tool family implements [`Executor`] and reports through the same
//! [`ExecutionResult`] shape. Only the API executor does real work; the MCP and
//! code executors answer with a "not implemented" failure.
//!
//! ```text
//!   execute(descriptor, arguments)
//!        │
//!        ▼
//!   validate ──► cache lookup ──hit──► ExecutionResult { from_cache: true }
//!                     │ miss
//!                     ▼
//!   rate limit ─► headers ─► params ─► HTTP ─► cache write ─► ExecutionResult
//! ```

pub mod api;
pub mod cache;
pub mod headers;
pub mod http;
pub mod params;
pub mod rate_limiter;
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use api::{ApiExecutor, Execution};
pub use cache::{fingerprint, CacheStore};
pub use headers::{EnvSecrets, HeaderResolver, SecretsProvider, StaticSecrets};
pub use http::HttpInvoker;
pub use params::{prepare, PreparedRequest};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use stub::{CodeExecutor, McpExecutor};

/// Per-call tool arguments.
pub type Arguments = Map<String, Value>;

/// Uniform outcome of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    #[serde(default)]
    pub from_cache: bool,
}

impl ExecutionResult {
    pub fn success(result: Value, from_cache: bool) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            from_cache,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            from_cache: false,
        }
    }
}

/// Capability shared by all tool families.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Tool configuration this executor understands.
    type Config: Send + Sync;

    /// Run one call. Never fails: errors are folded into the result.
    async fn execute(&self, config: &Self::Config, arguments: &Arguments) -> ExecutionResult;
}
