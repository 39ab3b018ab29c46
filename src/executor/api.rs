//! REST API executor.
//!
//! Orchestrates validation, the response cache, header resolution, parameter
//! preparation and the HTTP call into one `execute` call. `execute` never
//! returns an error: failures become an [`ExecutionResult`] whose message is
//! prefixed with `API request failed` or `Unexpected error`.

use crate::executor::cache::{fingerprint, CacheStore};
use crate::executor::headers::{EnvSecrets, HeaderResolver, SecretsProvider};
use crate::executor::http::HttpInvoker;
use crate::executor::params;
use crate::executor::rate_limiter::RateLimiter;
use crate::executor::{Arguments, ExecutionResult, Executor};
use crate::tools::ToolDescriptor;
use crate::types::{ExecutorConfig, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Successful call outcome, before folding into [`ExecutionResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub value: Value,
    pub from_cache: bool,
}

/// Executor for REST API tools.
#[derive(Debug)]
pub struct ApiExecutor {
    cache: CacheStore,
    headers: HeaderResolver,
    http: HttpInvoker,
    rate_limiter: Option<RateLimiter>,
}

impl ApiExecutor {
    /// Executor resolving header secrets from the process environment.
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        Self::with_secrets(config, Arc::new(EnvSecrets))
    }

    /// Executor with an explicit secrets provider. Creates the cache directory.
    pub fn with_secrets(config: &ExecutorConfig, secrets: Arc<dyn SecretsProvider>) -> Result<Self> {
        let cache = CacheStore::new(&config.cache_dir, config.cache_ttl);
        cache.ensure_dir()?;

        Ok(Self {
            cache,
            headers: HeaderResolver::new(secrets),
            http: HttpInvoker::new(config.request_timeout)?,
            rate_limiter: config.rate_limit.clone().map(RateLimiter::new),
        })
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Run one call, returning the uniform result shape.
    pub async fn execute(&self, descriptor: &ToolDescriptor, arguments: &Arguments) -> ExecutionResult {
        match self.try_execute(descriptor, arguments).await {
            Ok(execution) => ExecutionResult::success(execution.value, execution.from_cache),
            Err(err) => {
                tracing::warn!(tool = %descriptor.name, error = %err, "API tool call failed");
                ExecutionResult::failure(err.to_result_message())
            }
        }
    }

    /// Same pipeline as [`execute`](Self::execute) with typed errors.
    pub async fn try_execute(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &Arguments,
    ) -> Result<Execution> {
        let method = descriptor.validate()?;

        let key = fingerprint(&descriptor.endpoint, arguments);
        if let Some(cached) = self.cache.lookup(&key).await? {
            tracing::debug!(tool = %descriptor.name, fingerprint = %key, "cache hit");
            return Ok(Execution {
                value: cached,
                from_cache: true,
            });
        }
        tracing::debug!(tool = %descriptor.name, fingerprint = %key, "cache miss");

        if let Some(limiter) = &self.rate_limiter {
            limiter.check(&descriptor.name)?;
        }

        let headers = self.headers.resolve(&descriptor.headers);
        let prepared = params::prepare(&descriptor.endpoint, &descriptor.params, arguments);
        let value = self
            .http
            .send(method, &prepared.url, &headers, &prepared.params)
            .await?;

        if let Err(err) = self.cache.store(&key, &value).await {
            tracing::warn!(
                tool = %descriptor.name,
                fingerprint = %key,
                error = %err,
                "failed to write cache entry"
            );
        }

        Ok(Execution {
            value,
            from_cache: false,
        })
    }
}

#[async_trait]
impl Executor for ApiExecutor {
    type Config = ToolDescriptor;

    async fn execute(&self, config: &ToolDescriptor, arguments: &Arguments) -> ExecutionResult {
        ApiExecutor::execute(self, config, arguments).await
    }
}
