//! Executors for tool families without a runtime yet.
//!
//! Both answer every call with a failed [`ExecutionResult`] so callers keep a
//! single result contract across tool kinds.

use crate::executor::{Arguments, ExecutionResult, Executor};
use crate::tools::{CodeToolConfig, McpToolConfig};
use async_trait::async_trait;

pub const MCP_NOT_IMPLEMENTED: &str =
    "MCP executor is coming soon. This feature will be available in a future release.";

pub const CODE_NOT_IMPLEMENTED: &str =
    "Code tool execution failed: code-to-tool conversion is not implemented";

/// MCP service executor (not implemented).
#[derive(Debug, Default, Clone, Copy)]
pub struct McpExecutor;

#[async_trait]
impl Executor for McpExecutor {
    type Config = McpToolConfig;

    async fn execute(&self, config: &McpToolConfig, _arguments: &Arguments) -> ExecutionResult {
        tracing::debug!(tool = %config.name, "MCP tool call rejected: executor not implemented");
        ExecutionResult::failure(MCP_NOT_IMPLEMENTED)
    }
}

/// Repository-derived tool executor (not implemented).
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeExecutor;

#[async_trait]
impl Executor for CodeExecutor {
    type Config = CodeToolConfig;

    async fn execute(&self, config: &CodeToolConfig, _arguments: &Arguments) -> ExecutionResult {
        tracing::debug!(tool = %config.name, "code tool call rejected: executor not implemented");
        ExecutionResult::failure(CODE_NOT_IMPLEMENTED)
    }
}
