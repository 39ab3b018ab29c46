//! Core types for the tool dispatch layer.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Executor and observability configuration

mod config;
mod errors;

pub use config::{Config, ExecutorConfig, ObservabilityConfig};
pub use errors::{Error, ErrorCategory, Result};
