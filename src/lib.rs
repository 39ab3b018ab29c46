//! # Urban Tools - Tool Dispatch Layer for LLM Agents
//!
//! Executes tools picked from a declarative catalog by an upstream agent:
//! - REST API tools with URL templating, typed parameter coercion and defaults
//! - Header secrets injected from a pluggable secrets provider
//! - File-backed response cache with time-based expiry
//! - Uniform `ExecutionResult` for every tool family (API, MCP, code)
//!
//! ## Architecture
//!
//! ```text
//!                   ┌───────────────────────────────────────┐
//!   registry  ───►  │              ApiExecutor              │
//!   execute(name)   │  ┌──────────┐ ┌──────────┐ ┌────────┐ │
//!                   │  │  Cache   │ │  Header  │ │ Params │ │
//!                   │  │  Store   │ │ Resolver │ │Preparer│ │
//!                   │  └──────────┘ └──────────┘ └────────┘ │
//!                   │  ┌──────────┐ ┌──────────┐            │
//!                   │  │   Rate   │ │   HTTP   │            │
//!                   │  │ Limiter  │ │ Invoker  │            │
//!                   │  └──────────┘ └──────────┘            │
//!                   └───────────────────────────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod executor;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use executor::{ApiExecutor, Arguments, ExecutionResult, Executor};
pub use tools::{ToolCatalog, ToolDescriptor, ToolRegistry};
pub use types::{Config, Error, Result};
