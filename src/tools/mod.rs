//! Tool infrastructure — catalog, descriptors, registry.
//!
//! The catalog owns tool *metadata*; the registry binds each entry to the
//! executor of its family and dispatches calls by name.

pub mod catalog;
pub mod registry;

pub use catalog::{
    CodeToolConfig, HttpMethod, McpToolConfig, ParamSpec, ParamType, ToolCatalog, ToolDescriptor,
    ToolKind,
};
pub use registry::{ToolInfo, ToolRegistry, ToolSpec};
