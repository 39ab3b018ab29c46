//! Tool registry — binds every catalog entry to the executor of its kind.
//!
//! The tool family is resolved once, at registration; calls by name then go
//! straight to the matching executor.

use crate::executor::{
    ApiExecutor, Arguments, CodeExecutor, ExecutionResult, Executor, McpExecutor,
};
use crate::tools::catalog::{CodeToolConfig, McpToolConfig, ToolCatalog, ToolDescriptor, ToolKind};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Configuration of a registered tool, by family.
#[derive(Debug, Clone)]
pub enum ToolSpec {
    Mcp(McpToolConfig),
    Api(ToolDescriptor),
    Code(CodeToolConfig),
}

impl ToolSpec {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolSpec::Mcp(_) => ToolKind::Mcp,
            ToolSpec::Api(_) => ToolKind::Api,
            ToolSpec::Code(_) => ToolKind::Code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ToolSpec::Mcp(c) => &c.name,
            ToolSpec::Api(c) => &c.name,
            ToolSpec::Code(c) => &c.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ToolSpec::Mcp(c) => &c.description,
            ToolSpec::Api(c) => &c.description,
            ToolSpec::Code(c) => &c.description,
        }
    }
}

/// Summary row for tool listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub description: String,
}

/// Registered tool pool.
#[derive(Debug)]
pub struct ToolRegistry {
    catalog: ToolCatalog,
    tools: Vec<ToolSpec>,
    by_name: HashMap<String, usize>,
    api: ApiExecutor,
    mcp: McpExecutor,
    code: CodeExecutor,
}

impl ToolRegistry {
    /// Register MCP, then API, then code tools in catalog order.
    ///
    /// The first tool registered under a name wins; later duplicates stay
    /// listed but are unreachable by name.
    pub fn new(catalog: ToolCatalog, api: ApiExecutor) -> Self {
        let tools: Vec<ToolSpec> = catalog
            .mcp_tools
            .iter()
            .cloned()
            .map(ToolSpec::Mcp)
            .chain(catalog.api_tools.iter().cloned().map(ToolSpec::Api))
            .chain(catalog.code_tools.iter().cloned().map(ToolSpec::Code))
            .collect();

        let mut by_name = HashMap::with_capacity(tools.len());
        for (idx, spec) in tools.iter().enumerate() {
            match by_name.entry(spec.name().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(
                        tool = spec.name(),
                        kind = %spec.kind(),
                        "duplicate tool name, keeping first registration"
                    );
                }
            }
        }

        tracing::debug!(
            mcp = catalog.mcp_tools.len(),
            api = catalog.api_tools.len(),
            code = catalog.code_tools.len(),
            "tool registry built"
        );

        Self {
            catalog,
            tools,
            by_name,
            api,
            mcp: McpExecutor,
            code: CodeExecutor,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.by_name.get(name).map(|&idx| &self.tools[idx])
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, arguments: &Arguments) -> ExecutionResult {
        let Some(spec) = self.get(name) else {
            return ExecutionResult::failure(format!("Tool '{}' not found in tool pool", name));
        };

        match spec {
            ToolSpec::Mcp(config) => self.mcp.execute(config, arguments).await,
            ToolSpec::Api(descriptor) => self.api.execute(descriptor, arguments).await,
            ToolSpec::Code(config) => self.code.execute(config, arguments).await,
        }
    }

    /// All tools in registration order.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|spec| ToolInfo {
                name: spec.name().to_string(),
                kind: spec.kind(),
                description: spec.description().to_string(),
            })
            .collect()
    }

    /// Prompt text describing every tool, for tool selection.
    pub fn tools_description(&self) -> String {
        self.catalog.tools_description()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::stub::MCP_NOT_IMPLEMENTED;
    use crate::executor::StaticSecrets;
    use crate::types::ExecutorConfig;
    use std::sync::Arc;

    fn registry(dir: &std::path::Path) -> ToolRegistry {
        let catalog = ToolCatalog::from_json_str(
            r#"{
                "code_tools": [{"name": "traffic_model", "description": "Traffic model"}],
                "api_tools": [
                    {"name": "weather", "description": "Weather", "endpoint": "http://127.0.0.1:9/w"},
                    {"name": "github_user", "description": "GitHub", "endpoint": "http://127.0.0.1:9/u/{username}"}
                ],
                "mcp_tools": [{"name": "amap_maps", "description": "Maps"}]
            }"#,
        )
        .unwrap();
        let config = ExecutorConfig {
            cache_dir: dir.to_path_buf(),
            ..ExecutorConfig::default()
        };
        let api = ApiExecutor::with_secrets(&config, Arc::new(StaticSecrets::new())).unwrap();
        ToolRegistry::new(catalog, api)
    }

    #[test]
    fn test_registration_order_and_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let listed: Vec<(String, ToolKind)> = registry
            .list_tools()
            .into_iter()
            .map(|t| (t.name, t.kind))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("amap_maps".to_string(), ToolKind::Mcp),
                ("weather".to_string(), ToolKind::Api),
                ("github_user".to_string(), ToolKind::Api),
                ("traffic_model".to_string(), ToolKind::Code),
            ]
        );
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("github_user").unwrap().kind(), ToolKind::Api);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_tool_info_serializes_type_field() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let value = serde_json::to_value(&registry.list_tools()[0]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "amap_maps", "type": "mcp", "description": "Maps"})
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let result = registry.execute("missing_tool", &Arguments::new()).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Tool 'missing_tool' not found in tool pool")
        );
    }

    #[tokio::test]
    async fn test_dispatch_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let mcp = registry.execute("amap_maps", &Arguments::new()).await;
        assert_eq!(mcp.error.as_deref(), Some(MCP_NOT_IMPLEMENTED));

        let code = registry.execute("traffic_model", &Arguments::new()).await;
        assert!(code.error.unwrap().contains("not implemented"));

        let api = registry.execute("weather", &Arguments::new()).await;
        assert!(api.error.unwrap().starts_with("API request failed: "));
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_first_registration() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ToolCatalog::from_json_str(
            r#"{
                "mcp_tools": [{"name": "dup", "description": "first (mcp)"}],
                "api_tools": [{"name": "dup", "description": "second (api)", "endpoint": "http://127.0.0.1:9/d"}]
            }"#,
        )
        .unwrap();
        let config = ExecutorConfig {
            cache_dir: dir.path().to_path_buf(),
            ..ExecutorConfig::default()
        };
        let api = ApiExecutor::with_secrets(&config, Arc::new(StaticSecrets::new())).unwrap();
        let registry = ToolRegistry::new(catalog, api);

        let spec = registry.get("dup").unwrap();
        assert_eq!(spec.kind(), ToolKind::Mcp);
        assert_eq!(spec.description(), "first (mcp)");
        assert_eq!(registry.len(), 2);

        let result = registry.execute("dup", &Arguments::new()).await;
        assert_eq!(result.error.as_deref(), Some(MCP_NOT_IMPLEMENTED));
    }

    #[test]
    fn test_description_delegates_to_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let text = registry.tools_description();
        assert!(text.contains("1. amap_maps (MCP)"));
        assert!(text.contains("4. traffic_model (Code)"));
    }
}
