//! Tool catalog — typed descriptors, catalog loading, prompt generation.
//!
//! The catalog is a JSON document with three ordered sections:
//! `mcp_tools`, `api_tools` and `code_tools`. Only API tools carry runtime
//! logic; the other two kinds are kept so the registry can expose them
//! uniformly.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// Parameter types
// =============================================================================

/// Declared type of an API parameter.
///
/// Only `number` and `integer` drive coercion. Type names outside the known
/// set are kept verbatim in `Other` so catalogs using e.g. `"boolean"` load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    #[default]
    String,
    Number,
    Integer,
    Object,
    Other(String),
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Object => "object",
            ParamType::Other(name) => name,
        }
    }
}

impl From<String> for ParamType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => ParamType::String,
            "number" => ParamType::Number,
            "integer" => ParamType::Integer,
            "object" => ParamType::Object,
            _ => ParamType::Other(name),
        }
    }
}

impl From<ParamType> for String {
    fn from(param_type: ParamType) -> Self {
        param_type.as_str().to_string()
    }
}

/// Schema entry for one API parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// HTTP method
// =============================================================================

/// HTTP verbs an API tool may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry parameters as a JSON body; GET and DELETE as a query string.
    pub fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::configuration(format!(
                "Unsupported HTTP method: {}",
                s.to_ascii_uppercase()
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tool descriptors
// =============================================================================

fn default_method() -> String {
    "GET".to_string()
}

/// Declarative description of one REST API tool.
///
/// `method` is kept as written in the catalog; it is parsed when the
/// descriptor is validated so an unsupported verb surfaces as a
/// configuration error for that tool only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Header values of the form `${NAME}` are resolved through the secrets provider.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
}

impl ToolDescriptor {
    pub fn http_method(&self) -> Result<HttpMethod> {
        self.method.parse()
    }

    /// Check the descriptor can be dispatched; returns the parsed method.
    pub fn validate(&self) -> Result<HttpMethod> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Tool '{}' has no endpoint",
                self.name
            )));
        }
        self.http_method()
    }

    /// Names of parameters flagged `required`, in schema order.
    pub fn required_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// MCP service tool. Execution is not implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Tool derived from a code repository. Execution is not implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeToolConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_function: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
}

/// Tool family, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Mcp,
    Api,
    Code,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Mcp => "mcp",
            ToolKind::Api => "api",
            ToolKind::Code => "code",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ToolKind::Mcp => "MCP",
            ToolKind::Api => "API",
            ToolKind::Code => "Code",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Parsed tool catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    #[serde(default)]
    pub mcp_tools: Vec<McpToolConfig>,
    #[serde(default)]
    pub api_tools: Vec<ToolDescriptor>,
    #[serde(default)]
    pub code_tools: Vec<CodeToolConfig>,
}

impl ToolCatalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("Invalid tool catalog: {}", e)))
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(format!(
                    "Tool configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Report catalog problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        let names = self
            .mcp_tools
            .iter()
            .map(|t| (ToolKind::Mcp, t.name.as_str()))
            .chain(self.api_tools.iter().map(|t| (ToolKind::Api, t.name.as_str())))
            .chain(self.code_tools.iter().map(|t| (ToolKind::Code, t.name.as_str())));

        for (kind, name) in names {
            if name.is_empty() {
                errors.push(format!("{} tool with empty name", kind));
            } else if !seen.insert(name) {
                errors.push(format!("Duplicate tool name: {}", name));
            }
        }

        for tool in &self.api_tools {
            if let Err(e) = tool.validate() {
                errors.push(format!("Tool '{}': {}", tool.name, e));
            }
        }

        errors
    }

    /// Total number of tools across all sections.
    pub fn len(&self) -> usize {
        self.mcp_tools.len() + self.api_tools.len() + self.code_tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Formatted tool listing for the tool-selection prompt.
    ///
    /// Sections appear in MCP, API, code order with one running index.
    pub fn tools_description(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();
        let mut idx = 1;

        if !self.mcp_tools.is_empty() {
            blocks.push("\n=== MCP Services ===".to_string());
            for tool in &self.mcp_tools {
                let mut block = entry_header(idx, &tool.name, ToolKind::Mcp, &tool.description);
                if !tool.capabilities.is_empty() {
                    block.push_str(&format!(
                        "   Capabilities: {}\n",
                        tool.capabilities.join(", ")
                    ));
                }
                blocks.push(block);
                idx += 1;
            }
        }

        if !self.api_tools.is_empty() {
            blocks.push("\n=== REST APIs ===".to_string());
            for tool in &self.api_tools {
                let mut block = entry_header(idx, &tool.name, ToolKind::Api, &tool.description);
                let required = tool.required_params();
                if !required.is_empty() {
                    block.push_str(&format!("   Required params: {}\n", required.join(", ")));
                }
                blocks.push(block);
                idx += 1;
            }
        }

        if !self.code_tools.is_empty() {
            blocks.push("\n=== GitHub Code Tools ===".to_string());
            for tool in &self.code_tools {
                blocks.push(entry_header(idx, &tool.name, ToolKind::Code, &tool.description));
                idx += 1;
            }
        }

        blocks.join("\n")
    }
}

fn entry_header(idx: usize, name: &str, kind: ToolKind, description: &str) -> String {
    format!("{}. {} ({})\n   {}\n", idx, name, kind.label(), description)
}

// =============================================================================
// Tests
// =============================================================================
