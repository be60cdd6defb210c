//! Tool registry and trait definitions
//!
//! Each diagnostic tool is a self-contained module implementing the Tool
//! trait. Tools can be added/removed by editing the tools/ directory and
//! the create_default_registry() function in lib.rs.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use triage_core::ToolDefinition;

#[derive(Clone, Debug)]
pub enum ToolResult {
    Text(String),
    Error(String),
}

impl ToolResult {
    pub fn text(s: impl Into<String>) -> Self { Self::Text(s.into()) }
    pub fn error(s: impl Into<String>) -> Self { Self::Error(s.into()) }

    pub fn to_content_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Error(e) => format!("Error: {}", e),
        }
    }

    pub fn is_error(&self) -> bool { matches!(self, Self::Error(_)) }
}

/// The Tool trait - implement this to add a new diagnostic capability.
///
/// Every tool here is read-only against the cluster. Failures are reported
/// in the result text, not raised: the investigator is expected to read
/// them and adjust its next step.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name (e.g. "k8s_list_pods").
    fn name(&self) -> &str;

    /// Human-readable description sent to the reasoning backend.
    fn description(&self) -> &str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> ToolResult;

    /// Convert to the definition format declared to the reasoning backend.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self { Self::new() }
}

impl ToolRegistry {
    pub fn new() -> Self { Self { tools: HashMap::new() } }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Invoke a tool by name. An unknown name comes back as error text so
    /// the caller can surface it to the investigator instead of failing.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => ToolResult::Error(format!("Tool not found: {}", name)),
        }
    }

    /// Definitions for every registered tool.
    pub fn describe(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}
