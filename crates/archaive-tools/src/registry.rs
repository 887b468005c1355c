//! Tool Registry - registration and discovery for built-in tools
//!
//! The registry organizes tools by name and converts into a
//! `ToolExecutor` for the flow runner to dispatch model tool calls.

use archaive_core::{ArchError, ArchResult, Tool, ToolDefinition, ToolExecutor, ToolInput, ToolResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tool registry for managing available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.definition().name;
        info!(tool = %name, "Registering tool");
        self.tools.insert(name, Arc::new(tool));
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool names
    pub fn list_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// List tool definitions
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Get tool count
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Convert registry into a tool executor
    pub fn into_executor(self) -> BuiltinToolExecutor {
        BuiltinToolExecutor { tools: self.tools }
    }

    /// Create executor reference without consuming registry
    pub fn as_executor(&self) -> BuiltinToolExecutor {
        BuiltinToolExecutor {
            tools: self.tools.clone(),
        }
    }
}

/// Built-in tool executor that wraps the registry
pub struct BuiltinToolExecutor {
    tools: HashMap<String, Arc<dyn Tool>>,
}

#[async_trait]
impl ToolExecutor for BuiltinToolExecutor {
    async fn execute_tool(&self, name: &str, input: ToolInput) -> ArchResult<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ArchError::tool(format!("Tool not found: {}", name)))?;

        debug!(tool = %name, "Executing built-in tool");
        match tool.execute(input).await {
            Ok(result) => {
                debug!(tool = %name, success = %result.success, "Tool execution complete");
                Ok(result)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                Err(e)
            }
        }
    }

    fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::company::CompanyInfoTool;
    use crate::tools::github::GitHubSearchTool;
    use serde_json::json;

    #[test]
    fn test_register_and_list() {
        let mut registry = ToolRegistry::new();
        registry.register(CompanyInfoTool::new());
        registry.register(GitHubSearchTool::new());

        assert_eq!(registry.len(), 2);
        let mut names = registry.list_names();
        names.sort();
        assert_eq!(names, vec!["get_company_info", "search_github"]);
    }

    #[tokio::test]
    async fn test_executor_dispatches_by_name() {
        let executor = crate::default_registry().into_executor();
        let result = executor
            .execute_tool(
                "get_company_info",
                ToolInput::new(json!({"company_name": "stripe"})),
            )
            .await
            .unwrap();
        assert_eq!(result.content["name"], "Stripe");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error() {
        let executor = ToolRegistry::new().into_executor();
        let err = executor
            .execute_tool("nonexistent", ToolInput::new(json!({})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Tool not found"));
    }

    #[test]
    fn test_definitions_carry_parameter_schemas() {
        let registry = crate::default_registry();
        let defs = registry.list_definitions();
        let github = defs.iter().find(|d| d.name == "search_github").unwrap();
        assert_eq!(github.parameters["required"][0], "query");
    }
}
