use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{ArchError, ArchResult};

/// Tool definition advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (e.g. "get_company_info")
    pub name: String,

    /// What the tool does, phrased for the model
    pub description: String,

    /// JSON schema for the tool's arguments
    pub parameters: Value,
}

/// A tool invocation requested by the model mid-generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier (synthesized when absent)
    pub id: String,

    pub name: String,

    /// Arguments as a JSON object
    pub arguments: Value,
}

/// The result of a tool call, sent back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub call_id: String,

    pub name: String,

    pub content: Value,
}

/// Arguments passed to a tool execution
#[derive(Debug, Clone)]
pub struct ToolInput {
    args: Value,
}

impl ToolInput {
    pub fn new(args: Value) -> Self {
        Self { args }
    }

    /// Extract a typed argument by name
    pub fn get_arg<T: DeserializeOwned>(&self, name: &str) -> ArchResult<T> {
        let value = self
            .args
            .get(name)
            .ok_or_else(|| ArchError::tool(format!("Missing argument: {}", name)))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ArchError::tool(format!("Invalid argument '{}': {}", name, e)))
    }

    /// Raw argument object
    pub fn args(&self) -> &Value {
        &self.args
    }
}

impl From<&ToolCall> for ToolInput {
    fn from(call: &ToolCall) -> Self {
        Self::new(call.arguments.clone())
    }
}

/// Result of executing a tool
///
/// Lookup misses are successful results carrying a not-found payload;
/// `success: false` is reserved for malformed invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Value,

    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl ToolResult {
    pub fn ok(content: Value) -> Self {
        Self {
            content,
            success: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: serde_json::json!({ "error": message.into() }),
            success: false,
        }
    }
}

/// A callable tool exposed to the model during generation
#[async_trait]
pub trait Tool: Send + Sync {
    /// Definition advertised to the model
    fn definition(&self) -> ToolDefinition;

    /// Execute with the given arguments
    async fn execute(&self, input: ToolInput) -> ArchResult<ToolResult>;
}

/// Dispatches tool calls by name during a generation round trip
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute_tool(&self, name: &str, input: ToolInput) -> ArchResult<ToolResult>;

    fn list_tools(&self) -> Vec<ToolDefinition>;

    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_arg_typed() {
        let input = ToolInput::new(json!({"company_name": "Stripe", "limit": 4}));
        let name: String = input.get_arg("company_name").unwrap();
        let limit: u32 = input.get_arg("limit").unwrap();
        assert_eq!(name, "Stripe");
        assert_eq!(limit, 4);
    }

    #[test]
    fn test_get_arg_missing() {
        let input = ToolInput::new(json!({}));
        let result: ArchResult<String> = input.get_arg("query");
        assert!(result.is_err());
    }

    #[test]
    fn test_get_arg_wrong_type() {
        let input = ToolInput::new(json!({"query": 42}));
        let result: ArchResult<String> = input.get_arg("query");
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_input_from_call() {
        let call = ToolCall {
            id: "call-0".to_string(),
            name: "search_github".to_string(),
            arguments: json!({"query": "stripe"}),
        };
        let input = ToolInput::from(&call);
        let query: String = input.get_arg("query").unwrap();
        assert_eq!(query, "stripe");
    }
}
