use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolDefinition, ToolOutput};
use crate::ArchResult;

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini (generativelanguage API)
    Google,
    /// Deterministic in-process provider for tests
    Mock,
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::Google => write!(f, "google"),
            ModelProvider::Mock => write!(f, "mock"),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g. "gemini-2.0-flash")
    pub model: String,

    /// Provider backing this model
    pub provider: ModelProvider,

    /// API key; providers fall back to their conventional env var
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom API endpoint (overrides the provider default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl ModelConfig {
    pub fn new(model: impl Into<String>, provider: ModelProvider) -> Self {
        Self {
            model: model.into(),
            provider,
            api_key: None,
            endpoint: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Message role in a model conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    Tool,
}

/// A single message in a model request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: MessageRole,

    pub content: String,

    /// Tool calls the assistant made in this turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Results for tool calls from the previous assistant turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolOutput>>,
}

impl RequestMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: None,
            tool_results: None,
        }
    }

    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: String::new(),
            tool_calls: Some(calls),
            tool_results: None,
        }
    }

    pub fn tool_results(results: Vec<ToolOutput>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: String::new(),
            tool_calls: None,
            tool_results: Some(results),
        }
    }
}

/// A request to a model provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    pub messages: Vec<RequestMessage>,

    /// System instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Tools the model may call during generation
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tools: Vec<ToolDefinition>,

    /// JSON schema the response must conform to, for providers with
    /// native structured-output support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,

    /// Per-request temperature override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Per-request max tokens override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelRequest {
    /// Single-turn request with the given prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![RequestMessage::user(prompt)],
            system: None,
            tools: Vec::new(),
            response_schema: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    Other,
}

/// A response from a model provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated text content
    pub content: String,

    /// Tool calls the model wants executed before it can finish
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tool_calls: Vec<ToolCall>,

    pub stop_reason: StopReason,
}

impl ModelResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            stop_reason: StopReason::EndTurn,
        }
    }

    /// Whether the model is waiting on tool results
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Abstraction over an external generation provider
///
/// A single best-effort `generate` per request: no retry loop, no backoff,
/// no caching. Unreachable providers and uncoercible output surface as
/// `ArchError::ProviderUnavailable`.
#[async_trait]
pub trait Model: Send + Sync {
    /// Send a request and await the complete response
    async fn generate(&self, request: &ModelRequest) -> ArchResult<ModelResponse>;

    /// Provider configuration
    fn config(&self) -> &ModelConfig;

    /// Which provider this model uses
    fn provider(&self) -> ModelProvider;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_prompt() {
        let request = ModelRequest::from_prompt("What is Stripe?");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert!(request.tools.is_empty());
        assert!(request.response_schema.is_none());
    }

    #[test]
    fn test_request_with_schema_and_tools() {
        let request = ModelRequest::from_prompt("query")
            .with_response_schema(json!({"type": "object"}))
            .with_tools(vec![ToolDefinition {
                name: "get_company_info".to_string(),
                description: "Company lookup".to_string(),
                parameters: json!({"type": "object"}),
            }]);
        assert_eq!(request.tools.len(), 1);
        assert!(request.response_schema.is_some());
    }

    #[test]
    fn test_response_wants_tools() {
        let mut response = ModelResponse::text("done");
        assert!(!response.wants_tools());
        response.tool_calls.push(ToolCall {
            id: "1".to_string(),
            name: "search_github".to_string(),
            arguments: json!({"query": "stripe"}),
        });
        assert!(response.wants_tools());
    }

    #[test]
    fn test_config_defaults() {
        let config = ModelConfig::new("gemini-2.0-flash", ModelProvider::Google);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key.is_none());
    }
}
