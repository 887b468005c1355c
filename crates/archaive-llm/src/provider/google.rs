//! Google Gemini provider
//!
//! Talks to the `generateContent` REST endpoint of the Generative Language
//! API. Structured output uses the native `responseSchema` when the request
//! carries no tools; Gemini rejects `responseSchema` combined with function
//! declarations, so tool-carrying requests rely on the schema instructions
//! in the system prompt instead.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use archaive_core::{
    ArchError, ArchResult, MessageRole, Model, ModelConfig, ModelProvider, ModelRequest,
    ModelResponse, StopReason, ToolCall,
};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    config: ModelConfig,
    client: reqwest::Client,
    api_key: String,
}

impl GoogleProvider {
    /// Create a provider; the API key comes from the config or the
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment variables.
    pub fn create(config: ModelConfig) -> ArchResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                ArchError::config(
                    "Google provider requires an API key (set GEMINI_API_KEY or pass api_key)",
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArchError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            api_key,
        })
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn build_body(&self, request: &ModelRequest) -> Value {
        let mut contents = Vec::new();
        for message in &request.messages {
            match message.role {
                MessageRole::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{"text": message.content}]
                    }));
                }
                MessageRole::Assistant => {
                    let mut parts = Vec::new();
                    if !message.content.is_empty() {
                        parts.push(json!({"text": message.content}));
                    }
                    for call in message.tool_calls.iter().flatten() {
                        parts.push(json!({
                            "functionCall": {
                                "name": call.name,
                                "args": call.arguments,
                            }
                        }));
                    }
                    contents.push(json!({"role": "model", "parts": parts}));
                }
                MessageRole::Tool => {
                    let parts: Vec<Value> = message
                        .tool_results
                        .iter()
                        .flatten()
                        .map(|result| {
                            json!({
                                "functionResponse": {
                                    "name": result.name,
                                    "response": result.content,
                                }
                            })
                        })
                        .collect();
                    contents.push(json!({"role": "user", "parts": parts}));
                }
            }
        }

        let mut generation_config = json!({
            "temperature": request.temperature.unwrap_or(self.config.temperature),
        });
        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if let Some(schema) = &request.response_schema {
            if request.tools.is_empty() {
                generation_config["responseMimeType"] = json!("application/json");
                generation_config["responseSchema"] = schema.clone();
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }

        if !request.tools.is_empty() {
            let declarations: Vec<Value> = request
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    })
                })
                .collect();
            body["tools"] = json!([{"functionDeclarations": declarations}]);
        }

        body
    }

    fn parse_response(&self, response: GenerateContentResponse) -> ArchResult<ModelResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ArchError::unavailable("Gemini returned no candidates"))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for (i, part) in candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
        {
            if let Some(text) = part.text {
                content.push_str(&text);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall {
                    id: format!("call-{}", i),
                    name: call.name,
                    arguments: call.args.unwrap_or_else(|| json!({})),
                });
            }
        }

        let stop_reason = if !tool_calls.is_empty() {
            StopReason::ToolUse
        } else {
            match candidate.finish_reason.as_deref() {
                Some("STOP") | None => StopReason::EndTurn,
                Some("MAX_TOKENS") => StopReason::MaxTokens,
                Some(other) => {
                    warn!(finish_reason = other, "Unexpected finish reason");
                    StopReason::Other
                }
            }
        };

        Ok(ModelResponse {
            content,
            tool_calls,
            stop_reason,
        })
    }
}

#[async_trait]
impl Model for GoogleProvider {
    async fn generate(&self, request: &ModelRequest) -> ArchResult<ModelResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint(),
            self.config.model,
            self.api_key
        );
        let body = self.build_body(request);

        debug!(model = %self.config.model, tools = request.tools.len(), "Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ArchError::unavailable(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ArchError::unavailable(format!(
                "Gemini returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ArchError::unavailable(format!("Invalid Gemini response: {}", e)))?;

        self.parse_response(parsed)
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::Google
    }
}

// Wire types for the generateContent response

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "functionCall")]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    args: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use archaive_core::{RequestMessage, ToolDefinition, ToolOutput};

    fn test_config() -> ModelConfig {
        ModelConfig::new("gemini-2.0-flash", ModelProvider::Google).with_api_key("test-api-key")
    }

    #[test]
    fn test_body_plain_prompt() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let request = ModelRequest::from_prompt("What is Stripe?");
        let body = provider.build_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What is Stripe?");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_body_native_schema_without_tools() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let request = ModelRequest::from_prompt("q")
            .with_response_schema(json!({"type": "object"}));
        let body = provider.build_body(&request);

        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "object");
    }

    #[test]
    fn test_body_schema_suppressed_with_tools() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let request = ModelRequest::from_prompt("q")
            .with_response_schema(json!({"type": "object"}))
            .with_tools(vec![ToolDefinition {
                name: "get_company_info".to_string(),
                description: "Company lookup".to_string(),
                parameters: json!({"type": "object"}),
            }]);
        let body = provider.build_body(&request);

        assert!(body["generationConfig"].get("responseSchema").is_none());
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "get_company_info"
        );
    }

    #[test]
    fn test_body_tool_round_trip_messages() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let request = ModelRequest {
            messages: vec![
                RequestMessage::user("query"),
                RequestMessage::assistant_tool_calls(vec![ToolCall {
                    id: "call-0".to_string(),
                    name: "search_github".to_string(),
                    arguments: json!({"query": "stripe"}),
                }]),
                RequestMessage::tool_results(vec![ToolOutput {
                    call_id: "call-0".to_string(),
                    name: "search_github".to_string(),
                    content: json!({"results": []}),
                }]),
            ],
            system: None,
            tools: vec![],
            response_schema: None,
            temperature: None,
            max_tokens: None,
        };
        let body = provider.build_body(&request);

        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(
            body["contents"][1]["parts"][0]["functionCall"]["name"],
            "search_github"
        );
        assert_eq!(
            body["contents"][2]["parts"][0]["functionResponse"]["name"],
            "search_github"
        );
    }

    #[test]
    fn test_parse_text_response() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let wire: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"summary\": \"ok\"}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        let response = provider.parse_response(wire).unwrap();
        assert_eq!(response.content, "{\"summary\": \"ok\"}");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert!(!response.wants_tools());
    }

    #[test]
    fn test_parse_function_call_response() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let wire: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{
                    "functionCall": {"name": "get_company_info", "args": {"company_name": "Stripe"}}
                }]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        let response = provider.parse_response(wire).unwrap();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "get_company_info");
        assert_eq!(response.tool_calls[0].arguments["company_name"], "Stripe");
    }

    #[test]
    fn test_parse_empty_candidates_fails() {
        let provider = GoogleProvider::create(test_config()).unwrap();
        let wire: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        let err = provider.parse_response(wire).unwrap_err();
        assert!(err.is_retry_later());
    }

    #[test]
    fn test_custom_endpoint() {
        let config = test_config().with_endpoint("https://custom.googleapis.com/v1beta");
        let provider = GoogleProvider::create(config).unwrap();
        assert_eq!(provider.endpoint(), "https://custom.googleapis.com/v1beta");
    }
}
