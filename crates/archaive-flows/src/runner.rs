//! Flow runner
//!
//! Drives one flow invocation end to end: validate typed input, render the
//! prompt, call the model (round-tripping through lookup tools if the model
//! asks for them), then parse and validate the structured response. Each
//! invocation is independent; the runner holds no mutable state.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use archaive_core::{
    ArchError, ArchResult, FlowInput, FlowSpec, Model, ModelRequest, RequestMessage, ToolExecutor,
    ToolInput, ToolOutput, ToolResult, MAX_TOOL_ROUNDS,
};

pub struct FlowRunner {
    model: Arc<dyn Model>,
    tools: Option<Arc<dyn ToolExecutor>>,
}

impl FlowRunner {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self { model, tools: None }
    }

    /// Attach a tool executor; flows that declare tools advertise
    /// everything it lists to the model.
    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutor>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Run a flow: returns the typed output or the first error encountered.
    /// Input validation happens before any model call.
    pub async fn run<I, O>(&self, spec: &FlowSpec, input: &I, with_tools: bool) -> ArchResult<O>
    where
        I: FlowInput,
        O: DeserializeOwned,
    {
        input.validate().map_err(ArchError::fields)?;

        let prompt = spec.prompt.render(&input.prompt_fields());
        debug!(flow = spec.name, prompt_len = prompt.len(), "Running flow");

        let tool_definitions = if with_tools {
            self.tools
                .as_ref()
                .map(|t| t.list_tools())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut request = ModelRequest::from_prompt(prompt)
            .with_system(spec.output_schema.to_system_instructions())
            .with_response_schema(spec.output_schema.to_response_schema());
        if !tool_definitions.is_empty() {
            request = request.with_tools(tool_definitions);
        }

        let response = self.generate_with_tools(spec, request).await?;
        self.parse_output(spec, &response.content)
    }

    /// Call the model, executing requested tool calls until it produces a
    /// final answer. Bounded so a model that never stops calling tools
    /// fails instead of looping.
    async fn generate_with_tools(
        &self,
        spec: &FlowSpec,
        mut request: ModelRequest,
    ) -> ArchResult<archaive_core::ModelResponse> {
        for _ in 0..MAX_TOOL_ROUNDS {
            let response = self.model.generate(&request).await?;
            if !response.wants_tools() {
                return Ok(response);
            }

            let executor = self.tools.as_ref().ok_or_else(|| {
                ArchError::tool("Model requested tool calls but no tools are configured")
            })?;

            let mut outputs = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                debug!(flow = spec.name, tool = %call.name, "Model requested tool call");
                let result = match executor.execute_tool(&call.name, ToolInput::from(call)).await {
                    Ok(result) => result,
                    Err(e) => {
                        // Feed the failure back to the model rather than
                        // aborting the generation
                        warn!(flow = spec.name, tool = %call.name, error = %e, "Tool call failed");
                        ToolResult::error(e.to_string())
                    }
                };
                outputs.push(ToolOutput {
                    call_id: call.id.clone(),
                    name: call.name.clone(),
                    content: result.content,
                });
            }

            request
                .messages
                .push(RequestMessage::assistant_tool_calls(response.tool_calls));
            request.messages.push(RequestMessage::tool_results(outputs));
        }

        Err(ArchError::unavailable(format!(
            "Flow '{}' exceeded {} tool-call rounds without a final answer",
            spec.name, MAX_TOOL_ROUNDS
        )))
    }

    /// Parse the model's text as JSON, validate it against the flow's
    /// output schema, and deserialize into the typed output. Partial or
    /// malformed output fails the call.
    fn parse_output<O: DeserializeOwned>(&self, spec: &FlowSpec, content: &str) -> ArchResult<O> {
        let text = strip_code_fence(content);
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
            ArchError::unavailable(format!(
                "Flow '{}' received non-JSON model output: {}",
                spec.name, e
            ))
        })?;

        spec.output_schema.validate(&value)?;

        serde_json::from_value(value).map_err(|e| {
            ArchError::schema(format!(
                "Flow '{}' output did not match its declared shape: {}",
                spec.name, e
            ))
        })
    }
}

/// Strip a single surrounding ```json fence, which some models emit even
/// when asked for raw JSON
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
