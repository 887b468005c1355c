//! Deterministic in-process provider for tests
//!
//! Responses are served from a queue in push order; every request is
//! recorded so tests can assert on rendered prompts, declared tools, and
//! how many model calls a flow made.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use archaive_core::{
    ArchError, ArchResult, Model, ModelConfig, ModelProvider, ModelRequest, ModelResponse,
};

pub struct MockProvider {
    config: ModelConfig,
    responses: Mutex<VecDeque<ArchResult<ModelResponse>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::new("mock-model", ModelProvider::Mock))
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a structured response
    pub fn push_response(&self, response: ModelResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queue a plain text response
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(ModelResponse::text(text));
    }

    /// Queue an error
    pub fn push_error(&self, error: ArchError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }

    /// Number of generate calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Model for MockProvider {
    async fn generate(&self, request: &ModelRequest) -> ArchResult<ModelResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ArchError::unavailable("Mock provider has no queued response")))
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_served_in_order() {
        let provider = MockProvider::new();
        provider.push_text("first");
        provider.push_text("second");

        let request = ModelRequest::from_prompt("hello");
        assert_eq!(provider.generate(&request).await.unwrap().content, "first");
        assert_eq!(provider.generate(&request).await.unwrap().content, "second");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_queue_is_unavailable() {
        let provider = MockProvider::new();
        let err = provider
            .generate(&ModelRequest::from_prompt("hello"))
            .await
            .unwrap_err();
        assert!(err.is_retry_later());
    }

    #[tokio::test]
    async fn test_requests_recorded() {
        let provider = MockProvider::new();
        provider.push_text("ok");
        provider
            .generate(&ModelRequest::from_prompt("recorded prompt"))
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].content, "recorded prompt");
    }
}
