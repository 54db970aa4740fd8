//! Core LLM client types and trait definitions

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{McpOpsError, Result};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Completion that asks the model for a JSON object and parses it.
    async fn complete_json(&self, request: ChatRequest) -> Result<Value> {
        let request = request.with_response_format(ResponseFormat::JsonObject);
        let response = self.complete(request).await?;
        serde_json::from_str(&response.content)
            .map_err(|e| McpOpsError::Llm(format!("Model returned invalid JSON: {}", e)))
    }

    /// Model identifier used for requests without an explicit override
    fn model(&self) -> &str;

    /// Whether the client has credentials and can make calls
    fn is_ready(&self) -> bool;
}

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// System prompt
    pub system: String,

    /// Single user message (these pipelines never hold a conversation)
    pub user: String,

    /// Per-request model override
    pub model: Option<String>,

    /// Per-request max_tokens override
    pub max_tokens: Option<u32>,

    /// Per-request sampling temperature
    pub temperature: Option<f32>,

    /// Structured output constraint
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a request with the given system prompt
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Set the user message
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Override the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override max_tokens for this request
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Constrain the response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Response format constraint passed through to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `response_format: {"type": "json_object"}`
    JsonObject,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Text content of the first choice
    pub content: String,

    /// Token usage for this call
    pub usage: Usage,
}

/// Token usage for cost tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl Usage {
    /// Create a usage record
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Accumulate another usage record into this one
    pub fn add(&mut self, other: &Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// Canned-response client for tests
#[derive(Debug)]
pub struct MockLlmClient {
    responses: Vec<String>,
    calls: std::sync::atomic::AtomicUsize,
    fail: bool,
}

impl MockLlmClient {
    /// Mock that returns the same response for every call
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_responses(vec![response.into()])
    }

    /// Mock that returns the given responses in call order, repeating the
    /// last one once exhausted
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            calls: std::sync::atomic::AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Mock that fails every call
    pub fn failing() -> Self {
        Self {
            responses: Vec::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
            fail: true,
        }
    }

    /// Number of completed calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        if self.fail {
            return Err(McpOpsError::Llm("mock failure".to_string()));
        }
        let index = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let content = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default();
        Ok(ChatResponse {
            content,
            usage: Usage::new(1, 1),
        })
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        !self.fail
    }
}
