//! LLM Client Layer - OpenAI chat-completions integration
//!
//! This module provides:
//! - Request/response types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod openai;

pub use client::{ChatRequest, ChatResponse, LlmClient, MockLlmClient, ResponseFormat, Usage};
pub use openai::{OpenAiClient, OpenAiConfig};
