//! Language model access
//!
//! A single-turn chat boundary and its Ollama implementation.

mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Failure of the model call
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),
    #[error("model endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected model response: {0}")]
    InvalidResponse(String),
}

/// Anything that can answer a single user message
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as the only user message to `model` and return the reply text
    async fn chat(&self, model: &str, prompt: &str) -> Result<String, ModelError>;
}
