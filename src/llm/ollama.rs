//! Ollama chat client

use super::{ChatMessage, ChatModel, ModelError};
use crate::config::OllamaSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for Ollama's `/api/chat`
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn from_settings(client: Client, settings: &OllamaSettings) -> Self {
        Self::new(client, settings.base_url.clone())
            .with_timeout(Duration::from_secs_f64(settings.timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_chat(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        };

        debug!("Sending {} chars to {} at {}", prompt.len(), model, self.base_url);

        let response = self
            .client
            .post(self.endpoint_chat())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(self.timeout)
                } else {
                    ModelError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message.content)
    }
}
