//! OpenAI-compatible client: Chat Completions with a single user message.
//!
//! Works against api.openai.com and against anything that speaks the same
//! protocol (vLLM, LiteLLM, LM Studio); only the endpoint and key differ.

use super::transformer::{TextTransformer, TransformerConfig};
use crate::error::TransformError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Text transformer backed by an OpenAI-compatible Chat Completions API.
pub struct OpenAiTransformer {
    config: TransformerConfig,
    http: reqwest::Client,
}

impl OpenAiTransformer {
    /// Build a client for the given endpoint, model, and optional API key.
    pub fn new(config: TransformerConfig) -> Result<Self, TransformError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.endpoint)
    }
}

#[async_trait]
impl TextTransformer for OpenAiTransformer {
    async fn transform(&self, prompt: &str) -> Result<String, TransformError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.config.model, "sending chat completion request");

        let mut builder = self.http.post(self.completions_url()).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransformError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransformError::InvalidResponse(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TransformError::InvalidResponse("no choices in response".into()))?;

        Ok(choice.message.content)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
