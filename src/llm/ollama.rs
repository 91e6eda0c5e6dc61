//! Ollama client: non-streaming `/api/generate` calls.

use super::transformer::{TextTransformer, TransformerConfig};
use crate::error::TransformError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Text transformer backed by a local or remote Ollama daemon.
pub struct OllamaTransformer {
    config: TransformerConfig,
    http: reqwest::Client,
}

impl OllamaTransformer {
    /// Build a client for the given endpoint and model.
    pub fn new(config: TransformerConfig) -> Result<Self, TransformError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { config, http })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint)
    }
}

#[async_trait]
impl TextTransformer for OllamaTransformer {
    async fn transform(&self, prompt: &str) -> Result<String, TransformError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.config.model, "sending Ollama generate request");

        let response = self
            .http
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransformError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TransformError::InvalidResponse(e.to_string()))?;

        Ok(body.response)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_joins_endpoint() {
        let t = OllamaTransformer::new(TransformerConfig::new(
            "http://localhost:11434",
            "llama3.2",
        ))
        .unwrap();
        assert_eq!(t.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn request_serialises_non_streaming() {
        let req = GenerateRequest {
            model: "llama3.2",
            prompt: "hello",
            stream: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
    }
}
