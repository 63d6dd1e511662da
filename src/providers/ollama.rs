//! Ollama-backed vision model.
//!
//! Calls `POST {base_url}/api/generate` with the prompt and the image as
//! base64, non-streaming. Retry/backoff is deliberately absent: the engine
//! treats model invocation as a single opaque call and surfaces failures
//! as retryable results.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::traits::VisionModel;
use crate::{BakelensError, Result};

/// Default model tag; any multimodal Ollama model works.
pub const DEFAULT_MODEL: &str = "llava";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Vision model served by an Ollama instance.
pub struct OllamaVision {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaVision {
    /// Create a client for `base_url` (e.g. `http://localhost:11434`)
    /// using the default model.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a specific model tag.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl VisionModel for OllamaVision {
    #[instrument(skip(self, image, prompt), fields(model = %self.model))]
    async fn generate_content(&self, image: &[u8], prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            images: vec![BASE64.encode(image)],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BakelensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(BakelensError::EmptyResponse);
        }
        Ok(parsed.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
