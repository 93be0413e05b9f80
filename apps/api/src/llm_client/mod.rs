/// LLM Client — the single point of entry for calls to the text-generation service.
///
/// ARCHITECTURAL RULE: No other module may talk to the generation endpoint directly.
///
/// Speaks the Ollama-style `/api/generate` protocol: one non-streamed request,
/// one complete response. No retries; a failure is returned to the caller as-is.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Returned when the service answers without a `response` field.
pub const NO_RESPONSE_FALLBACK: &str = "No response received.";

/// Sampling temperature for every call. Zero keeps reviews reproducible.
const TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// Client for the generation service. Cheap to clone; the inner reqwest client is shared.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.generation_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.generation_url.clone(),
            model: config.generation_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` and waits for the complete generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generation service returned {}: {}", status, body);
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;

        debug!(
            "Generation call succeeded: model={}, prompt_chars={}",
            self.model,
            prompt.len()
        );

        Ok(parsed
            .response
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()))
    }
}
