//! Generation service seam.
//!
//! Answer synthesis talks to the language model through [`Generator`]; the
//! shipped implementation targets an Ollama-compatible `/api/generate`
//! endpoint with non-streaming requests. Token streaming is out of scope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::RagConfig;
use crate::embeddings::ollama::endpoint_url;
use crate::types::RagError;

/// Synchronous request/response text generation.
///
/// Implementations must be safe for concurrent use and must bound each call
/// with a timeout so a hung downstream service cannot occupy a request
/// indefinitely. A timed-out or failed call fails the request; there is no
/// automatic retry.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a completion for `prompt`, returning the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP generation client for an Ollama-style service.
#[derive(Clone)]
pub struct OllamaGenerator {
    client: Client,
    endpoint: Url,
    model: String,
    timeout: Duration,
}

impl OllamaGenerator {
    /// Builds a generator from the shared HTTP client and configuration.
    pub fn new(client: Client, config: &RagConfig) -> Result<Self, RagError> {
        let endpoint = endpoint_url(&config.ollama_base_url, "api/generate")?;
        Ok(Self {
            client,
            endpoint,
            model: config.model_name.clone(),
            timeout: config.generation_timeout,
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|err| {
                RagError::GenerationUnavailable(format!(
                    "cannot reach generation service at {}: {err}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::GenerationUnavailable(format!(
                "generation service returned status {status}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|err| {
            RagError::GenerationUnavailable(format!("undecodable generation response: {err}"))
        })?;
        Ok(body.response)
    }
}
