//! Embedding provider backed by an Ollama-compatible `/api/embed` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{EmbeddingProvider, normalize};
use crate::config::RagConfig;
use crate::types::RagError;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

/// HTTP embedding client for an Ollama-style embedding service.
///
/// The service is treated as opaque: any transport failure, error status, or
/// response that violates the provider contract (wrong count, wrong
/// dimension) is reported as [`RagError::ModelUnavailable`]. Responses are
/// re-normalized locally rather than trusting the service to return unit
/// vectors.
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: Client,
    endpoint: Url,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    /// Builds an embedder from the shared HTTP client and configuration.
    pub fn new(client: Client, config: &RagConfig) -> Result<Self, RagError> {
        let endpoint = endpoint_url(&config.ollama_base_url, "api/embed")?;
        Ok(Self {
            client,
            endpoint,
            model: config.embed_model.clone(),
            dimension: config.embed_dim,
        })
    }
}

pub(crate) fn endpoint_url(base: &Url, path: &str) -> Result<Url, RagError> {
    let mut raw = base.as_str().trim_end_matches('/').to_string();
    raw.push('/');
    raw.push_str(path);
    Url::parse(&raw)
        .map_err(|err| RagError::Configuration(format!("invalid endpoint URL {raw}: {err}")))
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|err| {
                RagError::ModelUnavailable(format!(
                    "cannot reach embedding endpoint {}: {err}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::ModelUnavailable(format!(
                "embedding request failed with status {status}"
            )));
        }

        let body: EmbedResponse = response.json().await.map_err(|err| {
            RagError::ModelUnavailable(format!("undecodable embedding response: {err}"))
        })?;

        if body.embeddings.len() != texts.len() {
            return Err(RagError::ModelUnavailable(format!(
                "embedding count mismatch: sent {} texts, got {} vectors",
                texts.len(),
                body.embeddings.len()
            )));
        }

        let mut vectors = body.embeddings;
        for vector in &mut vectors {
            if vector.len() != self.dimension {
                return Err(RagError::ModelUnavailable(format!(
                    "embedding dimension mismatch: expected {}, got {}",
                    self.dimension,
                    vector.len()
                )));
            }
            normalize(vector);
        }
        Ok(vectors)
    }
}
