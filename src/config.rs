//! Environment-backed configuration for the pipeline.
//!
//! All knobs are plain public fields so tests and embedders of this crate can
//! construct a [`RagConfig`] directly; [`RagConfig::from_env`] is the
//! convenience path used by the binaries. `.env` files are honored via
//! `dotenvy` before the process environment is consulted.

use std::time::Duration;

use url::Url;

use crate::types::RagError;

/// Serverless placement of the vector index, parsed from strings like
/// `us-east-1-aws` (region `us-east-1`, cloud `aws`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexPlacement {
    pub region: String,
    pub cloud: String,
}

impl IndexPlacement {
    /// Parses a combined `region-cloud` environment string.
    ///
    /// Four or more dash-separated parts are read as a three-part region
    /// followed by the cloud (`us-east-1-aws`); exactly two parts are read as
    /// `region-cloud`; anything else falls back to `us-east-1` / `aws`.
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() >= 4 {
            Self {
                region: parts[0..3].join("-"),
                cloud: parts[3].to_string(),
            }
        } else if parts.len() == 2 {
            Self {
                region: parts[0].to_string(),
                cloud: parts[1].to_string(),
            }
        } else {
            Self {
                region: "us-east-1".to_string(),
                cloud: "aws".to_string(),
            }
        }
    }
}

/// Configuration surface consumed by the pipeline components.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Vector store credential. Optional here; required (and checked) when a
    /// store connection is actually opened.
    pub api_key: Option<String>,
    /// Name of the vector index collection.
    pub index_name: String,
    /// Serverless placement used when the index has to be created.
    pub placement: IndexPlacement,
    /// Vector store control-plane base address.
    pub control_url: Url,
    /// Embedding dimension `D`; every vector written or queried has exactly
    /// this many components.
    pub embed_dim: usize,
    /// Embedding model identifier on the embedding service.
    pub embed_model: String,
    /// Base address shared by the embedding and generation endpoints.
    pub ollama_base_url: Url,
    /// Generation model identifier.
    pub model_name: String,
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunk windows, in characters.
    pub chunk_overlap: usize,
    /// Maximum records per upsert call.
    pub upsert_batch: usize,
    /// Bound on a single generation request.
    pub generation_timeout: Duration,
    /// Deadline for a freshly created index to report ready.
    pub index_ready_timeout: Duration,
}

impl RagConfig {
    pub const DEFAULT_INDEX_NAME: &'static str = "ragloom-knowledge";
    pub const DEFAULT_CONTROL_URL: &'static str = "https://api.pinecone.io";
    pub const DEFAULT_OLLAMA_BASE_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_EMBED_MODEL: &'static str = "all-minilm";
    pub const DEFAULT_MODEL_NAME: &'static str = "llama3.1:8b";
    pub const DEFAULT_EMBED_DIM: usize = 384;
    pub const DEFAULT_CHUNK_SIZE: usize = 800;
    pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
    pub const DEFAULT_UPSERT_BATCH: usize = 100;

    /// Loads configuration from the process environment (after `dotenvy`).
    ///
    /// Unset variables take their documented defaults; set-but-unparseable
    /// values are a [`RagError::Configuration`] rather than a silent
    /// fallback.
    pub fn from_env() -> Result<Self, RagError> {
        dotenvy::dotenv().ok();

        let placement = IndexPlacement::parse(
            &env_or("PINECONE_ENV", "us-east-1-aws"),
        );

        Ok(Self {
            api_key: std::env::var("PINECONE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            index_name: env_or("PINECONE_INDEX", Self::DEFAULT_INDEX_NAME),
            placement,
            control_url: parse_url("PINECONE_CONTROL_URL", Self::DEFAULT_CONTROL_URL)?,
            embed_dim: parse_number("EMBED_DIM", Self::DEFAULT_EMBED_DIM)?,
            embed_model: env_or("EMBED_MODEL", Self::DEFAULT_EMBED_MODEL),
            ollama_base_url: parse_url("OLLAMA_BASE_URL", Self::DEFAULT_OLLAMA_BASE_URL)?,
            model_name: env_or("MODEL_NAME", Self::DEFAULT_MODEL_NAME),
            chunk_size: parse_number("CHUNK_SIZE", Self::DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: parse_number("CHUNK_OVERLAP", Self::DEFAULT_CHUNK_OVERLAP)?,
            upsert_batch: parse_number("UPSERT_BATCH", Self::DEFAULT_UPSERT_BATCH)?,
            generation_timeout: Duration::from_secs(parse_number(
                "GENERATION_TIMEOUT_SECS",
                60,
            )?),
            index_ready_timeout: Duration::from_secs(parse_number(
                "INDEX_READY_TIMEOUT_SECS",
                120,
            )?),
        })
    }

    /// Returns the store credential or fails with a startup error.
    pub fn require_api_key(&self) -> Result<&str, RagError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| RagError::Configuration("PINECONE_API_KEY not set".to_string()))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, default: &str) -> Result<Url, RagError> {
    let raw = env_or(key, default);
    Url::parse(&raw)
        .map_err(|err| RagError::Configuration(format!("{key} is not a valid URL ({raw}): {err}")))
}

fn parse_number<T>(key: &str, default: T) -> Result<T, RagError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| RagError::Configuration(format!("{key} is not a number ({raw}): {err}"))),
        Err(_) => Ok(default),
    }
}
