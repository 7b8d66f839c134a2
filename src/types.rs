//! Error taxonomy shared across the pipeline.
//!
//! Every fallible stage maps its failure into one [`RagError`] variant and
//! names the stage in the message, so a single `Display` string at the
//! request boundary is enough to tell what went wrong and where. Nothing in
//! this crate auto-recovers from these errors; the one place the design
//! recovers locally is missing record metadata, which is defaulted at the
//! store-client boundary instead of surfacing here.

use thiserror::Error;

/// Unified error type for ingestion, retrieval, and answer synthesis.
#[derive(Debug, Error)]
pub enum RagError {
    /// Missing or malformed configuration (credential, URL, numeric knob).
    /// Fatal at startup; nothing can be served without it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The embedding service could not be reached or returned an unusable
    /// response. Fatal for any embed-dependent call, on both pipelines.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// The vector index is unreachable, misconfigured, or never became
    /// ready within the deadline.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// The generation service is unreachable or answered with an error
    /// status. The message distinguishes the two cases.
    #[error("generation service unavailable: {0}")]
    GenerationUnavailable(String),

    /// Caller-supplied input rejected before any network call (empty
    /// question, zero `top_k`, non-progressing chunk configuration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem failure while reading the corpus.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
