//! ragloom: retrieval-augmented generation over an indexed text corpus.
//!
//! ```text
//! Corpus files ──► ingestion::read_corpus ──► Documents
//!                                               │
//!                           chunking::chunk_text┘
//!                                    │
//!                 embeddings::EmbeddingProvider │ (one vector per chunk)
//!                                    │
//!            ingestion::Ingestor ──► stores::VectorStore (batched upserts)
//!
//! Question ──► retrieval::retrieve ──► ranked passages
//!                      │
//!        pipeline::build_prompt ──► generation::Generator
//!                      │
//!          pipeline::RagPipeline::answer ──► Answer + deduplicated sources
//! ```
//!
//! The ingestion flow runs offline as a batch job; the query flow runs per
//! request against the same index. Both share the long-lived clients held by
//! [`pipeline::RagPipeline`], the crate's explicit context object.
//!
//! The embedding model, the vector index, and the generation service are
//! opaque external services behind the [`embeddings::EmbeddingProvider`],
//! [`stores::VectorStore`], and [`generation::Generator`] seams; the shipped
//! implementations speak Ollama-compatible and Pinecone-compatible HTTP.

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod retrieval;
pub mod stores;
pub mod types;

pub use config::{IndexPlacement, RagConfig};
pub use ingestion::{IngestionSummary, Ingestor};
pub use pipeline::{Answer, DEFAULT_TOP_K, RagPipeline, SourceRef};
pub use retrieval::RetrievedPassage;
pub use types::RagError;
