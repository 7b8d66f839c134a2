//! Vector index seam and record types.
//!
//! [`VectorStore`] abstracts over the external vector index so the rest of
//! the pipeline works with one normalized shape, [`QueryMatch`], regardless
//! of what the store's wire format looks like. Adapters (currently
//! [`pinecone::PineconeStore`]) own all response-shape handling; nothing
//! upstream branches on raw JSON.

pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::RagError;

pub use pinecone::PineconeStore;

fn unknown_source() -> String {
    "unknown".to_string()
}

/// Per-record metadata persisted next to each vector.
///
/// Records written by this crate always carry both fields; records read back
/// may not (partial data degradation), so absent fields deserialize to the
/// documented defaults instead of failing the whole retrieval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Chunk text used as grounding context.
    #[serde(default)]
    pub text: String,
    /// Human-readable identifier of the originating document.
    #[serde(default = "unknown_source")]
    pub source: String,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self {
            text: String::new(),
            source: unknown_source(),
        }
    }
}

/// The persisted unit in the vector index.
///
/// `id` is a collision-resistant random identifier (UUID v4), never a
/// counter; ids must stay globally unique across the index so an unrelated
/// record can never be overwritten. Records are created during ingestion,
/// read during retrieval, and never updated in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// One ranked result of a nearest-neighbor query, normalized from the
/// store's native response shape.
#[derive(Clone, Debug, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    /// Similarity score; higher is more relevant.
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

/// Read/write interface of the external vector index.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests and must detect an unreachable or misconfigured store up front
/// ([`RagError::IndexUnavailable`]) rather than mid-operation.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes a batch of records. Callers bound batch sizes themselves
    /// (store-side payload limits); one call forwards one payload.
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), RagError>;

    /// Returns at most `top_k` records ranked by descending similarity.
    /// Ties beyond score ordering are broken by store-native order.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, RagError>;
}
