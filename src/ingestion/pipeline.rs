//! Chunk → embed → batched upsert.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use super::corpus::read_corpus;
use crate::chunking::chunk_text;
use crate::embeddings::EmbeddingProvider;
use crate::stores::{IndexRecord, RecordMetadata, VectorStore};
use crate::types::RagError;

/// What an ingestion run accomplished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub documents_read: usize,
    pub chunks_written: usize,
}

/// Batch ingestion job over a corpus directory.
///
/// Shares the embedding provider and vector store with the query-time
/// pipeline; holds no per-run state, so a single `Ingestor` can be reused
/// across runs.
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunk_size: usize,
    chunk_overlap: usize,
    batch_size: usize,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        chunk_size: usize,
        chunk_overlap: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            chunk_size,
            chunk_overlap,
            batch_size: batch_size.max(1),
        }
    }

    /// Reads the corpus under `root`, chunks and embeds every document, and
    /// writes the records to the vector index in bounded batches.
    ///
    /// An empty corpus is an informational no-op, not an error. Each record
    /// gets a fresh UUID v4 id; see the module docs for what that means for
    /// re-runs.
    pub async fn ingest(&self, root: &Path) -> Result<IngestionSummary, RagError> {
        let documents = read_corpus(root).await?;
        if documents.is_empty() {
            tracing::info!(root = %root.display(), "no corpus documents found; nothing to ingest");
            return Ok(IngestionSummary::default());
        }

        let mut batch: Vec<IndexRecord> = Vec::with_capacity(self.batch_size);
        let mut chunks_written = 0usize;

        for document in &documents {
            let chunks = chunk_text(&document.text, self.chunk_size, self.chunk_overlap)?;
            if chunks.is_empty() {
                continue;
            }
            let vectors = self.embedder.embed(&chunks).await?;
            tracing::debug!(
                source = %document.source,
                chunks = chunks.len(),
                "embedded document"
            );

            for (chunk, vector) in chunks.into_iter().zip(vectors) {
                batch.push(IndexRecord {
                    id: Uuid::new_v4().to_string(),
                    values: vector,
                    metadata: RecordMetadata {
                        text: chunk,
                        source: document.source.clone(),
                    },
                });
                chunks_written += 1;
                if batch.len() >= self.batch_size {
                    self.store.upsert(std::mem::take(&mut batch)).await?;
                }
            }
        }

        if !batch.is_empty() {
            self.store.upsert(batch).await?;
        }

        let summary = IngestionSummary {
            documents_read: documents.len(),
            chunks_written,
        };
        tracing::info!(
            documents = summary.documents_read,
            chunks = summary.chunks_written,
            "ingestion complete"
        );
        Ok(summary)
    }
}
