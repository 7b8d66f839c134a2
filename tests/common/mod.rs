//! Shared fixtures: an in-memory vector store double and config builders.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use ragloom::config::{IndexPlacement, RagConfig};
use ragloom::embeddings::EmbeddingProvider;
use ragloom::stores::{IndexRecord, QueryMatch, VectorStore};
use ragloom::types::RagError;

/// Brute-force cosine-scan store double. With unit vectors everywhere, the
/// dot product is the cosine similarity, which mirrors the real index's
/// metric.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<IndexRecord>>,
    upsert_sizes: Mutex<Vec<usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn records(&self) -> Vec<IndexRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Sizes of the upsert batches received, in call order.
    pub fn upsert_sizes(&self) -> Vec<usize> {
        self.upsert_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), RagError> {
        self.upsert_sizes.lock().unwrap().push(records.len());
        self.records.lock().unwrap().extend(records);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>, RagError> {
        let records = self.records.lock().unwrap();
        let mut scored: Vec<QueryMatch> = records
            .iter()
            .map(|record| QueryMatch {
                id: record.id.clone(),
                score: dot(&record.values, vector),
                metadata: record.metadata.clone(),
            })
            .collect();
        // Stable sort keeps insertion order for ties, like a store's native
        // tie-breaking order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Embedding provider wrapper that counts calls, for asserting that
/// rejected inputs never reach the network.
pub struct CountingEmbedder<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CountingEmbedder<P> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.inner.embed(texts).await
    }
}

/// A config pointing every service at `base_url`, with small test knobs.
pub fn test_config(base_url: &str, embed_dim: usize) -> RagConfig {
    RagConfig {
        api_key: Some("test-key".to_string()),
        index_name: "test-index".to_string(),
        placement: IndexPlacement::parse("us-east-1-aws"),
        control_url: Url::parse(base_url).unwrap(),
        embed_dim,
        embed_model: "all-minilm".to_string(),
        ollama_base_url: Url::parse(base_url).unwrap(),
        model_name: "test-model".to_string(),
        chunk_size: 32,
        chunk_overlap: 4,
        upsert_batch: 100,
        generation_timeout: Duration::from_secs(5),
        index_ready_timeout: Duration::from_secs(2),
    }
}
