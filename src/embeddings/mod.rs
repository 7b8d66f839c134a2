//! Embedding provider seam.
//!
//! The pipeline never talks to an embedding model directly; it goes through
//! [`EmbeddingProvider`], which promises order-preserving, fixed-dimension,
//! unit-normalized vectors. With unit vectors, cosine similarity between any
//! two embeddings reduces to their dot product, which is what the vector
//! index is configured to compute.
//!
//! Two implementations ship with the crate: [`ollama::OllamaEmbedder`] for a
//! real embedding service, and [`MockEmbeddingProvider`] for deterministic,
//! network-free tests and demos.

pub mod ollama;

use async_trait::async_trait;

use crate::types::RagError;

pub use ollama::OllamaEmbedder;

/// Maps text to fixed-dimension dense vectors.
///
/// # Contract
///
/// * One output vector per input text, in input order.
/// * Every vector has exactly [`dimension`](Self::dimension) components and
///   L2 norm 1 (within floating-point tolerance).
/// * Embedding the same text twice yields the same vector; providers are
///   stateless given fixed model weights.
/// * Failure to load or invoke the underlying model surfaces as
///   [`RagError::ModelUnavailable`]; no retrieval or ingestion is possible
///   without embeddings.
///
/// Implementations must be safe to share across concurrent in-flight
/// requests (`Send + Sync`).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed output dimension `D` of this provider.
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts, order-preserving.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}

/// Scales `vector` in place to unit L2 norm. Zero vectors are left as-is.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Deterministic hash-derived embeddings for tests and offline demos.
///
/// Vectors carry no semantic signal, but they honor the full
/// [`EmbeddingProvider`] contract: fixed dimension, unit norm, and
/// bit-identical output for identical input.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = hash_to_vector(text, self.dimension);
                normalize(&mut vector);
                vector
            })
            .collect())
    }
}

fn hash_to_vector(text: &str, dimension: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimension)
        .map(|component| {
            let bits = seed.rotate_left((component % 64) as u32) ^ ((component as u64) << 24);
            (bits as f32) / (u32::MAX as f32)
        })
        .collect()
}
