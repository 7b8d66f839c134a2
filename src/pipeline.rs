//! The query-time pipeline: shared clients, prompt assembly, and answer
//! synthesis.
//!
//! [`RagPipeline`] is the explicit context object holding the process-wide
//! clients (embedding provider, vector store, generation service). It is
//! built once at startup, cloned or shared freely (`Send + Sync`, all state
//! behind `Arc`), and released explicitly at shutdown. Each `answer` call is
//! logically sequential (embed, search, generate) and keeps all per-request
//! state on its own stack, so any number of calls may be in flight
//! concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::config::RagConfig;
use crate::embeddings::{EmbeddingProvider, OllamaEmbedder};
use crate::generation::{Generator, OllamaGenerator};
use crate::ingestion::Ingestor;
use crate::retrieval::{RetrievedPassage, retrieve};
use crate::stores::{PineconeStore, VectorStore};
use crate::types::RagError;

/// Default number of passages retrieved per question at the request
/// boundary.
pub const DEFAULT_TOP_K: usize = 4;

/// Instruction prefixed to every grounded prompt.
const SYSTEM_INSTRUCTION: &str = "You are a concise knowledge assistant. Answer the user's \
    question using the provided context. If the answer is not in the context, say you don't \
    know. Cite sources as [source] at the end.";

/// Separator between passages in the assembled context block.
const PASSAGE_DELIMITER: &str = "\n---\n";

/// One distinct contributing document and the score of its best-ranked
/// passage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceRef {
    pub source: String,
    pub score: f32,
}

/// A generated answer plus the deduplicated list of contributing sources.
#[derive(Clone, Debug, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Long-lived pipeline context over the three external services.
#[derive(Clone)]
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn Generator>,
    chunk_size: usize,
    chunk_overlap: usize,
    upsert_batch: usize,
}

impl RagPipeline {
    /// Connects the real service clients from configuration: one shared
    /// `reqwest::Client`, an Ollama embedder and generator on top of it, and
    /// the vector index (created and awaited if absent).
    pub async fn connect(config: &RagConfig) -> Result<Self, RagError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|err| RagError::Configuration(format!("cannot build HTTP client: {err}")))?;

        let embedder = OllamaEmbedder::new(client.clone(), config)?;
        let store = PineconeStore::connect(config, client.clone()).await?;
        let generator = OllamaGenerator::new(client, config)?;

        Ok(Self::new(
            Arc::new(embedder),
            Arc::new(store),
            Arc::new(generator),
            config,
        ))
    }

    /// Assembles a pipeline from already-built components. Tests and
    /// embedders of this crate use this with their own providers.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
        config: &RagConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            upsert_batch: config.upsert_batch,
        }
    }

    /// An ingestion job sharing this pipeline's embedder and store.
    pub fn ingestor(&self) -> Ingestor {
        Ingestor::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.store),
            self.chunk_size,
            self.chunk_overlap,
            self.upsert_batch,
        )
    }

    /// Returns the `top_k` most relevant passages for `question`.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RagError> {
        retrieve(self.embedder.as_ref(), self.store.as_ref(), question, top_k).await
    }

    /// Answers `question` grounded in the `top_k` retrieved passages.
    ///
    /// Empty or whitespace-only questions and a zero `top_k` are rejected
    /// with [`RagError::InvalidInput`] before any network call. Retrieval
    /// and generation failures propagate as-is; no partial answer is ever
    /// returned.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<Answer, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let passages = self.retrieve(question, top_k).await?;
        tracing::debug!(passages = passages.len(), "retrieved grounding context");

        let prompt = build_prompt(question, &passages);
        let raw = self.generator.generate(&prompt).await?;

        Ok(Answer {
            answer: raw.trim().to_string(),
            sources: dedup_sources(&passages),
        })
    }

    /// [`answer`](Self::answer) with the request-boundary default
    /// `top_k` of [`DEFAULT_TOP_K`].
    pub async fn answer_with_defaults(&self, question: &str) -> Result<Answer, RagError> {
        self.answer(question, DEFAULT_TOP_K).await
    }

    /// Releases the shared clients.
    ///
    /// Consumes the pipeline; any clones keep their shared handles alive
    /// until they are dropped too. Connections held by the HTTP client are
    /// closed when the last handle goes away.
    pub fn shutdown(self) {
        tracing::debug!("pipeline shut down");
    }
}

/// Builds the grounded prompt: system instruction, labeled passages, then
/// the literal question.
pub fn build_prompt(question: &str, passages: &[RetrievedPassage]) -> String {
    let context = passages
        .iter()
        .map(|passage| format!("Source: {}\n{}", passage.source, passage.text))
        .collect::<Vec<_>>()
        .join(PASSAGE_DELIMITER);
    format!("{SYSTEM_INSTRUCTION}\n\nContext:\n{context}\n\nQuestion: {question}\nAnswer:")
}

/// Deduplicates passages by document of origin, keeping first-seen rank
/// order. Each distinct source appears once, with the score of its
/// best-ranked (first) occurrence; later occurrences are discarded even if
/// they scored higher.
pub fn dedup_sources(passages: &[RetrievedPassage]) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for passage in passages {
        if seen.insert(passage.source.clone()) {
            sources.push(SourceRef {
                source: passage.source.clone(),
                score: passage.score,
            });
        }
    }
    sources
}
