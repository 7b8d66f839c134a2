//! Query-time top-k retrieval.

use crate::embeddings::EmbeddingProvider;
use crate::stores::VectorStore;
use crate::types::RagError;

/// A ranked passage joined from an index record and its similarity score.
///
/// Rank is implicit in list position; scores descend. Records missing
/// `text` or `source` metadata arrive here already defaulted to `""` /
/// `"unknown"` by the store adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedPassage {
    pub text: String,
    pub source: String,
    pub score: f32,
}

/// Embeds `question` and returns its `top_k` nearest passages in store
/// ranking order.
///
/// `top_k` must be positive; zero is rejected with
/// [`RagError::InvalidInput`] before any network call.
pub async fn retrieve(
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    question: &str,
    top_k: usize,
) -> Result<Vec<RetrievedPassage>, RagError> {
    if top_k == 0 {
        return Err(RagError::InvalidInput(
            "top_k must be positive".to_string(),
        ));
    }

    let texts = [question.to_string()];
    let mut vectors = embedder.embed(&texts).await?;
    let query_vector = vectors.pop().ok_or_else(|| {
        RagError::ModelUnavailable("embedding provider returned no vector for the query".to_string())
    })?;

    let matches = store.query(&query_vector, top_k).await?;
    Ok(matches
        .into_iter()
        .map(|matched| RetrievedPassage {
            text: matched.metadata.text,
            source: matched.metadata.source,
            score: matched.score,
        })
        .collect())
}
