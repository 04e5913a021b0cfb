//! Cosine-similarity search over the corpus

use std::sync::Arc;

use ndarray::Array1;
use tracing::{debug, error, info};

use figgen_model::{ModelBackend, ModelConfig};

use crate::config::RetrievalConfig;
use crate::error::RetrievalError;
use crate::index::{normalize_query, ReferenceMeta, VectorIndex};

/// One search hit: corpus record plus its similarity score
#[derive(Debug, Clone)]
pub struct RetrievedReference {
    /// Cosine similarity against the query, in `[-1, 1]`
    pub score: f32,
    /// The matched corpus record
    pub meta: ReferenceMeta,
}

/// Retrieval client: embeds queries and ranks the corpus by dot product
///
/// Index rows and query vectors are both unit length, so the dot product is
/// cosine similarity. Ranking is a stable descending sort: equal scores keep
/// their corpus order.
pub struct VisualResearcher<B> {
    pub(crate) backend: Arc<B>,
    pub(crate) models: ModelConfig,
    config: RetrievalConfig,
    index: VectorIndex,
}

impl<B: ModelBackend> VisualResearcher<B> {
    /// Load the corpus named by `config` and build a researcher over it
    pub fn new(backend: Arc<B>, models: ModelConfig, config: RetrievalConfig) -> Self {
        let index = VectorIndex::load(&config);
        Self {
            backend,
            models,
            config,
            index,
        }
    }

    /// Build over an already-loaded index (used by tests)
    pub fn with_index(
        backend: Arc<B>,
        models: ModelConfig,
        config: RetrievalConfig,
        index: VectorIndex,
    ) -> Self {
        Self {
            backend,
            models,
            config,
            index,
        }
    }

    /// Whether a corpus is loaded
    #[inline]
    #[must_use]
    pub fn has_corpus(&self) -> bool {
        !self.index.is_empty()
    }

    /// Search the corpus for the `top_k` nearest references
    ///
    /// An empty corpus or a query/index dimension mismatch returns an empty
    /// list; only the embedding call itself can error.
    pub async fn search(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RetrievedReference>, RetrievalError> {
        let top_k = top_k.unwrap_or_else(|| self.config.effective_top_k());
        if self.index.is_empty() {
            debug!("empty corpus, skipping retrieval");
            return Ok(Vec::new());
        }

        debug!(query, top_k, "searching references");
        let mut embedding = self
            .backend
            .embed(query, &self.models.embedding_model)
            .await?;
        normalize_query(&mut embedding);

        if embedding.len() != self.index.dim() {
            error!(
                query_dim = embedding.len(),
                index_dim = self.index.dim(),
                "embedding dimension mismatch, returning no references"
            );
            return Ok(Vec::new());
        }

        let query_vec = Array1::from(embedding);
        let scores = self.index.vectors().dot(&query_vec);

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let metadata = self.index.metadata();
        let mut results = Vec::with_capacity(top_k.min(order.len()));
        for idx in order.into_iter().take(top_k) {
            // Rows without a metadata record are skipped, not an error.
            let Some(meta) = metadata.get(idx) else {
                continue;
            };
            info!(
                score = scores[idx],
                figure = %meta.figure_label,
                paper = %meta.paper_name,
                "retrieved reference"
            );
            results.push(RetrievedReference {
                score: scores[idx],
                meta: meta.clone(),
            });
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figgen_test_utils::ScriptedBackend;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn meta(label: &str) -> ReferenceMeta {
        ReferenceMeta {
            figure_label: label.to_string(),
            ..ReferenceMeta::default()
        }
    }

    fn researcher_with(
        vectors: ndarray::Array2<f32>,
        metadata: Vec<ReferenceMeta>,
    ) -> (Arc<ScriptedBackend>, VisualResearcher<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new());
        let index = VectorIndex::from_parts(vectors, metadata);
        let researcher = VisualResearcher::with_index(
            Arc::clone(&backend),
            ModelConfig::default(),
            RetrievalConfig::default(),
            index,
        );
        (backend, researcher)
    }

    #[tokio::test]
    async fn ranks_by_cosine_similarity_descending() {
        let vectors = array![[1.0, 0.0], [0.0, 1.0], [0.7, 0.7]];
        let (backend, researcher) =
            researcher_with(vectors, vec![meta("A"), meta("B"), meta("C")]);
        backend.push_embed(vec![1.0, 0.0]);

        let hits = researcher.search("pipeline figure", Some(2)).await.unwrap();
        let labels: Vec<&str> = hits.iter().map(|h| h.meta.figure_label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn equal_scores_keep_corpus_order() {
        // Two identical rows tie exactly; the earlier record must rank first.
        let vectors = array![[1.0, 0.0], [1.0, 0.0]];
        let (backend, researcher) = researcher_with(vectors, vec![meta("first"), meta("second")]);
        backend.push_embed(vec![1.0, 0.0]);

        let hits = researcher.search("q", Some(2)).await.unwrap();
        assert_eq!(hits[0].meta.figure_label, "first");
        assert_eq!(hits[1].meta.figure_label, "second");
    }

    #[tokio::test]
    async fn dimension_mismatch_returns_empty() {
        let vectors = array![[1.0, 0.0, 0.0]];
        let (backend, researcher) = researcher_with(vectors, vec![meta("A")]);
        backend.push_embed(vec![1.0, 0.0]);

        let hits = researcher.search("q", None).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn rows_without_metadata_are_skipped() {
        let vectors = array![[0.0, 1.0], [1.0, 0.0]];
        // Only one metadata record for two vector rows.
        let (backend, researcher) = researcher_with(vectors, vec![meta("only")]);
        backend.push_embed(vec![1.0, 0.0]);

        let hits = researcher.search("q", Some(2)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].meta.figure_label, "only");
    }

    #[tokio::test]
    async fn empty_corpus_skips_embedding() {
        let (backend, researcher) = researcher_with(ndarray::Array2::zeros((0, 0)), Vec::new());
        let hits = researcher.search("q", None).await.unwrap();
        assert!(hits.is_empty());
        // No embed reply was queued; reaching the backend would have panicked.
        let _ = backend;
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let vectors = array![[1.0, 0.0]];
        let (backend, researcher) = researcher_with(vectors, vec![meta("A")]);
        backend.push_embed_err(figgen_test_utils::canned_api_error());

        let err = researcher.search("q", None).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
