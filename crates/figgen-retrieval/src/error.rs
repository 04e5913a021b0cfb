//! Error types for the retrieval layer

use figgen_model::ModelError;

/// Errors that surface from retrieval instead of degrading silently
///
/// Only the embedding call propagates; index loading and style extraction
/// degrade to empty or default values by design of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Query embedding failed
    #[error("embedding request failed: {0}")]
    Embedding(#[from] ModelError),
}
