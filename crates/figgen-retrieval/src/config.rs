//! Retrieval configuration

use std::env;
use std::path::PathBuf;

/// Default number of references returned per query
pub const DEFAULT_TOP_K: usize = 3;

/// Where the corpus lives and how much of it to use
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfig {
    /// Metadata JSON file (array of [`ReferenceMeta`](crate::ReferenceMeta) records)
    pub metadata_path: Option<PathBuf>,
    /// Vector index JSON file (array of equal-length float rows)
    pub index_path: Option<PathBuf>,
    /// Results per query
    pub top_k: usize,
}

impl RetrievalConfig {
    /// Read paths and top-k from the environment
    ///
    /// `RESEARCHER_META_PATH`, `RESEARCHER_INDEX_PATH`, `RETRIEVAL_TOP_K`.
    /// Missing variables leave the corpus unset; an unparseable top-k falls
    /// back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let top_k = env::var("RETRIEVAL_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOP_K);
        Self {
            metadata_path: env::var("RESEARCHER_META_PATH").ok().map(PathBuf::from),
            index_path: env::var("RESEARCHER_INDEX_PATH").ok().map(PathBuf::from),
            top_k,
        }
    }

    /// Point at a corpus on disk
    #[inline]
    #[must_use]
    pub fn with_corpus(mut self, metadata: impl Into<PathBuf>, index: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(metadata.into());
        self.index_path = Some(index.into());
        self
    }

    /// Override the number of results per query
    #[inline]
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Effective top-k, treating an unset zero as the default
    #[inline]
    #[must_use]
    pub fn effective_top_k(&self) -> usize {
        if self.top_k == 0 {
            DEFAULT_TOP_K
        } else {
            self.top_k
        }
    }
}
