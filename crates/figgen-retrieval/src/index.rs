//! Corpus loading and normalisation
//!
//! The corpus is two files built offline: a metadata JSON array and a vector
//! index stored as a JSON array of equal-length float rows. Rows are
//! L2-normalised once at load so similarity search is a plain dot product.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RetrievalConfig;

/// Guard against division by zero for degenerate rows
const NORM_EPSILON: f32 = 1e-10;

/// One corpus record, as written by the offline indexer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceMeta {
    /// Source publication
    #[serde(default)]
    pub paper_name: String,
    /// Figure label within the paper (e.g. "Figure 2")
    #[serde(default)]
    pub figure_label: String,
    /// Original caption text
    #[serde(default)]
    pub caption: String,
    /// Cleaned content description
    #[serde(default)]
    pub description: String,
    /// Absolute path to the figure image
    #[serde(default)]
    pub image_abs_path: String,
    /// Text the row embedding was computed from
    #[serde(default)]
    pub embedding_text_used: String,
}

/// Row-normalised vectors paired with their metadata
///
/// Loading is lenient throughout: missing files, unreadable JSON, and ragged
/// rows all produce an empty index with a logged warning. An empty index
/// makes every search return no results, which downstream treats as
/// "retrieval unavailable".
#[derive(Debug, Clone)]
pub struct VectorIndex {
    vectors: Array2<f32>,
    metadata: Vec<ReferenceMeta>,
}

impl VectorIndex {
    /// An index with no rows
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vectors: Array2::zeros((0, 0)),
            metadata: Vec::new(),
        }
    }

    /// Load the corpus named by `config`, degrading to empty on any problem
    #[must_use]
    pub fn load(config: &RetrievalConfig) -> Self {
        let metadata = match &config.metadata_path {
            Some(path) => load_metadata(path),
            None => {
                warn!("metadata path not configured, retrieval disabled");
                return Self::empty();
            }
        };
        let vectors = match &config.index_path {
            Some(path) => load_vectors(path),
            None => {
                warn!("index path not configured, retrieval disabled");
                return Self::empty();
            }
        };
        let Some(vectors) = vectors else {
            return Self::empty();
        };
        if metadata.is_empty() || vectors.nrows() == 0 {
            return Self::empty();
        }
        info!(
            rows = vectors.nrows(),
            dim = vectors.ncols(),
            records = metadata.len(),
            "vector index loaded"
        );
        Self {
            vectors: normalize_rows(vectors),
            metadata,
        }
    }

    /// Build an index from in-memory parts (rows are normalised here too)
    #[must_use]
    pub fn from_parts(vectors: Array2<f32>, metadata: Vec<ReferenceMeta>) -> Self {
        Self {
            vectors: normalize_rows(vectors),
            metadata,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() || self.vectors.nrows() == 0
    }

    /// Number of vector rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    /// Embedding dimensionality
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    #[inline]
    pub(crate) fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }

    #[inline]
    pub(crate) fn metadata(&self) -> &[ReferenceMeta] {
        &self.metadata
    }
}

fn load_metadata(path: &Path) -> Vec<ReferenceMeta> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "metadata file unreadable");
            return Vec::new();
        }
    };
    match serde_json::from_str(&text) {
        Ok(records) => records,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "metadata JSON did not parse");
            Vec::new()
        }
    }
}

fn load_vectors(path: &Path) -> Option<Array2<f32>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "index file unreadable");
            return None;
        }
    };
    let rows: Vec<Vec<f32>> = match serde_json::from_str(&text) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "index JSON did not parse");
            return None;
        }
    };
    rows_to_array(rows, path)
}

fn rows_to_array(rows: Vec<Vec<f32>>, path: &Path) -> Option<Array2<f32>> {
    let n = rows.len();
    if n == 0 {
        return Some(Array2::zeros((0, 0)));
    }
    let dim = rows[0].len();
    if rows.iter().any(|row| row.len() != dim) {
        warn!(path = %path.display(), "index rows have unequal lengths, retrieval disabled");
        return None;
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    match Array2::from_shape_vec((n, dim), flat) {
        Ok(array) => Some(array),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "index shape invalid");
            None
        }
    }
}

fn normalize_rows(mut vectors: Array2<f32>) -> Array2<f32> {
    for mut row in vectors.rows_mut() {
        let norm = row.dot(&row).sqrt();
        row.mapv_inplace(|v| v / (norm + NORM_EPSILON));
    }
    vectors
}

/// Normalise a query vector in place; zero vectors stay untouched
pub(crate) fn normalize_query(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use ndarray::array;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_normalizes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let meta = write_file(
            dir.path(),
            "meta.json",
            r#"[{"paper_name":"P","figure_label":"Fig 1"},{"figure_label":"Fig 2"}]"#,
        );
        let index = write_file(dir.path(), "index.json", "[[3.0, 4.0], [0.0, 2.0]]");
        let config = RetrievalConfig::default().with_corpus(meta, index);

        let loaded = VectorIndex::load(&config);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.dim(), 2);
        for row in loaded.vectors().rows() {
            let norm = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
        assert_eq!(loaded.metadata()[0].figure_label, "Fig 1");
        assert_eq!(loaded.metadata()[1].paper_name, "");
    }

    #[test]
    fn missing_files_mean_empty_index() {
        let config = RetrievalConfig::default()
            .with_corpus("/nonexistent/meta.json", "/nonexistent/index.json");
        assert!(VectorIndex::load(&config).is_empty());
        assert!(VectorIndex::load(&RetrievalConfig::default()).is_empty());
    }

    #[test]
    fn ragged_rows_disable_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let meta = write_file(dir.path(), "meta.json", r#"[{"figure_label":"F"}]"#);
        let index = write_file(dir.path(), "index.json", "[[1.0, 2.0], [1.0]]");
        let config = RetrievalConfig::default().with_corpus(meta, index);
        assert!(VectorIndex::load(&config).is_empty());
    }

    #[test]
    fn zero_row_stays_finite() {
        let index = VectorIndex::from_parts(array![[0.0, 0.0]], vec![ReferenceMeta::default()]);
        let row = index.vectors().row(0);
        assert!(row.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn query_normalization() {
        let mut q = vec![0.0_f32, 3.0, 4.0];
        normalize_query(&mut q);
        let norm: f32 = q.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);

        let mut zero = vec![0.0_f32, 0.0];
        normalize_query(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
