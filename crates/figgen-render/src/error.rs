//! Render pipeline errors
//!
//! Two families: code-correctness failures (repairable by regenerating the
//! script) and environment failures (converter problems that retrying the
//! same code cannot fix).

use std::path::PathBuf;

/// Errors from the render pipeline
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Generated script exited non-zero; payload is stderr, else stdout,
    /// else a generic message
    #[error("{0}")]
    Script(String),

    /// Script exceeded the wall-clock deadline
    #[error("Execution Timeout (exceeded {timeout_secs}s).")]
    Timeout {
        /// Configured deadline in seconds
        timeout_secs: u64,
    },

    /// Clean exit but no discoverable output document
    #[error("Execution successful but output file not found. Expected '{expected}'.")]
    MissingArtifact {
        /// Convention filename that was expected
        expected: String,
        /// Document-like files actually present in the run directory
        found: Vec<String>,
    },

    /// Document-to-PDF converter failed (environment, not code)
    #[error("PDF conversion failed: {0}")]
    Conversion(String),

    /// PDF-to-raster step failed (environment, not code)
    #[error("raster conversion failed: {0}")]
    Raster(String),

    /// Could not persist the script before execution
    #[error("script write failed at {path}: {source}")]
    ScriptWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Other I/O while shuffling artifacts
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Whether the failure is attributable to the generated code
    ///
    /// Code-class failures are fed back into the debug-repair loop and count
    /// against the retry budget; environment failures are terminal for the
    /// attempt.
    #[inline]
    #[must_use]
    pub fn is_code_error(&self) -> bool {
        matches!(
            self,
            Self::Script(_) | Self::Timeout { .. } | Self::MissingArtifact { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_deadline() {
        let err = RenderError::Timeout { timeout_secs: 60 };
        assert_eq!(err.to_string(), "Execution Timeout (exceeded 60s).");
        assert!(err.is_code_error());
    }

    #[test]
    fn conversion_is_not_a_code_error() {
        assert!(!RenderError::Conversion("soffice exited 1".to_string()).is_code_error());
        assert!(!RenderError::Raster("no page".to_string()).is_code_error());
    }

    #[test]
    fn missing_artifact_is_a_code_error() {
        let err = RenderError::MissingArtifact {
            expected: "temp_render.pptx".to_string(),
            found: vec![],
        };
        assert!(err.is_code_error());
        assert!(err.to_string().contains("temp_render.pptx"));
    }
}
