//! Error types for the model transport layer

/// Errors from model backends
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("api error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (truncated by the caller if needed)
        body: String,
    },

    /// The service returned no usable content
    #[error("empty response from model")]
    EmptyResponse,

    /// Response arrived but did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Inline image payload failed to decode
    #[error("base64 decode failed: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Local file I/O while assembling a request
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Whether retrying the same request could plausibly succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::EmptyResponse | Self::Api { status: 500..=599, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ModelError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = ModelError::Api {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
        assert!(ModelError::EmptyResponse.is_transient());
    }
}
