//! The backend seam
//!
//! [`ModelBackend`] is the single trait separating the pipeline from the
//! outside model services. Production code uses [`crate::HttpBackend`];
//! tests substitute scripted implementations.

use crate::error::ModelError;
use crate::request::{ChatRequest, ImageRequest};
use async_trait::async_trait;

/// Opaque text/vision/image/embedding completion services
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run a chat completion and return the assistant text
    ///
    /// An empty reply is an error ([`ModelError::EmptyResponse`]), never an
    /// empty string.
    async fn chat(&self, req: &ChatRequest) -> Result<String, ModelError>;

    /// Generate a single image and return its raw bytes
    async fn generate_image(&self, req: &ImageRequest) -> Result<Vec<u8>, ModelError>;

    /// Embed text into a fixed-length vector
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ModelError>;
}
