//! Model endpoint and identifier configuration
//!
//! All endpoints and model names live in an explicit struct that is passed
//! into backend constructors, never read ambiently, so tests can inject
//! alternate values.

use serde::{Deserialize, Serialize};

/// Default coder model (code synthesis, repair, revision)
pub const DEFAULT_CODER_MODEL: &str = "gemini-3-pro-preview-thinking";
/// Default vision model (critique, style extraction)
pub const DEFAULT_VISION_MODEL: &str = "gpt-5";
/// Default planner model (icon planning and description)
pub const DEFAULT_PLANNER_MODEL: &str = "gemini-3-pro-preview-thinking";
/// Default embedding model for retrieval
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Configuration for model backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the OpenAI-compatible chat/embedding endpoint
    pub api_base: String,
    /// Bearer key for the chat/embedding endpoint
    pub api_key: String,
    /// Full URL of the image-generation endpoint
    pub image_api_url: String,
    /// Bearer key for the image-generation endpoint
    pub image_api_key: String,
    /// Model used for code synthesis and repair
    pub coder_model: String,
    /// Model used for visual critique
    pub vision_model: String,
    /// Model used for icon planning / description
    pub planner_model: String,
    /// Model used for query embeddings
    pub embedding_model: String,
}

impl ModelConfig {
    /// Build from environment variables, falling back to placeholders
    ///
    /// Reads `API_BASE`, `API_KEY`, `IMAGE_API_URL` and `IMAGE_API_KEY`
    /// (the latter defaults to `API_KEY`), plus `EMBEDDING_MODEL_NAME`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("API_KEY").unwrap_or_default();
        Self {
            api_base: std::env::var("API_BASE").unwrap_or_default(),
            image_api_url: std::env::var("IMAGE_API_URL").unwrap_or_default(),
            image_api_key: std::env::var("IMAGE_API_KEY").unwrap_or_else(|_| api_key.clone()),
            api_key,
            coder_model: DEFAULT_CODER_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            planner_model: DEFAULT_PLANNER_MODEL.to_string(),
            embedding_model: std::env::var("EMBEDDING_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
        }
    }

    /// With chat/embedding endpoint
    #[inline]
    #[must_use]
    pub fn with_api(mut self, base: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_base = base.into();
        self.api_key = key.into();
        self
    }

    /// With image-generation endpoint
    #[inline]
    #[must_use]
    pub fn with_image_api(mut self, url: impl Into<String>, key: impl Into<String>) -> Self {
        self.image_api_url = url.into();
        self.image_api_key = key.into();
        self
    }

    /// With coder model identifier
    #[inline]
    #[must_use]
    pub fn with_coder_model(mut self, model: impl Into<String>) -> Self {
        self.coder_model = model.into();
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            image_api_url: String::new(),
            image_api_key: String::new(),
            coder_model: DEFAULT_CODER_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            planner_model: DEFAULT_PLANNER_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}
