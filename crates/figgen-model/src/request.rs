//! Request types for model backends

use std::path::PathBuf;

/// A chat-completion request, optionally carrying image attachments
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// User prompt text
    pub prompt: String,
    /// Optional system prompt; backends substitute a neutral default when absent
    pub system: Option<String>,
    /// Image files attached to the user turn, in order
    pub images: Vec<PathBuf>,
    /// Model identifier
    pub model: String,
    /// Request structured JSON output from the service
    pub json_mode: bool,
    /// Sampling temperature
    pub temperature: f32,
}

impl ChatRequest {
    /// Create a text-only request
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            images: Vec::new(),
            model: model.into(),
            json_mode: false,
            temperature: 0.7,
        }
    }

    /// With a system prompt
    #[inline]
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Attach an image to the user turn
    #[inline]
    #[must_use]
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.images.push(path.into());
        self
    }

    /// Attach several images, preserving order
    #[inline]
    #[must_use]
    pub fn with_images<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.images.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Request structured JSON output
    #[inline]
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// An image-generation request
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Generation prompt
    pub prompt: String,
    /// Aspect-ratio preset string understood by the service (e.g. "16:9")
    pub aspect_ratio: String,
    /// Optional resolution preset (e.g. "4K")
    pub image_size: Option<String>,
    /// Restrict the response to image parts only (no text modality)
    pub image_only: bool,
}

impl ImageRequest {
    /// Create a request with the given aspect ratio
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: aspect_ratio.into(),
            image_size: None,
            image_only: false,
        }
    }

    /// With a resolution preset
    #[inline]
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = Some(size.into());
        self
    }

    /// Ask the service for image parts only
    #[inline]
    #[must_use]
    pub fn image_only(mut self) -> Self {
        self.image_only = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_builder() {
        let req = ChatRequest::new("hi", "m").with_image("a.png").with_image("b.png");
        assert_eq!(req.images.len(), 2);
        assert!(!req.json_mode);
        assert_eq!(req.temperature, 0.7);
    }

    #[test]
    fn image_request_builder() {
        let req = ImageRequest::new("sheet", "4:3").with_size("4K").image_only();
        assert_eq!(req.image_size.as_deref(), Some("4K"));
        assert!(req.image_only);
    }
}
