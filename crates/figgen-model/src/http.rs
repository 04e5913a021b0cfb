//! HTTP implementation of [`ModelBackend`]
//!
//! Chat and embeddings go to an OpenAI-compatible endpoint; image generation
//! goes to a Gemini-style `generateContent` endpoint. Both are treated as
//! unreliable: any failure surfaces as a [`ModelError`] for the caller's
//! fallback logic.

use crate::backend::ModelBackend;
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::request::{ChatRequest, ImageRequest};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{json, Value};

/// Backend over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ModelConfig,
}

impl HttpBackend {
    /// Create a backend from configuration
    #[inline]
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Access the configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Assemble the OpenAI-style message array for a chat request
    ///
    /// Missing image files are skipped with a warning rather than failing the
    /// whole request; the service still gets the textual part.
    async fn build_messages(&self, req: &ChatRequest) -> Vec<Value> {
        let mut content = vec![json!({ "type": "text", "text": req.prompt })];
        for path in &req.images {
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let b64 = BASE64.encode(bytes);
                    content.push(json!({
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpeg;base64,{b64}") }
                    }));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable image attachment");
                }
            }
        }

        let mut messages = Vec::with_capacity(2);
        let system = req
            .system
            .clone()
            .unwrap_or_else(|| "You are a helpful assistant.".to_string());
        messages.push(json!({ "role": "system", "content": system }));
        messages.push(json!({ "role": "user", "content": content }));
        messages
    }

    async fn read_body(response: reqwest::Response) -> Result<Value, ModelError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ModelBackend for HttpBackend {
    async fn chat(&self, req: &ChatRequest) -> Result<String, ModelError> {
        let messages = self.build_messages(req).await;
        let mut body = json!({
            "model": req.model,
            "messages": messages,
            "temperature": req.temperature,
        });
        if req.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        tracing::debug!(model = %req.model, images = req.images.len(), "calling chat completion");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed = Self::read_body(response).await?;

        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ModelError::Malformed("missing choices[0].message.content".to_string()))?;
        if content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        tracing::debug!(chars = content.len(), "chat completion returned");
        Ok(content.to_string())
    }

    async fn generate_image(&self, req: &ImageRequest) -> Result<Vec<u8>, ModelError> {
        let modalities = if req.image_only {
            json!(["IMAGE"])
        } else {
            json!(["TEXT", "IMAGE"])
        };
        let mut image_config = json!({ "aspectRatio": req.aspect_ratio });
        if let Some(size) = &req.image_size {
            image_config["imageSize"] = json!(size);
        }
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": req.prompt }] }],
            "generationConfig": {
                "responseModalities": modalities,
                "imageConfig": image_config,
            }
        });

        tracing::debug!(aspect = %req.aspect_ratio, "calling image generation");
        let response = self
            .client
            .post(&self.config.image_api_url)
            .bearer_auth(&self.config.image_api_key)
            .json(&body)
            .send()
            .await?;
        let parsed = Self::read_body(response).await?;

        let parts = parsed["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| ModelError::Malformed("missing candidates[0].content.parts".to_string()))?;
        for part in parts {
            if let Some(data) = part["inlineData"]["data"].as_str() {
                return Ok(BASE64.decode(data)?);
            }
            if let Some(text) = part["text"].as_str() {
                tracing::warn!(text = %text, "image service answered with text instead of image");
            }
        }
        Err(ModelError::EmptyResponse)
    }

    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ModelError> {
        let body = json!({ "input": text, "model": model });
        let response = self
            .client
            .post(format!("{}/embeddings", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed = Self::read_body(response).await?;

        let values = parsed["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| ModelError::Malformed("missing data[0].embedding".to_string()))?;
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            let f = v
                .as_f64()
                .ok_or_else(|| ModelError::Malformed("non-numeric embedding entry".to_string()))?;
            out.push(f as f32);
        }
        if out.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_include_system_and_text() {
        let backend = HttpBackend::new(ModelConfig::default());
        let req = ChatRequest::new("draw a box", "m").with_system("be terse");
        let messages = backend.build_messages(&req).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "be terse");
        assert_eq!(messages[1]["content"][0]["text"], "draw a box");
    }

    #[tokio::test]
    async fn missing_attachment_is_skipped() {
        let backend = HttpBackend::new(ModelConfig::default());
        let req = ChatRequest::new("p", "m").with_image("/nonexistent/figure.png");
        let messages = backend.build_messages(&req).await;
        // only the text part survives
        assert_eq!(messages[1]["content"].as_array().unwrap().len(), 1);
    }
}
