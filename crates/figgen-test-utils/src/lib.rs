//! Testing utilities for the figgen workspace
//!
//! Scripted doubles for the two external seams: [`ScriptedBackend`] replays
//! queued model replies, [`FakeRenderer`] replays queued render outcomes and
//! fabricates artifact files on success. Queue exhaustion panics with the
//! call that ran dry, which is the failure mode a test wants.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use figgen_model::{ChatRequest, ImageRequest, ModelBackend, ModelError};
use figgen_render::{DocumentRenderer, RenderError, Rendered};

/// Model backend replaying queued canned replies in FIFO order
#[derive(Default)]
pub struct ScriptedBackend {
    chats: Mutex<VecDeque<Result<String, ModelError>>>,
    images: Mutex<VecDeque<Result<Vec<u8>, ModelError>>>,
    embeds: Mutex<VecDeque<Result<Vec<f32>, ModelError>>>,
    chat_log: Mutex<Vec<ChatRequest>>,
    image_log: Mutex<Vec<ImageRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&self, reply: impl Into<String>) {
        self.chats.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_chat_err(&self, err: ModelError) {
        self.chats.lock().unwrap().push_back(Err(err));
    }

    pub fn push_image(&self, bytes: Vec<u8>) {
        self.images.lock().unwrap().push_back(Ok(bytes));
    }

    pub fn push_image_err(&self, err: ModelError) {
        self.images.lock().unwrap().push_back(Err(err));
    }

    pub fn push_embed(&self, vector: Vec<f32>) {
        self.embeds.lock().unwrap().push_back(Ok(vector));
    }

    pub fn push_embed_err(&self, err: ModelError) {
        self.embeds.lock().unwrap().push_back(Err(err));
    }

    /// Every chat request seen so far, in call order
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_log.lock().unwrap().clone()
    }

    /// Every image request seen so far, in call order
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_log.lock().unwrap().clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_log.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn chat(&self, req: &ChatRequest) -> Result<String, ModelError> {
        self.chat_log.lock().unwrap().push(req.clone());
        self.chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("scripted backend: chat queue exhausted (model {})", req.model))
    }

    async fn generate_image(&self, req: &ImageRequest) -> Result<Vec<u8>, ModelError> {
        self.image_log.lock().unwrap().push(req.clone());
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted backend: image queue exhausted")
    }

    async fn embed(&self, _text: &str, _model: &str) -> Result<Vec<f32>, ModelError> {
        self.embeds
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted backend: embed queue exhausted")
    }
}

/// An injectable error for scripted failures
pub fn canned_api_error() -> ModelError {
    ModelError::Api {
        status: 500,
        body: "scripted failure".to_string(),
    }
}

/// Renderer replaying queued outcomes; successes fabricate the artifact files
#[derive(Default)]
pub struct FakeRenderer {
    outcomes: Mutex<VecDeque<Result<(), RenderError>>>,
    code_log: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self) {
        self.outcomes.lock().unwrap().push_back(Ok(()));
    }

    pub fn push_err(&self, err: RenderError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    /// A scripted runtime failure, the kind the debug loop repairs
    pub fn push_script_error(&self, log: impl Into<String>) {
        self.push_err(RenderError::Script(log.into()));
    }

    /// Every code string rendered so far, in call order
    pub fn rendered_code(&self) -> Vec<String> {
        self.code_log.lock().unwrap().clone()
    }

    pub fn render_calls(&self) -> usize {
        self.code_log.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render(
        &self,
        code: &str,
        output_dir: &Path,
        name_base: &str,
    ) -> Result<Rendered, RenderError> {
        self.code_log.lock().unwrap().push(code.to_string());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake renderer: outcome queue exhausted");
        outcome?;

        let script = output_dir.join(format!("{name_base}_script.py"));
        let document = output_dir.join(format!("{name_base}.pptx"));
        let intermediate = output_dir.join(format!("{name_base}.pdf"));
        let raster = output_dir.join(format!("{name_base}.png"));
        for path in [&script, &document, &intermediate, &raster] {
            tokio::fs::write(path, code.as_bytes()).await?;
        }
        Ok(Rendered {
            script,
            document,
            intermediate,
            raster,
        })
    }
}
