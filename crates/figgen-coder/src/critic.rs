//! Visual critique client
//!
//! The critic inspects a rendered figure with the vision model and returns a
//! numbered defect list covering four dimensions: element boundaries,
//! connector routing, text integrity, and alignment/style consistency. Its
//! output feeds [`Coder::revise_with_critique`](crate::Coder::revise_with_critique)
//! verbatim.

use std::path::Path;
use std::sync::Arc;

use figgen_model::{ChatRequest, ModelBackend, ModelConfig};

use crate::error::CoderError;

pub struct Critic<B> {
    backend: Arc<B>,
    config: ModelConfig,
}

impl<B: ModelBackend> Critic<B> {
    pub fn new(backend: Arc<B>, config: ModelConfig) -> Self {
        Self { backend, config }
    }

    /// Reviews a render and returns a numbered, actionable issue list.
    pub async fn critique(
        &self,
        render: &Path,
        reference: Option<&Path>,
    ) -> Result<String, CoderError> {
        let mut prompt = String::from("The first attached image is a rendered scientific figure.");
        if reference.is_some() {
            prompt.push_str(" The second attached image is the visual reference it should match.");
        }
        prompt.push_str(
            "\n\nInspect the render carefully and report every defect, checking exactly \
             these categories:\n\n\
             1. [BOUNDARY] Elements overflowing the slide edge, overlapping each other, or \
                clipped by containers.\n\
             2. [CONNECTOR] Arrows that start or end in the wrong place, cross through \
                shapes, overlap labels, or point the wrong way.\n\
             3. [TEXT] Truncated, overflowing, or wrapped-mid-word text; labels detached \
                from the element they describe; inconsistent capitalization.\n\
             4. [STYLE] Misaligned rows or columns, uneven spacing, clashing or \
                off-palette colors, inconsistent stroke weights.\n\n\
             Format: one numbered line per issue, as\n\
             `N. [CATEGORY] Issue: <what is wrong and where> -> Fix: <concrete change>`.\n\
             Be specific about which element each issue concerns. If the figure has no \
             defects, reply exactly `NO ISSUES FOUND`.",
        );

        let mut request =
            ChatRequest::new(prompt, &self.config.vision_model).with_system(
                "You are a meticulous figure reviewer for a scientific journal. You report \
                 concrete visual defects, never general praise.",
            );
        request = request.with_image(render);
        if let Some(path) = reference {
            request = request.with_image(path);
        }
        Ok(self.backend.chat(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figgen_test_utils::ScriptedBackend;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn critique_attaches_render_then_reference() {
        let dir = tempfile::tempdir().unwrap();
        let render = dir.path().join("render.png");
        let reference = dir.path().join("ref.png");
        std::fs::write(&render, b"r").unwrap();
        std::fs::write(&reference, b"g").unwrap();

        let backend = Arc::new(ScriptedBackend::new());
        backend.push_chat("1. [BOUNDARY] Issue: box clipped -> Fix: shrink it");
        let critic = Critic::new(Arc::clone(&backend), ModelConfig::default());

        let report = critic.critique(&render, Some(&reference)).await.unwrap();
        assert!(report.contains("[BOUNDARY]"));

        let req = &backend.chat_requests()[0];
        assert_eq!(req.images, vec![render, reference]);
        assert!(req.prompt.contains("[CONNECTOR]"));
        assert!(req.prompt.contains("NO ISSUES FOUND"));
    }
}
