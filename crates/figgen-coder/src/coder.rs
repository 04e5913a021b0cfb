//! Code-synthesis client
//!
//! [`Coder`] wraps a [`ModelBackend`] and owns every prompt that produces or
//! rewrites slide code: initial synthesis from a reference image, runtime
//! repair from an error log, and surgical revision from critique. It also
//! covers the planning calls that feed the asset stage (icon planning and
//! per-icon visual descriptions).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use figgen_assets::AssetRegistry;
use figgen_model::{ChatRequest, ImageRequest, ModelBackend, ModelConfig};

use crate::error::CoderError;
use crate::extract::{first_json_region, parse_string_array, strip_json_fences};
use crate::prompts::{OUTPUT_CONTRACT, PPTX_RULES, TOOLKIT_SPEC};

/// File name of the style reference image inside a run directory.
pub const REFERENCE_FILENAME: &str = "00_reference.png";

pub struct Coder<B> {
    backend: Arc<B>,
    config: ModelConfig,
}

impl<B: ModelBackend> Coder<B> {
    pub fn new(backend: Arc<B>, config: ModelConfig) -> Self {
        Self { backend, config }
    }

    /// Generates the publication-style reference image for a requirement.
    ///
    /// Failures log and return `None`; the orchestrator decides whether a
    /// run can proceed without one.
    pub async fn generate_reference(
        &self,
        requirement: &str,
        style_hints: Option<&str>,
        output_dir: &Path,
    ) -> Option<PathBuf> {
        let mut prompt = format!(
            "A rigorous, publication-quality scientific diagram illustrating: {requirement}. \
             Style guide: Emulate the aesthetic standard of high-impact journals like \
             Nature or Science. Constraint: No main title, no placeholders. Pure white \
             background."
        );
        if let Some(hints) = style_hints {
            prompt.push_str("\nFollow this extracted design style guide strictly:\n");
            prompt.push_str(hints);
        }

        let request = ImageRequest::new(prompt, "16:9").image_only();
        let bytes = match self.backend.generate_image(&request).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "reference image generation failed, continuing without one");
                return None;
            }
        };

        let path = output_dir.join(REFERENCE_FILENAME);
        if let Err(err) = tokio::fs::write(&path, &bytes).await {
            warn!(path = %path.display(), error = %err, "could not save reference image");
            return None;
        }
        debug!(path = %path.display(), "reference image saved");
        Some(path)
    }

    /// Synthesizes the initial slide script from scratch.
    ///
    /// `canvas` is the slide size in centimeters; `output_filename` is the
    /// document name the script must save to in its working directory.
    pub async fn synthesize(
        &self,
        reference: Option<&Path>,
        requirement: &str,
        assets: &AssetRegistry,
        canvas: (f64, f64),
        output_filename: &str,
    ) -> Result<String, CoderError> {
        let (w_cm, h_cm) = canvas;
        let mut prompt = String::new();
        if reference.is_some() {
            prompt.push_str(
                "The attached image is the visual reference. Reproduce its layout, palette \
                 and overall composition as a python-pptx script.\n\n",
            );
        }
        prompt.push_str(&format!(
            "Task: write a complete Python script that draws the following scientific figure \
             on a single slide.\n\
             Requirement: {requirement}\n\n\
             Slide setup (mandatory):\n\
             - `prs.slide_width = Cm({w_cm})` and `prs.slide_height = Cm({h_cm})`.\n\
             - Use the blank layout: `prs.slides.add_slide(prs.slide_layouts[6])`.\n\
             - Finish with `prs.save('{output_filename}')`.\n\n"
        ));
        prompt.push_str(&asset_manifest(assets));
        prompt.push_str(PPTX_RULES);
        prompt.push_str("\n\n");
        prompt.push_str(TOOLKIT_SPEC);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_CONTRACT);

        let mut request =
            ChatRequest::new(prompt, &self.config.coder_model).with_system(CODER_SYSTEM);
        if let Some(path) = reference {
            request = request.with_image(path);
        }
        Ok(self.backend.chat(&request).await?)
    }

    /// Rewrites a script that crashed at runtime, given its error log.
    pub async fn repair(&self, broken_code: &str, error_log: &str) -> Result<String, CoderError> {
        let prompt = format!(
            "The following python-pptx script failed to execute.\n\n\
             === SCRIPT ===\n{broken_code}\n\n\
             === ERROR LOG ===\n{error_log}\n\n\
             Fix the root cause of the error. Keep the visual design and all drawing calls \
             unchanged except where the fix requires it.\n\n\
             {PPTX_RULES}\n\n{OUTPUT_CONTRACT}"
        );
        let request = ChatRequest::new(prompt, &self.config.coder_model).with_system(
            "You are a senior Python engineer. You fix runtime errors in python-pptx \
             scripts with minimal, targeted edits.",
        );
        Ok(self.backend.chat(&request).await?)
    }

    /// Revises working code against the current render and the reference.
    pub async fn revise(
        &self,
        code: &str,
        reference: Option<&Path>,
        current_render: &Path,
    ) -> Result<String, CoderError> {
        let mut prompt = String::from(
            "The first attached image is the current render of the script below.",
        );
        if reference.is_some() {
            prompt.push_str(" The second attached image is the target visual reference.");
        }
        prompt.push_str(&format!(
            "\n\nImprove the script so the render matches the target more closely: layout \
             balance, spacing, palette, and label placement.\n\n\
             === CURRENT SCRIPT ===\n{code}\n\n\
             {PPTX_RULES}\n\n{TOOLKIT_SPEC}\n\n{OUTPUT_CONTRACT}"
        ));
        let mut request =
            ChatRequest::new(prompt, &self.config.coder_model).with_system(CODER_SYSTEM);
        request = request.with_image(current_render);
        if let Some(path) = reference {
            request = request.with_image(path);
        }
        Ok(self.backend.chat(&request).await?)
    }

    /// Applies a critique to working code with surgical edits only.
    pub async fn revise_with_critique(
        &self,
        code: &str,
        critique: &str,
        current_render: &Path,
        reference: Option<&Path>,
        assets: &AssetRegistry,
    ) -> Result<String, CoderError> {
        let mut prompt = String::from(
            "The first attached image is the current render of the script below.",
        );
        if reference.is_some() {
            prompt.push_str(" The second attached image is the target visual reference.");
        }
        prompt.push_str(&format!(
            "\n\nA reviewer found the following defects in the current render:\n\n\
             {critique}\n\n\
             Rewrite the script to resolve each listed issue.\n\
             Constraints:\n\
             - Make SURGICAL edits: touch only the shapes and calls named by the issues, \
               and preserve every other line verbatim.\n\
             - Do NOT redesign the figure or change its overall layout.\n"
        ));
        if !assets.is_empty() {
            prompt.push_str(
                "- Keep every `add_picture` call for the icon assets listed below; do not \
                  drop or substitute them.\n\n",
            );
            prompt.push_str(&asset_manifest(assets));
        }
        prompt.push_str(&format!(
            "\n=== CURRENT SCRIPT ===\n{code}\n\n{PPTX_RULES}\n\n{OUTPUT_CONTRACT}"
        ));

        let mut request =
            ChatRequest::new(prompt, &self.config.coder_model).with_system(CODER_SYSTEM);
        request = request.with_image(current_render);
        if let Some(path) = reference {
            request = request.with_image(path);
        }
        Ok(self.backend.chat(&request).await?)
    }

    /// Plans which icon subjects the reference figure needs.
    ///
    /// Inspects the reference image with the planner model. Failures degrade
    /// to an empty plan, which skips the asset stage.
    pub async fn plan_icons(&self, reference: &Path) -> Vec<String> {
        let prompt = "Inspect this scientific figure and list the concrete pictorial icons \
             it contains (physical objects, organisms, devices, molecules). Exclude \
             abstract shapes, arrows, and text labels; those are drawn natively. If no \
             such icons appear, return an empty list.\n\n\
             Respond with a JSON array of short snake_case subject names only, e.g. \
             [\"neuron_cell\", \"microscope\"].";
        let request =
            ChatRequest::new(prompt, &self.config.planner_model).with_image(reference);
        match self.backend.chat(&request).await {
            Ok(text) => parse_string_array(&text),
            Err(err) => {
                warn!(error = %err, "icon planning failed, skipping asset stage");
                Vec::new()
            }
        }
    }

    /// Expands planned icon names into visual generation descriptions.
    ///
    /// Returns an empty map on any failure; insertion order follows the
    /// model's object key order.
    pub async fn describe_icons(
        &self,
        reference: &Path,
        names: &[String],
    ) -> IndexMap<String, String> {
        if names.is_empty() {
            return IndexMap::new();
        }
        let listed = names.join(", ");
        let prompt = format!(
            "The attached image is a scientific figure. For each icon subject below, \
             describe how it appears in the figure, as one visual description suitable \
             for a text-to-image model: flat vector scientific illustration style, single \
             subject centered on a pure white background, no text, no shadows.\n\n\
             Subjects: {listed}\n\n\
             Respond with a single JSON object mapping each subject name to its \
             description."
        );
        let request = ChatRequest::new(prompt, &self.config.planner_model)
            .with_image(reference)
            .json();
        let text = match self.backend.chat(&request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "icon description failed, skipping asset stage");
                return IndexMap::new();
            }
        };
        let cleaned = strip_json_fences(&text);
        let Some(region) = first_json_region(&cleaned, '{', '}') else {
            warn!("icon description reply contained no JSON object");
            return IndexMap::new();
        };
        match serde_json::from_str::<IndexMap<String, serde_json::Value>>(region) {
            Ok(map) => map
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_owned())))
                .collect(),
            Err(err) => {
                warn!(error = %err, "icon description JSON did not parse");
                IndexMap::new()
            }
        }
    }
}

const CODER_SYSTEM: &str =
    "You are an expert scientific illustrator who programs figures with python-pptx. \
     You write complete, runnable scripts and follow the provided library rules exactly.";

fn asset_manifest(assets: &AssetRegistry) -> String {
    if assets.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        "*** AVAILABLE ICON ASSETS ***\n\
         The following pre-rendered transparent PNG icons exist on disk. Place each one \
         with `slide.shapes.add_picture(path, left, top, width=...)` where it fits the \
         figure; do not draw these subjects from shapes.\n",
    );
    for (name, path) in assets.iter() {
        out.push_str(&format!("- {name}: {}\n", path.display()));
    }
    out.push('\n');
    out
}
