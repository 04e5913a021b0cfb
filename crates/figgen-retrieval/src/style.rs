//! Design-style extraction
//!
//! Each retrieved figure is reverse-engineered by the vision model into a
//! structured design-system record; multiple records are merged by a
//! text-only call into one coherent [`StyleGuide`]. Every failure path lands
//! on the fixed default guide.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use figgen_model::{ChatRequest, ModelBackend};

use crate::researcher::{RetrievedReference, VisualResearcher};

/// How the figure is laid out as a whole
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutEngine {
    pub topology: String,
    pub flow_direction: String,
    pub alignment: String,
    pub density: String,
    pub grouping_style: String,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            topology: "Left-to-Right Pipeline".into(),
            flow_direction: "Left-to-Right".into(),
            alignment: "Center-aligned".into(),
            density: "Moderate spacing".into(),
            grouping_style: "Standard grouping".into(),
        }
    }
}

/// Geometry and fill of individual nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NodeStyle {
    pub shape_primitive: String,
    pub corner_radius: String,
    pub fill_style: String,
    pub stroke_width: String,
    pub stroke_style: String,
    pub shadow: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape_primitive: "Rounded Rectangle".into(),
            corner_radius: "Small".into(),
            fill_style: "Solid pastel fill".into(),
            stroke_width: "Thin (1px)".into(),
            stroke_style: "Solid".into(),
            shadow: "No shadow".into(),
        }
    }
}

/// Connector geometry and arrowheads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EdgeStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub arrow_head: String,
    pub stroke_color: String,
    pub routing: String,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            kind: "Straight".into(),
            arrow_head: "Filled Triangle".into(),
            stroke_color: "Gray #888".into(),
            routing: "Direct connection".into(),
        }
    }
}

/// Label fonts and placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Typography {
    pub font_family: String,
    pub label_position: String,
    pub casing: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Sans-serif".into(),
            label_position: "Centered inside nodes".into(),
            casing: "Title Case".into(),
        }
    }
}

/// One palette entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteEntry {
    pub hex: String,
    #[serde(default)]
    pub usage: String,
}

/// A complete extracted design system
///
/// Unknown or missing sections deserialize to their defaults, so a partial
/// merge reply (the merge prompt omits typography) still parses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StyleGuide {
    pub layout_engine: LayoutEngine,
    pub node_style: NodeStyle,
    pub edge_style: EdgeStyle,
    pub typography: Typography,
    pub color_palette: Vec<PaletteEntry>,
}

impl Default for StyleGuide {
    fn default() -> Self {
        Self {
            layout_engine: LayoutEngine::default(),
            node_style: NodeStyle::default(),
            edge_style: EdgeStyle::default(),
            typography: Typography::default(),
            color_palette: vec![
                PaletteEntry {
                    hex: "#E6F3FF".into(),
                    usage: "Background".into(),
                },
                PaletteEntry {
                    hex: "#333333".into(),
                    usage: "Primary Node".into(),
                },
            ],
        }
    }
}

impl StyleGuide {
    /// Pretty JSON for persistence and prompt injection
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

const ANALYST_SYSTEM: &str =
    "You are a Senior Design System Architect for scientific publications. You \
     reverse-engineer the visual design language of a scientific diagram into a \
     structured Design System JSON with granular, code-translatable details.";

const MERGE_SYSTEM: &str =
    "You are a Senior Design Director. You synthesize multiple design analysis reports \
     into ONE unified, coherent Design Style Guide for a new scientific diagram. Resolve \
     conflicts by choosing the most common or most professional option. Output strictly JSON.";

fn analysis_prompt(description: &str) -> String {
    format!(
        "Context: {description}\n\n\
         Analyze this image and extract its visual design system. Be specific about \
         alignment, spacing, and shapes; never answer with a single vague phrase.\n\n\
         Output strictly JSON with this structure:\n\
         {{\n\
           \"layout_engine\": {{\"topology\": \"...\", \"flow_direction\": \"...\", \
         \"alignment\": \"...\", \"density\": \"...\", \"grouping_style\": \"...\"}},\n\
           \"node_style\": {{\"shape_primitive\": \"...\", \"corner_radius\": \"...\", \
         \"fill_style\": \"...\", \"stroke_width\": \"...\", \"stroke_style\": \"...\", \
         \"shadow\": \"...\"}},\n\
           \"edge_style\": {{\"type\": \"...\", \"arrow_head\": \"...\", \
         \"stroke_color\": \"...\", \"routing\": \"...\"}},\n\
           \"typography\": {{\"font_family\": \"...\", \"label_position\": \"...\", \
         \"casing\": \"...\"}},\n\
           \"color_palette\": [{{\"hex\": \"#HEX\", \"usage\": \"...\"}}]\n\
         }}"
    )
}

fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

impl<B: ModelBackend> VisualResearcher<B> {
    /// Distill retrieved references into one unified style guide
    ///
    /// Per-image analyses that fail (missing file, model error, bad JSON) are
    /// dropped. Zero survivors yield the default guide, one survivor is
    /// returned as-is, several are merged with a text-only call; a failed
    /// merge also yields the default.
    pub async fn extract_design_style(&self, references: &[RetrievedReference]) -> StyleGuide {
        if references.is_empty() {
            return StyleGuide::default();
        }
        info!(count = references.len(), "analyzing reference images");

        let mut analyses: Vec<StyleGuide> = Vec::new();
        for (i, reference) in references.iter().enumerate() {
            let image_path = Path::new(&reference.meta.image_abs_path);
            if reference.meta.image_abs_path.is_empty() || !image_path.exists() {
                warn!(path = %image_path.display(), "reference image missing, skipping");
                continue;
            }

            let request = ChatRequest::new(
                analysis_prompt(&reference.meta.description),
                &self.models.vision_model,
            )
            .with_system(ANALYST_SYSTEM)
            .with_image(image_path);

            let text = match self.backend.chat(&request).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(index = i, error = %err, "style analysis call failed");
                    continue;
                }
            };
            match serde_json::from_str::<StyleGuide>(&strip_fences(&text)) {
                Ok(guide) => analyses.push(guide),
                Err(err) => {
                    warn!(index = i, error = %err, "style analysis JSON did not parse");
                }
            }
        }

        match analyses.len() {
            0 => StyleGuide::default(),
            1 => {
                info!("design style extracted from a single source");
                analyses.remove(0)
            }
            _ => self.merge_styles(&analyses).await,
        }
    }

    async fn merge_styles(&self, analyses: &[StyleGuide]) -> StyleGuide {
        let reports: Vec<String> = analyses.iter().map(StyleGuide::to_json).collect();
        let prompt = format!(
            "Here are the analysis reports from the reference images:\n{}\n\n\
             Synthesize them into a single JSON with these keys:\n\
             1. \"layout_engine\": the most suitable layout structure\n\
             2. \"color_palette\": a unified list of 3-5 harmonious hex codes\n\
             3. \"node_style\": unified geometric style\n\
             4. \"edge_style\": unified connector style",
            reports.join("\n")
        );
        let request = ChatRequest::new(prompt, &self.models.planner_model)
            .with_system(MERGE_SYSTEM)
            .json();

        let text = match self.backend.chat(&request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "style merge call failed, using default guide");
                return StyleGuide::default();
            }
        };
        match serde_json::from_str::<StyleGuide>(&strip_fences(&text)) {
            Ok(guide) => guide,
            Err(err) => {
                warn!(error = %err, "style merge JSON did not parse, using default guide");
                StyleGuide::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use crate::index::{ReferenceMeta, VectorIndex};
    use figgen_model::ModelConfig;
    use figgen_test_utils::ScriptedBackend;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn researcher(backend: Arc<ScriptedBackend>) -> VisualResearcher<ScriptedBackend> {
        VisualResearcher::with_index(
            backend,
            ModelConfig::default(),
            RetrievalConfig::default(),
            VectorIndex::empty(),
        )
    }

    fn hit_with_image(dir: &Path, name: &str) -> RetrievedReference {
        let path = dir.join(name);
        std::fs::write(&path, b"png").unwrap();
        RetrievedReference {
            score: 0.9,
            meta: ReferenceMeta {
                image_abs_path: path.to_string_lossy().into_owned(),
                description: "a pipeline diagram".into(),
                ..ReferenceMeta::default()
            },
        }
    }

    fn guide_json(topology: &str) -> String {
        format!(r#"{{"layout_engine": {{"topology": "{topology}"}}}}"#)
    }

    #[tokio::test]
    async fn no_references_yield_default() {
        let backend = Arc::new(ScriptedBackend::new());
        let guide = researcher(Arc::clone(&backend)).extract_design_style(&[]).await;
        assert_eq!(guide, StyleGuide::default());
    }

    #[tokio::test]
    async fn single_analysis_is_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_chat(format!("```json\n{}\n```", guide_json("Hub-Spoke")));

        let hits = vec![hit_with_image(dir.path(), "a.png")];
        let guide = researcher(Arc::clone(&backend)).extract_design_style(&hits).await;
        assert_eq!(guide.layout_engine.topology, "Hub-Spoke");
        // Missing sections fall back to defaults.
        assert_eq!(guide.node_style, NodeStyle::default());
    }

    #[tokio::test]
    async fn multiple_analyses_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_chat(guide_json("Tree"));
        backend.push_chat(guide_json("Pipeline"));
        backend.push_chat(guide_json("Merged"));

        let hits = vec![
            hit_with_image(dir.path(), "a.png"),
            hit_with_image(dir.path(), "b.png"),
        ];
        let guide = researcher(Arc::clone(&backend)).extract_design_style(&hits).await;
        assert_eq!(guide.layout_engine.topology, "Merged");

        let requests = backend.chat_requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[2].json_mode);
        assert!(requests[2].images.is_empty());
    }

    #[tokio::test]
    async fn failed_analyses_drop_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_chat("not json at all");

        let hits = vec![
            hit_with_image(dir.path(), "a.png"),
            RetrievedReference {
                score: 0.5,
                meta: ReferenceMeta::default(),
            },
        ];
        let guide = researcher(Arc::clone(&backend)).extract_design_style(&hits).await;
        assert_eq!(guide, StyleGuide::default());
        // Only the reference with a real image reached the model.
        assert_eq!(backend.chat_calls(), 1);
    }

    #[tokio::test]
    async fn merge_failure_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_chat(guide_json("Tree"));
        backend.push_chat(guide_json("Pipeline"));
        backend.push_chat_err(figgen_test_utils::canned_api_error());

        let hits = vec![
            hit_with_image(dir.path(), "a.png"),
            hit_with_image(dir.path(), "b.png"),
        ];
        let guide = researcher(Arc::clone(&backend)).extract_design_style(&hits).await;
        assert_eq!(guide, StyleGuide::default());
    }

    #[test]
    fn default_guide_serializes_round_trip() {
        let json = StyleGuide::default().to_json();
        let back: StyleGuide = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StyleGuide::default());
        assert!(json.contains("\"type\": \"Straight\""));
    }
}
