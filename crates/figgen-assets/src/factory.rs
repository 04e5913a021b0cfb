//! Sprite-sheet composition
//!
//! One generation request produces every icon for a run, each in its own
//! grid cell. The prompt carries explicit segmentation constraints so the
//! slicer can rely on crisp boundaries and a clean white background.

use crate::layout::{grid_layout, AspectRatio};
use figgen_model::{ImageRequest, ModelBackend};
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw sheet filename kept in the run directory for inspection
pub const SHEET_FILENAME: &str = "assets_grid_sheet_raw.png";

/// Requests composite icon sheets from the image service
#[derive(Debug, Clone)]
pub struct IconFactory<B> {
    backend: Arc<B>,
}

impl<B: ModelBackend> IconFactory<B> {
    /// Create a factory over the given backend
    #[inline]
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Generate the sprite sheet for the described icons
    ///
    /// Returns the saved sheet path, or `None` for an empty description set
    /// or any service failure (callers fall back to a run without assets).
    pub async fn generate_grid_sheet(
        &self,
        descriptions: &IndexMap<String, String>,
        output_dir: &Path,
    ) -> Option<PathBuf> {
        let count = descriptions.len();
        if count == 0 {
            return None;
        }

        let grid = grid_layout(count);
        let aspect = AspectRatio::nearest(grid.aspect());
        tracing::info!(
            rows = grid.rows,
            cols = grid.cols,
            aspect = %aspect,
            "requesting icon sheet"
        );

        let prompt = sheet_prompt(descriptions, grid.rows, grid.cols, aspect);
        let request = ImageRequest::new(prompt, aspect.as_str())
            .with_size("4K")
            .image_only();

        let bytes = match self.backend.generate_image(&request).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "icon sheet generation failed");
                return None;
            }
        };

        let sheet_path = output_dir.join(SHEET_FILENAME);
        if let Err(e) = tokio::fs::write(&sheet_path, bytes).await {
            tracing::warn!(error = %e, "could not save icon sheet");
            return None;
        }
        tracing::info!(sheet = %sheet_path.display(), "icon sheet saved");
        Some(sheet_path)
    }
}

/// Build the sheet prompt: per-slot assignment in row-major order, trailing
/// slots explicitly blank, segmentation and negative constraints
fn sheet_prompt(
    descriptions: &IndexMap<String, String>,
    rows: usize,
    cols: usize,
    aspect: AspectRatio,
) -> String {
    let count = descriptions.len();
    let total_slots = rows * cols;
    let empty_slots = total_slots - count;

    let mut items = String::new();
    for (i, (name, desc)) in descriptions.iter().enumerate() {
        let _ = writeln!(items, "Slot {} (Target: {name}): {desc}", i + 1);
    }

    format!(
        "Generate a high-resolution Sprite Sheet Image containing exactly {count} distinct icons.\n\
         \n\
         Layout Configuration:\n\
         - CANVAS: Aspect Ratio {aspect}.\n\
         - GRID: {rows} Rows x {cols} Columns.\n\
         - TOTAL SLOTS: {total_slots}.\n\
         - FILLED: Slots 1 to {count} (Row by row, Left to Right).\n\
         - EMPTY: Leave the last {empty_slots} slots strictly EMPTY/WHITE.\n\
         \n\
         Background: Pure White (#FFFFFF).\n\
         Spacing: Wide white gaps between every icon.\n\
         \n\
         SEGMENTATION REQUIREMENTS (CRITICAL):\n\
         1. CLEAR BOUNDARIES: Every icon MUST have a distinct, continuous edge or outline \
         (e.g., a thin dark grey or black stroke).\n\
         2. NO FADING: Do not let icon colors fade or gradient into the white background. \
         The edge must be sharp.\n\
         3. COMPOUND ICONS: If a single icon is described as having multiple parts, these \
         parts MUST be visually touching, overlapping, or connected by a base. Do NOT leave \
         a complete white gap that separates the parts of a single icon.\n\
         \n\
         NEGATIVE CONSTRAINTS:\n\
         1. NO TEXT, LABELS, or NUMBERS.\n\
         2. NO BOXES or FRAMES around the grid cells.\n\
         3. NO SHADOWS that extend far from the icon.\n\
         \n\
         Items to draw:\n\
         {items}\n\
         Style: Flat vector icon, clean lines, professional scientific style, consistent palette."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_assigns_slots_in_insertion_order() {
        let mut descriptions = IndexMap::new();
        descriptions.insert("Brain".to_string(), "a pink brain".to_string());
        descriptions.insert("Server".to_string(), "a grey server rack".to_string());
        descriptions.insert("Lock".to_string(), "a golden padlock".to_string());

        let prompt = sheet_prompt(&descriptions, 2, 2, AspectRatio::Square);
        assert!(prompt.contains("Slot 1 (Target: Brain)"));
        assert!(prompt.contains("Slot 3 (Target: Lock)"));
        assert!(prompt.contains("Leave the last 1 slots strictly EMPTY/WHITE"));
        assert!(prompt.contains("2 Rows x 2 Columns"));
        assert!(prompt.contains("Aspect Ratio 1:1"));
    }
}
