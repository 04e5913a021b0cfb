//! Sheet slicing and asset cleanup
//!
//! Partitions the sheet with the same grid function used at composition
//! time, then per cell: interior margin against edge bleed, near-white to
//! transparent, tight crop to the opaque bounding box, write as a named PNG.

use crate::error::AssetError;
use crate::layout::grid_layout;
use crate::registry::AssetRegistry;
use image::{GenericImageView, RgbaImage};
use std::path::Path;

/// Interior margin trimmed from every cell, in pixels
const CELL_MARGIN: u32 = 5;

/// Padding kept around the opaque bounding box, in pixels
const TRIM_PAD: u32 = 5;

/// Per-channel brightness at or above which a pixel counts as background
const WHITE_THRESHOLD: u8 = 240;

/// Slice the sheet into one transparent, trimmed asset per name
///
/// Cell geometry is re-derived from `names.len()` with the same grid
/// function used at composition time, so slot `i` lands in the cell that was
/// assigned to `names[i]`. A missing or undecodable sheet yields an empty
/// registry rather than an error; the run then proceeds without assets.
pub fn slice_sheet(
    sheet_path: &Path,
    names: &[String],
    output_dir: &Path,
) -> Result<AssetRegistry, AssetError> {
    let mut registry = AssetRegistry::new();
    if names.is_empty() {
        return Ok(registry);
    }
    if !sheet_path.exists() {
        tracing::warn!(sheet = %sheet_path.display(), "sheet missing, skipping slicing");
        return Ok(registry);
    }
    let sheet = match image::open(sheet_path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            tracing::warn!(error = %e, "sheet failed to decode, skipping slicing");
            return Ok(registry);
        }
    };

    let (width, height) = sheet.dimensions();
    let grid = grid_layout(names.len());
    let cell_w = width / grid.cols as u32;
    let cell_h = height / grid.rows as u32;
    if cell_w <= 2 * CELL_MARGIN || cell_h <= 2 * CELL_MARGIN {
        tracing::warn!(cell_w, cell_h, "cells too small to slice");
        return Ok(registry);
    }

    let assets_dir = output_dir.join("assets");
    std::fs::create_dir_all(&assets_dir)?;

    for (i, name) in names.iter().enumerate() {
        let (row, col) = grid.cell(i);
        let x = col as u32 * cell_w + CELL_MARGIN;
        let y = row as u32 * cell_h + CELL_MARGIN;
        let w = (cell_w - 2 * CELL_MARGIN).min(width.saturating_sub(x));
        let h = (cell_h - 2 * CELL_MARGIN).min(height.saturating_sub(y));
        if w == 0 || h == 0 {
            continue;
        }

        let cell = sheet.view(x, y, w, h).to_image();
        let icon = trim_to_content(make_transparent(cell));

        let filename = format!("icon_{i}_{}.png", sanitize_name(name));
        let save_path = assets_dir.join(filename);
        icon.save(&save_path)?;
        tracing::debug!(name = %name, path = %save_path.display(), "icon ready");
        // absolute paths: generated scripts run with their own cwd
        let abs = save_path.canonicalize().unwrap_or(save_path);
        registry.insert(name.clone(), abs);
    }
    Ok(registry)
}

/// Turn near-white pixels fully transparent
fn make_transparent(mut cell: RgbaImage) -> RgbaImage {
    for pixel in cell.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        if r >= WHITE_THRESHOLD && g >= WHITE_THRESHOLD && b >= WHITE_THRESHOLD {
            pixel.0[3] = 0;
        }
    }
    cell
}

/// Crop to the opaque bounding box plus a fixed pad
///
/// A fully transparent cell is returned unchanged so the caller still writes
/// a file for the slot.
fn trim_to_content(cell: RgbaImage) -> RgbaImage {
    let (width, height) = cell.dimensions();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    for (x, y, pixel) in cell.enumerate_pixels() {
        if pixel.0[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x {
        return cell;
    }

    let x0 = min_x.saturating_sub(TRIM_PAD);
    let y0 = min_y.saturating_sub(TRIM_PAD);
    let x1 = (max_x + TRIM_PAD + 1).min(width);
    let y1 = (max_y + TRIM_PAD + 1).min(height);
    image::imageops::crop_imm(&cell, x0, y0, x1 - x0, y1 - y0).to_image()
}

/// Filesystem-safe icon name: alphanumerics kept, the rest underscored,
/// truncated to 20 characters
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(20)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// White sheet with a solid colored square centered in each filled cell
    fn synthetic_sheet(count: usize, cell_size: u32) -> RgbaImage {
        let grid = grid_layout(count);
        let mut sheet = RgbaImage::from_pixel(
            grid.cols as u32 * cell_size,
            grid.rows as u32 * cell_size,
            Rgba([255, 255, 255, 255]),
        );
        for i in 0..count {
            let (row, col) = grid.cell(i);
            let cx = col as u32 * cell_size + cell_size / 2;
            let cy = row as u32 * cell_size + cell_size / 2;
            for dy in 0..cell_size / 4 {
                for dx in 0..cell_size / 4 {
                    sheet.put_pixel(cx + dx, cy + dy, Rgba([30, 60, 90, 255]));
                }
            }
        }
        sheet
    }

    fn slice_synthetic(count: usize) -> (tempfile::TempDir, AssetRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("sheet.png");
        synthetic_sheet(count, 64).save(&sheet_path).unwrap();
        let names: Vec<String> = (0..count).map(|i| format!("Icon {i}")).collect();
        let registry = slice_sheet(&sheet_path, &names, dir.path()).unwrap();
        (dir, registry)
    }

    #[test]
    fn every_name_gets_exactly_one_asset() {
        for count in [1, 3, 8, 12] {
            let (_dir, registry) = slice_synthetic(count);
            assert_eq!(registry.len(), count, "count = {count}");
            for (i, (name, path)) in registry.iter().enumerate() {
                assert_eq!(name, format!("Icon {i}"));
                assert!(path.exists());
                let filename = path.file_name().unwrap().to_string_lossy().to_string();
                assert!(filename.starts_with(&format!("icon_{i}_")));
            }
        }
    }

    #[test]
    fn icons_are_trimmed_and_transparent() {
        let (_dir, registry) = slice_synthetic(2);
        let (_, path) = registry.iter().next().unwrap();
        let icon = image::open(path).unwrap().to_rgba8();
        // trimmed well below the 64px cell: content square is 16px plus pad
        assert!(icon.width() <= 16 + 2 * TRIM_PAD + 1);
        // corners outside the content square are transparent
        assert_eq!(icon.get_pixel(0, 0).0[3], 0);
        // content itself stayed opaque
        assert!(icon.pixels().any(|p| p.0[3] == 255));
    }

    #[test]
    fn missing_sheet_yields_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = slice_sheet(
            &dir.path().join("absent.png"),
            &["A".to_string()],
            dir.path(),
        )
        .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_names_skip_everything() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("sheet.png");
        synthetic_sheet(1, 64).save(&sheet_path).unwrap();
        let registry = slice_sheet(&sheet_path, &[], dir.path()).unwrap();
        assert!(registry.is_empty());
        assert!(!dir.path().join("assets").exists());
    }

    #[test]
    fn names_are_sanitized_for_the_filesystem() {
        assert_eq!(sanitize_name("AI Brain Icon"), "AI_Brain_Icon");
        assert_eq!(sanitize_name("Data/Store: v2"), "Data_Store__v2");
        assert_eq!(sanitize_name("a-very-long-icon-name-indeed").len(), 20);
    }
}
