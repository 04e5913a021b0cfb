//! Document format conversion via external tools
//!
//! Both converters are black boxes invoked as blocking subprocesses. Their
//! failures are environment problems, never code problems, and are reported
//! as such (see [`RenderError::is_code_error`]).

use crate::config::RenderConfig;
use crate::error::RenderError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Convert the slide document to PDF next to it in the run directory
///
/// The converter writes into its own staging directory; the PDF is then
/// moved into the run directory beside the document.
pub(crate) async fn document_to_pdf(
    config: &RenderConfig,
    document: &Path,
) -> Result<PathBuf, RenderError> {
    let run_dir = document
        .parent()
        .ok_or_else(|| RenderError::Conversion("document has no parent directory".to_string()))?;
    let stem = document
        .file_stem()
        .ok_or_else(|| RenderError::Conversion("document has no file stem".to_string()))?;
    let pdf_name = format!("{}.pdf", stem.to_string_lossy());
    let staged_pdf = config.staging_dir.join(&pdf_name);
    let final_pdf = run_dir.join(&pdf_name);

    tracing::info!(document = %document.display(), "converting document to PDF");
    let output = Command::new(&config.converter)
        .arg(format!("-env:UserInstallation={}", config.converter_profile))
        .arg("--headless")
        .arg("--nologo")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(&config.staging_dir)
        .arg(document)
        .output()
        .await
        .map_err(|e| RenderError::Conversion(format!("failed to spawn converter: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RenderError::Conversion(format!(
            "converter exited {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }
    if !staged_pdf.exists() {
        return Err(RenderError::Conversion(format!(
            "PDF not generated: {}",
            staged_pdf.display()
        )));
    }

    // rename can fail across filesystems; fall back to copy + remove
    if tokio::fs::rename(&staged_pdf, &final_pdf).await.is_err() {
        tokio::fs::copy(&staged_pdf, &final_pdf).await?;
        tokio::fs::remove_file(&staged_pdf).await.ok();
    }
    tracing::info!(pdf = %final_pdf.display(), "PDF moved into run directory");
    Ok(final_pdf)
}

/// Rasterise the first page of the PDF at the configured resolution
pub(crate) async fn pdf_to_png(
    config: &RenderConfig,
    pdf: &Path,
) -> Result<PathBuf, RenderError> {
    let stem = pdf
        .file_stem()
        .ok_or_else(|| RenderError::Raster("pdf has no file stem".to_string()))?;
    let out_base = pdf.with_file_name(stem.to_string_lossy().to_string());
    let png_path = out_base.with_extension("png");

    tracing::info!(pdf = %pdf.display(), dpi = config.raster_dpi, "rasterising first page");
    let output = Command::new(&config.rasterizer)
        .arg("-png")
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .arg("-r")
        .arg(config.raster_dpi.to_string())
        .arg("-singlefile")
        .arg(pdf)
        .arg(&out_base)
        .output()
        .await
        .map_err(|e| RenderError::Raster(format!("failed to spawn rasteriser: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RenderError::Raster(format!(
            "rasteriser exited {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }
    if !png_path.exists() {
        return Err(RenderError::Raster(format!(
            "PNG not generated: {}",
            png_path.display()
        )));
    }
    Ok(png_path)
}
