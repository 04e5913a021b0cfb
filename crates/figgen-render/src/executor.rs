//! Script execution and artifact recovery
//!
//! The generated script is written into the run directory and executed there
//! as a separate process under a hard wall-clock deadline. Exit status and
//! artifact presence are independent requirements: a clean exit that produced
//! no discoverable document is still a failure.

use crate::config::RenderConfig;
use crate::convert;
use crate::error::RenderError;
use crate::sanitize::sanitize_code;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Filename generated code is instructed to save as
pub const CONVENTION_FILENAME: &str = "temp_render.pptx";

/// Artifacts of one successful render attempt
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The executed script
    pub script: PathBuf,
    /// Canonical slide document (`{base}.pptx`)
    pub document: PathBuf,
    /// Intermediate PDF
    pub intermediate: PathBuf,
    /// First-page raster preview
    pub raster: PathBuf,
}

/// The rendering seam: code text in, raster preview out
///
/// Production uses [`RenderExecutor`]; tests substitute scripted fakes.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Execute `code` inside `output_dir` and convert the produced document
    /// down to a raster preview named after `name_base`
    async fn render(
        &self,
        code: &str,
        output_dir: &Path,
        name_base: &str,
    ) -> Result<Rendered, RenderError>;
}

/// Subprocess-backed render pipeline
#[derive(Debug, Clone)]
pub struct RenderExecutor {
    config: RenderConfig,
}

impl RenderExecutor {
    /// Create an executor from configuration
    #[inline]
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Access the configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Sanitise, persist and execute the script, then locate the document
    ///
    /// Returns the script path and the canonical document path. Discovery
    /// order: the convention filename first (renamed to `{base}.pptx`,
    /// last-writer-wins), then an already-canonical `{base}.pptx` left by the
    /// model hardcoding the final name. Anything else fails explicitly even
    /// on a clean exit.
    pub async fn execute(
        &self,
        code: &str,
        output_dir: &Path,
        name_base: &str,
    ) -> Result<(PathBuf, PathBuf), RenderError> {
        let code = sanitize_code(code);

        let script_path = output_dir.join(format!("{name_base}_script.py"));
        tokio::fs::write(&script_path, &code)
            .await
            .map_err(|source| RenderError::ScriptWrite {
                path: script_path.clone(),
                source,
            })?;

        tracing::info!(script = %script_path.display(), "running generated script");
        let child = Command::new(&self.config.interpreter)
            .arg(script_path.file_name().unwrap_or_default())
            .current_dir(output_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.config.timeout, child).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.timeout.as_secs(),
                    "script exceeded wall-clock deadline"
                );
                return Err(RenderError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let log = if !stderr.is_empty() {
                stderr
            } else if !stdout.is_empty() {
                stdout
            } else {
                "Unknown runtime error (exit code non-zero but no log).".to_string()
            };
            tracing::warn!(exit = ?output.status.code(), "script execution failed");
            return Err(RenderError::Script(log));
        }

        let document = self.locate_document(output_dir, name_base).await?;
        Ok((script_path, document))
    }

    async fn locate_document(
        &self,
        output_dir: &Path,
        name_base: &str,
    ) -> Result<PathBuf, RenderError> {
        let convention_path = output_dir.join(CONVENTION_FILENAME);
        let canonical_path = output_dir.join(format!("{name_base}.pptx"));

        if convention_path.exists() {
            // last-writer-wins: a canonical file from a previous attempt goes first
            if canonical_path.exists() {
                tokio::fs::remove_file(&canonical_path).await?;
            }
            tokio::fs::rename(&convention_path, &canonical_path).await?;
            tracing::info!(document = %canonical_path.display(), "document recovered (renamed)");
            return Ok(canonical_path);
        }

        if canonical_path.exists() {
            tracing::info!(document = %canonical_path.display(), "document recovered (direct hit)");
            return Ok(canonical_path);
        }

        // a stray .pptx could belong to any earlier round; refusing to guess
        // beats adopting the wrong file
        let mut found = Vec::new();
        let mut entries = tokio::fs::read_dir(output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".pptx") {
                found.push(name);
            }
        }
        tracing::warn!(?found, "expected document missing after clean exit");
        Err(RenderError::MissingArtifact {
            expected: CONVENTION_FILENAME.to_string(),
            found,
        })
    }
}

#[async_trait]
impl DocumentRenderer for RenderExecutor {
    async fn render(
        &self,
        code: &str,
        output_dir: &Path,
        name_base: &str,
    ) -> Result<Rendered, RenderError> {
        let (script, document) = self.execute(code, output_dir, name_base).await?;
        let intermediate = convert::document_to_pdf(&self.config, &document).await?;
        let raster = convert::pdf_to_png(&self.config, &intermediate).await?;
        Ok(Rendered {
            script,
            document,
            intermediate,
            raster,
        })
    }
}
