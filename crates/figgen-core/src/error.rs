//! Workflow-level errors

use figgen_coder::CoderError;
use figgen_render::RenderError;

/// Errors that abort a run
///
/// Code-class render failures are consumed by the debug loop and never
/// surface here; what does surface is either an environment problem or an
/// exhausted retry budget at a stage the pipeline cannot continue without.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Run directory could not be created or written
    #[error("run directory error: {0}")]
    RunDir(#[from] std::io::Error),

    /// The reference image could not be generated
    #[error("reference image generation failed")]
    Reference,

    /// A model call failed outside the per-round tolerance
    #[error(transparent)]
    Coder(#[from] CoderError),

    /// An environment-class render failure (not repairable by code edits)
    #[error("render environment failure: {0}")]
    Render(#[from] RenderError),

    /// The initial code never executed within the retry budget
    #[error("initial code generation failed after {attempts} attempts")]
    InitialCodeFailed {
        /// Render attempts spent
        attempts: usize,
    },
}
