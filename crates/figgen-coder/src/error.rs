//! Synthesis client errors

use figgen_model::ModelError;

/// Errors from synthesis and critique calls
///
/// Only calls whose result is indispensable (synthesis, repair, revision,
/// critique) surface errors; advisory calls (icon planning, descriptions)
/// degrade to empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    /// The underlying model call failed or returned nothing
    #[error("model call failed: {0}")]
    Model(#[from] ModelError),
}
