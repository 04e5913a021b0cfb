//! Workflow configuration

use std::path::PathBuf;

/// Actor-critic rounds per run
pub const DEFAULT_MAX_ITERATIONS: usize = 2;

/// Repair attempts after the first failed execution of a stage
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Slide width in centimeters (16:9 widescreen)
pub const CANVAS_WIDTH_CM: f64 = 33.867;

/// Slide height in centimeters
pub const CANVAS_HEIGHT_CM: f64 = 19.05;

/// Tunables for one workflow run
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Actor-critic rounds
    pub max_iterations: usize,
    /// Repair attempts per debug loop
    pub max_retries: usize,
    /// Slide canvas in centimeters (width, height)
    pub canvas_cm: (f64, f64),
    /// Root under which timestamped run directories are created
    pub output_root: PathBuf,
    /// Whether to retrieve style references before generating the reference
    pub retrieval_enabled: bool,
    /// Local drawing-toolkit file copied into each run directory, if any
    pub toolkit_path: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_retries: DEFAULT_MAX_RETRIES,
            canvas_cm: (CANVAS_WIDTH_CM, CANVAS_HEIGHT_CM),
            output_root: PathBuf::from("output"),
            retrieval_enabled: false,
            toolkit_path: None,
        }
    }
}

impl WorkflowConfig {
    /// Start from defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the round budget
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, rounds: usize) -> Self {
        self.max_iterations = rounds;
        self
    }

    /// Override the repair budget
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override where run directories are created
    #[inline]
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Turn reference retrieval on or off
    #[inline]
    #[must_use]
    pub fn with_retrieval(mut self, enabled: bool) -> Self {
        self.retrieval_enabled = enabled;
        self
    }

    /// Copy this drawing-toolkit file into each run directory
    #[inline]
    #[must_use]
    pub fn with_toolkit(mut self, path: impl Into<PathBuf>) -> Self {
        self.toolkit_path = Some(path.into());
        self
    }
}
