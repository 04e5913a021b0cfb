//! Run-directory ownership and artifact naming
//!
//! A [`TaskRun`] owns one run directory and is the only writer of its
//! top-level artifacts. File names follow a fixed scheme so a directory
//! listing reads as the run's history:
//!
//! ```text
//! requirement.txt
//! 00_reference.png
//! 01_code_iter_0_draft.py      01_code_iter_0_try_0.png ...
//! 01_code_iter_0_final.py
//! 01_critique_iter_1.txt       (written at the start of round 1)
//! 02_code_iter_1_*             (round 1 revision)
//! ```

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

/// One run's directory plus its naming scheme
#[derive(Debug, Clone)]
pub struct TaskRun {
    dir: PathBuf,
}

impl TaskRun {
    /// Use an explicit directory, creating it if needed
    pub fn at(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Create a fresh timestamped directory under `root`
    pub fn create_timestamped(root: &Path) -> std::io::Result<Self> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let dir = root.join(format!("task_{stamp}"));
        std::fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "run directory created");
        Ok(Self { dir })
    }

    /// The run directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of a named artifact inside the run
    #[inline]
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Persist a text artifact
    pub async fn save_text(&self, name: &str, content: &str) -> std::io::Result<()> {
        tokio::fs::write(self.path(name), content).await
    }

    /// Stage prefix for the initial synthesis
    #[inline]
    #[must_use]
    pub fn init_prefix() -> String {
        Self::stage_prefix(0)
    }

    /// Stage prefix for iteration `n`: `{n+1:02}_code_iter_{n}`
    #[inline]
    #[must_use]
    pub fn stage_prefix(iteration: usize) -> String {
        format!("{:02}_code_iter_{}", iteration + 1, iteration)
    }

    /// Critique file for round `round` (1-based)
    #[inline]
    #[must_use]
    pub fn critique_filename(round: usize) -> String {
        format!("{round:02}_critique_iter_{round}.txt")
    }
}

/// Artifact names produced inside one generate/debug stage
#[derive(Debug, Clone)]
pub struct StageNames {
    prefix: String,
}

impl StageNames {
    /// Names under the given prefix
    #[inline]
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// First code draft: `{prefix}_draft.py`
    #[must_use]
    pub fn draft(&self) -> String {
        format!("{}_draft.py", self.prefix)
    }

    /// Render base name for attempt `k`: `{prefix}_try_{k}`
    #[must_use]
    pub fn attempt(&self, k: usize) -> String {
        format!("{}_try_{}", self.prefix, k)
    }

    /// Error log for attempt `k`: `{prefix}_error_log_try_{k}.txt`
    #[must_use]
    pub fn error_log(&self, k: usize) -> String {
        format!("{}_error_log_try_{}.txt", self.prefix, k)
    }

    /// Repaired code after attempt `k`: `{prefix}_fix_{k+1}.py`
    #[must_use]
    pub fn fix(&self, k: usize) -> String {
        format!("{}_fix_{}.py", self.prefix, k + 1)
    }

    /// Accepted code: `{prefix}_final.py`
    #[must_use]
    pub fn final_code(&self) -> String {
        format!("{}_final.py", self.prefix)
    }
}
