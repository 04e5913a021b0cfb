//! figgen workflow orchestrator
//!
//! Drives the whole closed loop for one requirement: retrieve style
//! references, generate the visual reference image, prepare icon assets,
//! synthesize drawing code, render it, and iterate actor-critic rounds until
//! the round budget is spent. Every intermediate artifact is persisted into
//! the run directory as it is produced, so a failed run leaves its partial
//! output behind for inspection.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod task;
pub mod workflow;

pub use config::WorkflowConfig;
pub use error::WorkflowError;
pub use task::TaskRun;
pub use workflow::{RunSummary, WorkflowManager};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
