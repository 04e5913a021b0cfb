//! figgen render executor
//!
//! Takes generated drawing code, executes it in an isolated subprocess with a
//! hard wall-clock deadline, recovers the produced slide document, and
//! converts it through PDF into a raster preview. The converters themselves
//! (LibreOffice, pdftoppm) are opaque external tools; this crate only
//! orchestrates them and classifies their failures.
//!
//! Failure classes matter downstream: script errors, timeouts and missing
//! artifacts feed the automatic repair loop, while converter failures are
//! environment problems that no code fix can address
//! (see [`RenderError::is_code_error`]).

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod convert;
pub mod error;
pub mod executor;
pub mod sanitize;

pub use config::RenderConfig;
pub use error::RenderError;
pub use executor::{DocumentRenderer, Rendered, RenderExecutor, CONVENTION_FILENAME};
pub use sanitize::sanitize_code;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
