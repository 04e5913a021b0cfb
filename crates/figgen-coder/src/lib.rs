//! figgen code synthesis and critique clients
//!
//! Pure request/response wrappers around the model backend. Each call builds
//! a strict natural-language prompt from three fixed blocks: the slide
//! library rulebook ([`prompts::PPTX_RULES`]), the drawing-toolkit capability
//! specification ([`prompts::TOOLKIT_SPEC`]) and a raw-source output contract
//! ([`prompts::OUTPUT_CONTRACT`]). The toolkit specification doubles as the
//! authoritative description of the drawing API generated code may use.
//!
//! Structured replies (icon lists, icon descriptions) are parsed permissively
//! through [`extract`]; any parse failure degrades to an empty result, never
//! an error, so the orchestrator's fallback logic stays in one place.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod coder;
pub mod critic;
pub mod error;
pub mod extract;
pub mod prompts;

pub use coder::Coder;
pub use critic::Critic;
pub use error::CoderError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
