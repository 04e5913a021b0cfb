//! figgen reference retrieval and style extraction
//!
//! An offline-built corpus of journal figures (metadata JSON plus a dense
//! vector index) is searched by cosine similarity against an embedded query.
//! The retrieved figures are then reverse-engineered into a structured
//! [`StyleGuide`] that biases reference-image generation.
//!
//! The whole module is advisory: a missing index, a failed retrieval, or an
//! unparseable style analysis never aborts a run. Everything degrades to
//! empty results or the fixed default style guide.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod index;
pub mod researcher;
pub mod style;

pub use config::RetrievalConfig;
pub use error::RetrievalError;
pub use index::{ReferenceMeta, VectorIndex};
pub use researcher::{RetrievedReference, VisualResearcher};
pub use style::StyleGuide;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
