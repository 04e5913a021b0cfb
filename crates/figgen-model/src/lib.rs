//! figgen model transport layer
//!
//! Wraps the external completion, vision, image-generation and embedding
//! services behind one [`ModelBackend`] trait. Everything above this crate
//! treats those services as opaque and at-least-sometimes-failing: every
//! method returns a [`ModelError`] that callers are expected to recover from.
//!
//! # Example
//!
//! ```rust,ignore
//! use figgen_model::{ChatRequest, HttpBackend, ModelBackend, ModelConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new(ModelConfig::from_env());
//! let req = ChatRequest::new("Describe this diagram", "gpt-5")
//!     .with_image("run/00_reference.png");
//! let reply = backend.chat(&req).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod request;

pub use backend::ModelBackend;
pub use config::ModelConfig;
pub use error::ModelError;
pub use http::HttpBackend;
pub use request::{ChatRequest, ImageRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
