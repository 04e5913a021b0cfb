//! figgen asset pipeline
//!
//! Icon-worthy concepts in a reference figure are turned into reusable
//! transparent assets in two stages that must agree on geometry:
//!
//! 1. **Compose**: one image-generation request produces a sprite sheet with
//!    every icon placed in a row-major grid cell ([`IconFactory`]).
//! 2. **Slice**: the sheet is partitioned with the *same* grid function,
//!    each cell cleaned to a trimmed transparent PNG and registered by name
//!    ([`slice_sheet`]).
//!
//! The grid function being pure in the icon count is what guarantees slot
//! `i` at composition time is cell `i` at slicing time.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod factory;
pub mod layout;
pub mod registry;
pub mod slice;

pub use error::AssetError;
pub use factory::{IconFactory, SHEET_FILENAME};
pub use layout::{grid_layout, AspectRatio, GridLayout};
pub use registry::AssetRegistry;
pub use slice::slice_sheet;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
