//! Asset pipeline errors

/// Errors from sheet slicing and asset persistence
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Filesystem failure while writing assets
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Sheet image failed to decode or an icon failed to encode
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
