//! Error types for solids and contouring.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or contouring solids.
#[derive(Error, Debug)]
pub enum SolidError {
    /// An image could not be read or decoded.
    #[error("failed to load image {path}: {source}")]
    Image {
        /// Image path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A bitmap has no filled pixels to build a profile from.
    #[error("bitmap has no filled pixels: {0}")]
    EmptyProfile(String),

    /// Contouring resolution must be finite and positive.
    #[error("invalid contour resolution: {0}")]
    InvalidResolution(f64),

    /// Contouring grid would be too large to allocate.
    #[error("contour grid too large: {0} corners")]
    GridTooLarge(usize),

    /// A joined curve needs at least one piece.
    #[error("curve has no pieces")]
    EmptyCurve,
}

/// Result type for solid operations.
pub type Result<T> = std::result::Result<T, SolidError>;
