//! Error types for preview rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering a preview.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Nothing to look at.
    #[error("cannot render an empty mesh")]
    EmptyMesh,

    /// One color per triangle is required.
    #[error("got {colors} colors for {triangles} triangles")]
    ColorCountMismatch {
        /// Triangles in the mesh.
        triangles: usize,
        /// Colors supplied.
        colors: usize,
    },

    /// Invalid render settings.
    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    /// Encoding or writing the image failed.
    #[error("failed to write {path}: {source}")]
    Image {
        /// Output path.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
