//! Error types for model export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while exporting a model.
#[derive(Error, Debug)]
pub enum ExportError {
    /// One color per triangle is required.
    #[error("got {colors} colors for {triangles} triangles")]
    ColorCountMismatch {
        /// Triangles in the mesh.
        triangles: usize,
        /// Colors supplied.
        colors: usize,
    },

    /// Building the zip archive failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
