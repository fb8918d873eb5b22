//! Error types for the model pipeline.

use std::path::PathBuf;

use gradcomp_export::ExportError;
use gradcomp_mesh::MeshError;
use gradcomp_render::RenderError;
use gradcomp_solid::SolidError;
use thiserror::Error;

/// Errors from building or writing the model.
#[derive(Error, Debug)]
pub enum GradcompError {
    /// Loading or querying a mesh failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Building or contouring a solid failed.
    #[error(transparent)]
    Solid(#[from] SolidError),

    /// Rendering the preview failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing the archive failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Invalid settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A settings file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not valid TOML for [`crate::Settings`].
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        /// Config file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// Output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, GradcompError>;
