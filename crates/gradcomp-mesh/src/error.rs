//! Error types for mesh loading and queries.

use std::path::PathBuf;

use gradcomp_math::{Point3, Vec3};
use thiserror::Error;

/// Errors from mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Reading a mesh file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A mesh file could not be parsed.
    #[error("failed to parse {path}: {details}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        details: String,
    },

    /// Mesh has no triangles.
    #[error("mesh is empty: {0}")]
    EmptyMesh(String),

    /// A seed ray did not hit the mesh.
    #[error("no collision for ray from {origin:?} along {direction:?}")]
    NoSeedCollision {
        /// Ray origin.
        origin: Point3,
        /// Ray direction.
        direction: Vec3,
    },
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
