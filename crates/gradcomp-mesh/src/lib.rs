#![warn(missing_docs)]

//! Triangle meshes for the gradcomp model generator.
//!
//! # Architecture
//!
//! - [`Mesh`] - ordered triangle list with on-demand edge adjacency
//! - [`Ray`] / [`RayHit`] - rays and intersection results
//! - [`bvh`] - SAH bounding volume hierarchy over triangles
//! - [`MeshCollider`] - ray-parity containment and surface proximity
//! - [`patch`] - flood-fill selection of a near-planar surface patch
//!
//! # Example
//!
//! ```ignore
//! use gradcomp_mesh::{load_stl, extract_patch, PatchCriteria, Ray};
//!
//! let mut computer = load_stl(Path::new("assets/computer.stl"))?;
//! let ray = Ray::new(Point3::new(0.0, -1.0, 0.0), Vec3::y());
//! let screen = extract_patch(&mut computer, &ray, &PatchCriteria::default())?;
//! ```

mod adjacency;
pub mod bvh;
mod collider;
pub mod error;
mod io;
mod mesh;
pub mod patch;
mod ray;
mod triangle;

pub use adjacency::MeshAdjacency;
pub use bvh::{Bvh, BvhNode};
pub use collider::MeshCollider;
pub use error::{MeshError, Result};
pub use io::{load_stl, save_stl};
pub use mesh::Mesh;
pub use patch::{extract_patch, grow_patch, select_patch, PatchCriteria};
pub use ray::{Ray, RayHit};
pub use triangle::Triangle;
