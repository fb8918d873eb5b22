#![warn(missing_docs)]

//! Preview rendering for the gradcomp model generator.
//!
//! Renders a colored triangle mesh from several seeded random directions
//! and tiles the views into one PNG. Pixels are ray cast against a
//! [`gradcomp_mesh::Bvh`] in parallel.

mod camera;
pub mod error;
mod grid;

pub use camera::Camera;
pub use error::{RenderError, Result};
pub use grid::{render_grid, save_grid, RenderSettings};
