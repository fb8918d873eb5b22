#![warn(missing_docs)]

//! Implicit solids for the gradcomp model generator.
//!
//! # Architecture
//!
//! - [`Solid`] - boolean expression tree of primitive and mesh-backed solids
//! - [`curve`] - planar Bezier curves used to lay out swept tubes
//! - [`profile`] - bitmap profiles placed in world space
//! - [`contour`] - dual contouring of a solid into a triangle mesh
//! - [`color`] - ordered first-match color rules
//!
//! # Example
//!
//! ```ignore
//! use gradcomp_solid::{dual_contour, Solid};
//!
//! let ball = Solid::Sphere { center: Point3::origin(), radius: 1.0 };
//! let contour = dual_contour(&ball, 0.05)?;
//! println!("{} triangles", contour.len());
//! ```

pub mod color;
pub mod contour;
pub mod curve;
pub mod error;
pub mod profile;
mod solid;

pub use color::{ColorRules, ColorSource};
pub use contour::{dual_contour, ContourMesh};
pub use curve::{BezierCurve, Curve2d, JoinedCurve};
pub use error::{Result, SolidError};
pub use profile::{Bitmap2d, Profile};
pub use solid::{Solid, Tube};
