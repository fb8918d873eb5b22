#![warn(missing_docs)]

//! Model export for the gradcomp model generator.
//!
//! Writes a triangle mesh with per-triangle colors as a zip archive holding
//! an OBJ file and its MTL material library.
//!
//! # Example
//!
//! ```ignore
//! use gradcomp_export::save_material_obj;
//!
//! save_material_obj(Path::new("computer.zip"), &mesh, &colors)?;
//! ```

pub mod error;
mod obj;

pub use error::{ExportError, Result};
pub use obj::{save_material_obj, MaterialObj, MTL_ENTRY, OBJ_ENTRY};
