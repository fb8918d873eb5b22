//! Named model assets.

use std::path::{Path, PathBuf};

use gradcomp_math::Aabb3;
use gradcomp_mesh::{load_stl, Mesh, MeshCollider};
use gradcomp_solid::{Bitmap2d, Solid};
use tracing::debug;

use crate::error::Result;

/// Laptop body.
pub const COMPUTER: &str = "computer";
/// Region of the body painted in the accent color.
pub const BASE: &str = "base";
/// Box around the display; positions the text and the patch ray.
pub const SCREEN: &str = "screen";
/// Board of the graduation cap.
pub const HAT_BASE: &str = "hat_base";
/// Bitmap of the screen lettering.
pub const TEXT_IMAGE: &str = "text.png";

/// A mesh and the solid it bounds.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Asset name, without extension.
    pub name: String,
    /// Triangles as read from disk.
    pub mesh: Mesh,
    /// Ray-parity solid over `mesh`.
    pub solid: Solid,
}

impl Asset {
    /// Wrap an in-memory mesh.
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let solid = Solid::mesh(MeshCollider::new(&mesh));
        Self {
            name: name.into(),
            mesh,
            solid,
        }
    }

    /// Bounds of the mesh.
    pub fn bounds(&self) -> Aabb3 {
        self.mesh.bounds()
    }
}

/// Directory of STL assets and the text bitmap.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    /// Assets under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory this loader reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>.stl`.
    pub fn stl_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.stl", name))
    }

    /// Load `<root>/<name>.stl`.
    pub fn load(&self, name: &str) -> Result<Asset> {
        let path = self.stl_path(name);
        debug!("Loading asset {} from {}", name, path.display());
        let mesh = load_stl(&path)?;
        Ok(Asset::from_mesh(name, mesh))
    }

    /// Load the screen lettering bitmap.
    pub fn load_text(&self) -> Result<Bitmap2d> {
        Ok(Bitmap2d::load(&self.root.join(TEXT_IMAGE))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradcomp_math::Point3;
    use gradcomp_mesh::{save_stl, MeshError};

    use crate::error::GradcompError;

    #[test]
    fn test_load_asset() {
        let dir = tempfile::tempdir().unwrap();
        let cube = Mesh::cuboid(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        save_stl(&cube, &dir.path().join("hat_base.stl")).unwrap();

        let assets = AssetDir::new(dir.path());
        let asset = assets.load(HAT_BASE).unwrap();
        assert_eq!(asset.name, "hat_base");
        assert_eq!(asset.mesh.len(), 12);
        assert_eq!(asset.bounds().max, Point3::new(1.0, 2.0, 3.0));
        assert!(asset.solid.contains(&Point3::new(0.5, 1.0, 1.5)));
        assert!(!asset.solid.contains(&Point3::new(0.5, 1.0, 3.5)));
    }

    #[test]
    fn test_missing_asset_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetDir::new(dir.path()).load(COMPUTER).unwrap_err();
        assert!(matches!(err, GradcompError::Mesh(MeshError::Io { .. })));
    }

    #[test]
    fn test_missing_text_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AssetDir::new(dir.path()).load_text(),
            Err(GradcompError::Solid(_))
        ));
    }
}
