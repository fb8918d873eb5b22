//! Screen lettering and the display surface.

use std::sync::Arc;

use gradcomp_math::{Point2, Vec3};
use gradcomp_mesh::{extract_patch, Mesh, MeshCollider, PatchCriteria, Ray};
use gradcomp_solid::{Bitmap2d, Profile, Solid};
use tracing::{debug, info};

use crate::assets::Asset;
use crate::error::Result;

/// Lettering width as a fraction of the screen's X extent.
const TEXT_WIDTH_FRACTION: f64 = 0.8;

/// How far the lettering stands proud of the screen, toward -Y.
const TEXT_RELIEF: f64 = 0.02;

/// Half-thickness of the shell painted over the display surface.
const PATCH_THICKNESS: f64 = 0.01;

/// Place `text` on the screen: scaled to a fraction of the screen width,
/// centered on the screen in X and Z, extruded through the screen's box
/// along Y.
pub fn screen_text(screen: &Asset, text: Bitmap2d) -> Result<Solid> {
    let bounds = screen.bounds();
    let mid = bounds.center();
    let width = TEXT_WIDTH_FRACTION * bounds.size().x;
    let profile = Profile::fit(text, width, Point2::new(mid.x, mid.z), bounds)?;
    debug!(
        "Screen text scaled to {:.4} units per pixel around ({:.3}, {:.3})",
        profile.scale(),
        mid.x,
        mid.z
    );
    Ok(Solid::Profile(Arc::new(profile)))
}

/// The part of the computer covered by the lettering, pulled forward so it
/// stands out of the screen.
pub fn screen_text_solid(computer: &Solid, text: &Solid) -> Solid {
    Solid::Intersect(vec![computer.clone(), text.clone()])
        .translate(Vec3::new(0.0, -TEXT_RELIEF, 0.0))
}

/// The display surface found on the computer mesh.
#[derive(Debug, Clone)]
pub struct ScreenPatch {
    /// Patch triangles in claim order.
    pub mesh: Mesh,
    /// Thin shell around the patch.
    pub shell: Solid,
}

/// Find the display surface: cast a ray along +Y from the middle of the
/// screen box's front face and grow a near-planar patch from the triangle it
/// hits.
pub fn screen_patch(computer: &Mesh, screen: &Asset) -> Result<ScreenPatch> {
    let bounds = screen.bounds();
    let mut origin = bounds.center();
    origin.y = bounds.min.y;
    let ray = Ray::new(origin, Vec3::y());

    let mut remaining = computer.clone();
    let patch = extract_patch(&mut remaining, &ray, &PatchCriteria::default())?;
    info!(
        "Screen patch has {} triangles ({} left on the body)",
        patch.len(),
        remaining.len()
    );

    let shell = Solid::HollowMesh {
        collider: Arc::new(MeshCollider::new(&patch)),
        thickness: PATCH_THICKNESS,
    };
    Ok(ScreenPatch { mesh: patch, shell })
}
