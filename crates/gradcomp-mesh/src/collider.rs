//! Mesh-backed spatial queries: ray collisions, containment and proximity.

use gradcomp_math::{Aabb3, Point3, Vec3};

use crate::{Bvh, Mesh, Ray, RayHit};

/// Direction used for ray-parity containment tests. Off every axis and
/// diagonal so grid-aligned query points rarely land on a triangle edge.
fn parity_direction() -> Vec3 {
    Vec3::new(0.912_345, 0.213_579, 0.349_871)
}

/// A collider over a closed (watertight) mesh.
#[derive(Debug, Clone)]
pub struct MeshCollider {
    bvh: Bvh,
}

impl MeshCollider {
    /// Build a collider for `mesh`.
    pub fn new(mesh: &Mesh) -> Self {
        Self {
            bvh: Bvh::build(mesh),
        }
    }

    /// Bounds of the underlying mesh.
    pub fn bounds(&self) -> Aabb3 {
        self.bvh.bounds()
    }

    /// The hierarchy this collider queries.
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Nearest triangle hit along `ray`.
    pub fn first_ray_collision(&self, ray: &Ray) -> Option<RayHit> {
        self.bvh.trace_closest(ray)
    }

    /// Ray-parity containment: a point is inside if a ray from it crosses
    /// the surface an odd number of times.
    pub fn contains(&self, point: &Point3) -> bool {
        if !self.bounds().contains(point) {
            return false;
        }
        let ray = Ray::new(*point, parity_direction());
        self.bvh.count_crossings(&ray) % 2 == 1
    }

    /// True if `point` lies within `thickness` of the surface.
    pub fn near_surface(&self, point: &Point3, thickness: f64) -> bool {
        if self.bounds().distance_squared(point) > thickness * thickness {
            return false;
        }
        self.bvh.any_within(point, thickness)
    }
}
