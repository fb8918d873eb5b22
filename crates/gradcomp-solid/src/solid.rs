//! Implicit solids as a boolean expression tree.
//!
//! A [`Solid`] answers one question: is a point inside? Every node also
//! reports conservative bounds, which the contourer uses to size its grid
//! and the combinators use to skip children cheaply.

use std::sync::Arc;

use gradcomp_math::{Aabb3, Point3, Vec3};
use gradcomp_mesh::MeshCollider;

use crate::profile::Profile;

/// An implicit solid.
///
/// Leaves are primitive shapes or mesh-backed colliders; interior nodes
/// combine children. Mesh and profile payloads sit behind [`Arc`] so that a
/// solid can appear in several trees (the scene and the color rules) without
/// copying its acceleration structures.
#[derive(Debug, Clone)]
pub enum Solid {
    /// Axis-aligned box, boundary inclusive.
    Rect(Aabb3),
    /// Ball.
    Sphere {
        /// Center point.
        center: Point3,
        /// Radius.
        radius: f64,
    },
    /// Circular cone with its apex at `tip`.
    Cone {
        /// Apex.
        tip: Point3,
        /// Center of the base disk.
        base: Point3,
        /// Radius of the base disk.
        radius: f64,
    },
    /// Union of capsules around a polyline.
    Tube(Tube),
    /// Interior of a closed mesh (ray parity).
    Mesh(Arc<MeshCollider>),
    /// Shell of points within `thickness` of a mesh surface.
    HollowMesh {
        /// Surface collider.
        collider: Arc<MeshCollider>,
        /// Shell half-thickness.
        thickness: f64,
    },
    /// 2D profile in the XZ plane, clipped to a box.
    Profile(Arc<Profile>),
    /// Points inside any child.
    Union(Vec<Solid>),
    /// Points inside every child.
    Intersect(Vec<Solid>),
    /// Child shifted by an offset.
    Translate(Box<Solid>, Vec3),
}

impl Solid {
    /// Mesh-backed solid.
    pub fn mesh(collider: MeshCollider) -> Self {
        Solid::Mesh(Arc::new(collider))
    }

    /// Shifted copy of `self`.
    pub fn translate(self, offset: Vec3) -> Self {
        Solid::Translate(Box::new(self), offset)
    }

    /// True if `p` lies inside the solid.
    pub fn contains(&self, p: &Point3) -> bool {
        match self {
            Solid::Rect(aabb) => aabb.contains(p),
            Solid::Sphere { center, radius } => (p - center).norm_squared() <= radius * radius,
            Solid::Cone { tip, base, radius } => cone_contains(tip, base, *radius, p),
            Solid::Tube(tube) => tube.contains(p),
            Solid::Mesh(collider) => collider.contains(p),
            Solid::HollowMesh {
                collider,
                thickness,
            } => collider.near_surface(p, *thickness),
            Solid::Profile(profile) => profile.contains(p),
            Solid::Union(children) => children.iter().any(|c| c.contains(p)),
            Solid::Intersect(children) => {
                !children.is_empty() && children.iter().all(|c| c.contains(p))
            }
            Solid::Translate(child, offset) => child.contains(&(p - offset)),
        }
    }

    /// Conservative bounding box. Every point for which [`Solid::contains`]
    /// is true lies inside it.
    pub fn bounds(&self) -> Aabb3 {
        match self {
            Solid::Rect(aabb) => *aabb,
            Solid::Sphere { center, radius } => {
                Aabb3::from_points([center]).expanded(*radius)
            }
            Solid::Cone { tip, base, radius } => {
                Aabb3::from_points([tip, base]).expanded(*radius)
            }
            Solid::Tube(tube) => tube.bounds,
            Solid::Mesh(collider) => collider.bounds(),
            Solid::HollowMesh {
                collider,
                thickness,
            } => collider.bounds().expanded(*thickness),
            Solid::Profile(profile) => profile.bounds(),
            Solid::Union(children) => children
                .iter()
                .fold(Aabb3::empty(), |acc, c| acc.union(&c.bounds())),
            Solid::Intersect(children) => {
                let mut iter = children.iter();
                match iter.next() {
                    Some(first) => iter.fold(first.bounds(), |acc, c| {
                        acc.intersection(&c.bounds())
                    }),
                    None => Aabb3::empty(),
                }
            }
            Solid::Translate(child, offset) => {
                let inner = child.bounds();
                if inner.is_empty() {
                    inner
                } else {
                    inner.translated(offset)
                }
            }
        }
    }
}

fn cone_contains(tip: &Point3, base: &Point3, radius: f64, p: &Point3) -> bool {
    let axis = tip - base;
    let len_sq = axis.norm_squared();
    if len_sq == 0.0 {
        return false;
    }
    let rel = p - base;
    let frac = rel.dot(&axis) / len_sq;
    if !(0.0..=1.0).contains(&frac) {
        return false;
    }
    let r = radius * (1.0 - frac);
    (rel - axis * frac).norm_squared() <= r * r
}

/// Capsules of a common radius around a chain of segments.
#[derive(Debug, Clone)]
pub struct Tube {
    segments: Vec<(Point3, Point3)>,
    radius: f64,
    bounds: Aabb3,
}

impl Tube {
    /// Tube around explicit segments.
    pub fn new(segments: Vec<(Point3, Point3)>, radius: f64) -> Self {
        let bounds = Aabb3::from_points(segments.iter().flat_map(|(a, b)| [a, b]))
            .expanded(radius);
        Self {
            segments,
            radius,
            bounds,
        }
    }

    /// Tube around the polyline through `points`.
    pub fn through(points: &[Point3], radius: f64) -> Self {
        Self::new(points.windows(2).map(|w| (w[0], w[1])).collect(), radius)
    }

    /// Segments making up the tube's spine.
    pub fn segments(&self) -> &[(Point3, Point3)] {
        &self.segments
    }

    /// True if `p` is within the radius of any segment.
    pub fn contains(&self, p: &Point3) -> bool {
        if self.segments.is_empty() || !self.bounds.contains(p) {
            return false;
        }
        let r2 = self.radius * self.radius;
        self.segments
            .iter()
            .any(|(a, b)| segment_distance_squared(a, b, p) <= r2)
    }
}

fn segment_distance_squared(a: &Point3, b: &Point3, p: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
    };
    (p - (a + ab * t)).norm_squared()
}
