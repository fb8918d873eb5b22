//! Planar patch selection by region growing over triangle adjacency.
//!
//! A ray picks a seed triangle; the patch then grows breadth-first across
//! shared edges, admitting a neighbor only if its normal is close to a fixed
//! reference axis and close to the normal of the triangle it was reached
//! from. The coplanarity test is local to each step, so a patch may follow
//! a gentle curve as long as every individual hop is flat enough.
//!
//! Traversal never mutates the mesh. Visit state lives in a side table and
//! claimed triangles are removed in a single pass afterwards
//! ([`extract_patch`]).

use std::collections::VecDeque;

use gradcomp_math::Vec3;
use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::{Bvh, Mesh, Ray, Triangle};

/// Admission thresholds for patch growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchCriteria {
    /// Reference axis the patch should face (either direction).
    pub axis: Vec3,
    /// Minimum `|normal · axis|` for a triangle to be admitted.
    pub min_axis_alignment: f64,
    /// Minimum `normal · predecessor_normal` for a triangle to be admitted.
    pub min_neighbor_alignment: f64,
}

impl Default for PatchCriteria {
    fn default() -> Self {
        Self {
            axis: Vec3::y(),
            min_axis_alignment: 0.8,
            min_neighbor_alignment: 0.995,
        }
    }
}

impl PatchCriteria {
    /// Whether a triangle with normal `candidate`, reached from a triangle
    /// with normal `predecessor`, may join the patch.
    pub fn admits(&self, candidate: &Vec3, predecessor: &Vec3) -> bool {
        candidate.dot(&self.axis).abs() >= self.min_axis_alignment
            && candidate.dot(predecessor) >= self.min_neighbor_alignment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Claimed,
    Rejected,
}

/// Select the patch hit by `ray`, returning triangle indices in claim order.
///
/// The first index is always the seed (the nearest triangle along the ray),
/// which is claimed without testing. Fails with
/// [`MeshError::NoSeedCollision`] if the ray misses the mesh.
pub fn select_patch(mesh: &Mesh, ray: &Ray, criteria: &PatchCriteria) -> Result<Vec<usize>> {
    let bvh = Bvh::build(mesh);
    let hit = bvh
        .trace_closest(ray)
        .ok_or_else(|| MeshError::NoSeedCollision {
            origin: ray.origin,
            direction: ray.direction.into_inner(),
        })?;
    debug!(seed = hit.triangle, t = hit.t, "patch seed found");
    Ok(grow_patch(mesh, hit.triangle, criteria))
}

/// Grow a patch from `seed`, returning triangle indices in claim order.
///
/// Each triangle is visited at most once. A neighbor that fails the
/// admission test against the triangle it was first reached from is marked
/// rejected and never reconsidered.
pub fn grow_patch(mesh: &Mesh, seed: usize, criteria: &PatchCriteria) -> Vec<usize> {
    let triangles = mesh.triangles();
    if seed >= triangles.len() {
        return Vec::new();
    }

    let adjacency = mesh.adjacency();
    let normals: Vec<Vec3> = triangles.iter().map(Triangle::normal).collect();
    let mut state = vec![Visit::Unvisited; triangles.len()];

    let mut claimed = vec![seed];
    state[seed] = Visit::Claimed;
    let mut queue = VecDeque::from([seed]);

    while let Some(current) = queue.pop_front() {
        for neighbor in adjacency.neighbors(current) {
            if state[neighbor] != Visit::Unvisited {
                continue;
            }
            if !criteria.admits(&normals[neighbor], &normals[current]) {
                state[neighbor] = Visit::Rejected;
                continue;
            }
            state[neighbor] = Visit::Claimed;
            claimed.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    claimed
}

/// Select the patch hit by `ray` and move its triangles out of `mesh`.
///
/// The returned mesh holds the patch in claim order; `mesh` keeps every
/// other triangle in its original order.
pub fn extract_patch(mesh: &mut Mesh, ray: &Ray, criteria: &PatchCriteria) -> Result<Mesh> {
    let indices = select_patch(mesh, ray, criteria)?;
    let patch = Mesh::from_triangles(mesh.remove_indices(&indices));
    info!(
        patch = patch.len(),
        remaining = mesh.len(),
        "extracted planar patch"
    );
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradcomp_math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// `n × n` unit quads in the plane `y = 0`, facing +Y, starting at `x0`.
    fn grid(n: usize, x0: f64) -> Vec<Triangle> {
        let mut tris = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let (x, z) = (x0 + i as f64, j as f64);
                tris.push(Triangle::new(p(x, 0.0, z), p(x, 0.0, z + 1.0), p(x + 1.0, 0.0, z + 1.0)));
                tris.push(Triangle::new(p(x, 0.0, z), p(x + 1.0, 0.0, z + 1.0), p(x + 1.0, 0.0, z)));
            }
        }
        tris
    }

    fn up_ray(x: f64, z: f64) -> Ray {
        Ray::new(p(x, -1.0, z), Vec3::y())
    }

    /// Every non-seed member must have an earlier member that is adjacent
    /// and admits it.
    fn assert_reachable(mesh: &Mesh, patch: &[usize], criteria: &PatchCriteria) {
        let adj = mesh.adjacency();
        let tris = mesh.triangles();
        for (pos, &idx) in patch.iter().enumerate().skip(1) {
            let ok = patch[..pos].iter().any(|&prev| {
                adj.neighbors(prev).contains(&idx)
                    && criteria.admits(&tris[idx].normal(), &tris[prev].normal())
            });
            assert!(ok, "triangle {idx} is not reachable from an earlier member");
        }
    }

    #[test]
    fn test_flat_grid_fully_claimed_once() {
        let mesh = Mesh::from_triangles(grid(4, 0.0));
        let criteria = PatchCriteria::default();
        let patch = select_patch(&mesh, &up_ray(1.3, 2.6), &criteria).unwrap();

        assert_eq!(patch.len(), 32);
        let mut sorted = patch.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), patch.len(), "duplicate claims");
        assert_reachable(&mesh, &patch, &criteria);
    }

    #[test]
    fn test_extract_removes_claimed_triangles() {
        let mut tris = grid(3, 0.0);
        tris.extend(grid(2, 100.0));
        let mut mesh = Mesh::from_triangles(tris);
        let patch = extract_patch(&mut mesh, &up_ray(0.4, 0.7), &PatchCriteria::default()).unwrap();

        assert_eq!(patch.len(), 18);
        assert_eq!(mesh.len(), 8);
        for t in patch.triangles() {
            assert!(!mesh.triangles().contains(t));
        }
    }

    #[test]
    fn test_disconnected_component_excluded() {
        let mut tris = grid(2, 0.0);
        let island = grid(2, 10.0);
        tris.extend(island.iter().copied());
        let mesh = Mesh::from_triangles(tris);
        let patch = select_patch(&mesh, &up_ray(0.5, 0.2), &PatchCriteria::default()).unwrap();

        assert_eq!(patch.len(), 8);
        assert!(patch.iter().all(|&idx| idx < 8));
    }

    #[test]
    fn test_axis_test_stops_at_wall() {
        let mut tris = grid(1, 0.0);
        // Vertical wall sharing the grid's x = 1 edge, facing +X.
        tris.push(Triangle::new(p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(1.0, 0.0, 1.0)));
        let mut mesh = Mesh::from_triangles(tris);
        let patch = extract_patch(&mut mesh, &up_ray(0.3, 0.6), &PatchCriteria::default()).unwrap();

        assert_eq!(patch.len(), 2);
        assert_eq!(mesh.len(), 1);
        assert!(mesh.triangles()[0].normal().x.abs() > 0.99);
    }

    /// Seed facing +Y, and a neighbor hinged about their shared edge so the
    /// normals' dot product equals `cos`.
    fn hinge(cos: f64) -> Mesh {
        let sin = (1.0 - cos * cos).sqrt();
        let a = p(0.0, 0.0, 0.0);
        let b = p(1.0, 0.0, 0.0);
        Mesh::from_triangles(vec![
            Triangle::new(a, b, p(0.5, 0.0, -1.0)),
            Triangle::new(b, a, p(0.5, sin, cos)),
        ])
    }

    #[test]
    fn test_neighbor_threshold_boundary() {
        let criteria = PatchCriteria::default();
        let ray = up_ray(0.5, -0.3);

        let above = hinge(0.995 + 1e-6);
        assert_eq!(select_patch(&above, &ray, &criteria).unwrap(), vec![0, 1]);

        let below = hinge(0.995 - 1e-6);
        assert_eq!(select_patch(&below, &ray, &criteria).unwrap(), vec![0]);
    }

    /// Nearly flat fold tilted away from +Y: the seed has `normal.y = 0.81`
    /// and the neighbor `normal.y = axis_dot`.
    fn tilted_hinge(axis_dot: f64) -> Mesh {
        let (c0, c1) = (0.81f64, axis_dot);
        let (s0, s1) = ((1.0 - c0 * c0).sqrt(), (1.0 - c1 * c1).sqrt());
        let a = p(0.0, 0.0, 0.0);
        let b = p(1.0, 0.0, 0.0);
        Mesh::from_triangles(vec![
            Triangle::new(a, b, p(0.5, s0, -c0)),
            Triangle::new(b, a, p(0.5, -s1, c1)),
        ])
    }

    #[test]
    fn test_axis_threshold_boundary() {
        let criteria = PatchCriteria::default();
        let ray = up_ray(0.5, -0.3);

        let above = tilted_hinge(0.8 + 1e-6);
        let [seed, neighbor] = [0, 1].map(|i| above.triangles()[i].normal());
        assert!(neighbor.dot(&seed) > criteria.min_neighbor_alignment);
        assert_eq!(select_patch(&above, &ray, &criteria).unwrap(), vec![0, 1]);

        let below = tilted_hinge(0.8 - 1e-6);
        assert_eq!(select_patch(&below, &ray, &criteria).unwrap(), vec![0]);
    }

    #[test]
    fn test_local_drift_is_tolerated() {
        // A strip of quads, each tilted 4 degrees more than the last. The
        // final quad is 16 degrees off the seed but every hop passes.
        let step = 4.0f64.to_radians();
        let mut tris = vec![Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, 0.0, -1.0))];
        let mut a = p(0.0, 0.0, 0.0);
        let mut b = p(1.0, 0.0, 0.0);
        for k in 1..=4 {
            let angle = step * k as f64;
            let rise = Vec3::new(0.0, angle.sin(), angle.cos());
            let (next_a, next_b) = (a + rise, b + rise);
            tris.push(Triangle::new(b, a, next_a));
            tris.push(Triangle::new(b, next_a, next_b));
            a = next_a;
            b = next_b;
        }
        let mesh = Mesh::from_triangles(tris);
        let criteria = PatchCriteria::default();
        let patch = select_patch(&mesh, &up_ray(0.5, -0.3), &criteria).unwrap();

        let seed_normal = mesh.triangles()[0].normal();
        let min_dot = patch
            .iter()
            .map(|&idx| mesh.triangles()[idx].normal().dot(&seed_normal))
            .fold(f64::INFINITY, f64::min);
        assert!(min_dot < 0.995, "patch should drift past the seed threshold");
        assert_reachable(&mesh, &patch, &criteria);
    }

    #[test]
    fn test_rejected_triangle_is_not_readmitted() {
        // Fan of four triangles around the origin: S, P1, X, P2.
        // S reaches P2 first; X fails against P2 but would pass against P1.
        let o = p(0.0, 0.0, 0.0);
        let r0 = p(1.0, 0.0, 0.0);
        let r1 = p(0.0, 0.09, -1.0);
        let r2 = p(-1.0, 0.1005, 0.0);
        let r3 = p(0.0, 0.0, 1.0);
        let s = Triangle::new(o, r0, r1);
        let p1 = Triangle::new(o, r1, r2);
        let x = Triangle::new(o, r2, r3);
        let p2 = Triangle::new(o, r3, r0);
        let criteria = PatchCriteria::default();
        assert!(criteria.admits(&x.normal(), &p1.normal()));
        assert!(!criteria.admits(&x.normal(), &p2.normal()));

        let mut mesh = Mesh::from_triangles(vec![s, p1, x, p2]);
        let patch = extract_patch(&mut mesh, &up_ray(0.3, -0.3), &criteria).unwrap();

        assert_eq!(patch.triangles(), &[s, p2, p1]);
        assert_eq!(mesh.triangles(), &[x]);
    }

    #[test]
    fn test_missing_ray_fails() {
        let mut mesh = Mesh::from_triangles(grid(2, 0.0));
        let err = extract_patch(&mut mesh, &up_ray(50.0, 50.0), &PatchCriteria::default())
            .unwrap_err();
        assert!(matches!(err, MeshError::NoSeedCollision { .. }));
        assert_eq!(mesh.len(), 8, "mesh must be untouched on failure");
    }

    #[test]
    fn test_seed_out_of_range() {
        let mesh = Mesh::from_triangles(grid(1, 0.0));
        assert!(grow_patch(&mesh, 5, &PatchCriteria::default()).is_empty());
    }
}
