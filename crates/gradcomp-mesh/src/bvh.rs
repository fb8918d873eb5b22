//! Bounding Volume Hierarchy over mesh triangles.
//!
//! Uses Surface Area Heuristic (SAH) for construction. The hierarchy is the
//! collider for every ray and proximity query in the workspace: seed picking,
//! ray-parity containment and preview rendering.

use std::sync::Arc;

use gradcomp_math::{Aabb3, Point3};

use crate::{Mesh, Ray, RayHit, Triangle};

/// Leaves hold at most this many triangles.
const MAX_LEAF_SIZE: usize = 4;

/// A BVH node - either a leaf containing triangles or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Triangle indices contained in this leaf.
        triangles: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy for accelerated ray-triangle queries.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
    triangles: Arc<[Triangle]>,
}

impl Bvh {
    /// Build a BVH from a mesh using SAH construction.
    pub fn build(mesh: &Mesh) -> Self {
        Self::from_triangles(mesh.triangles())
    }

    /// Build a BVH from a triangle slice. Triangle indices in hits refer to
    /// positions in `triangles`.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let triangles: Arc<[Triangle]> = triangles.into();

        let mut tri_data: Vec<(usize, Aabb3, Point3)> = triangles
            .iter()
            .enumerate()
            .map(|(idx, tri)| {
                let aabb = tri.aabb();
                (idx, aabb, aabb.center())
            })
            .collect();

        let root = if tri_data.is_empty() {
            None
        } else {
            Some(build_node(&mut tri_data))
        };

        Self { root, triangles }
    }

    /// Triangles covered by this hierarchy.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Bounds of every triangle; empty if there are none.
    pub fn bounds(&self) -> Aabb3 {
        self.root
            .as_ref()
            .map(|root| *root.aabb())
            .unwrap_or_else(Aabb3::empty)
    }

    /// Trace a ray through the BVH, returning all intersections sorted by t.
    pub fn trace(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();

        if let Some(ref root) = self.root {
            self.trace_node(ray, root, &mut hits);
        }

        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Trace a ray and return only the closest hit.
    pub fn trace_closest(&self, ray: &Ray) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        let mut closest_t = f64::INFINITY;

        if let Some(ref root) = self.root {
            self.trace_node_closest(ray, root, &mut closest, &mut closest_t);
        }

        closest
    }

    /// Count ray-triangle crossings without materializing hits.
    pub fn count_crossings(&self, ray: &Ray) -> usize {
        let mut count = 0;
        if let Some(ref root) = self.root {
            self.count_node(ray, root, &mut count);
        }
        count
    }

    /// True if any triangle lies within `radius` of `point`.
    pub fn any_within(&self, point: &Point3, radius: f64) -> bool {
        let r2 = radius * radius;
        match self.root {
            Some(ref root) => self.within_node(point, r2, root),
            None => false,
        }
    }

    fn hit(&self, ray: &Ray, idx: usize) -> Option<RayHit> {
        let tri = &self.triangles[idx];
        tri.intersect_ray(ray).map(|t| RayHit {
            t,
            point: ray.at(t),
            normal: tri.normal(),
            triangle: idx,
        })
    }

    fn trace_node(&self, ray: &Ray, node: &BvhNode, hits: &mut Vec<RayHit>) {
        match node {
            BvhNode::Leaf { aabb, triangles } => {
                if ray.intersect_aabb(aabb).is_some() {
                    hits.extend(triangles.iter().filter_map(|&idx| self.hit(ray, idx)));
                }
            }
            BvhNode::Internal { aabb, left, right } => {
                if ray.intersect_aabb(aabb).is_some() {
                    self.trace_node(ray, left, hits);
                    self.trace_node(ray, right, hits);
                }
            }
        }
    }

    fn trace_node_closest(
        &self,
        ray: &Ray,
        node: &BvhNode,
        closest: &mut Option<RayHit>,
        closest_t: &mut f64,
    ) {
        match node {
            BvhNode::Leaf { aabb, triangles } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    if t_min > *closest_t {
                        return;
                    }

                    for &idx in triangles {
                        if let Some(hit) = self.hit(ray, idx) {
                            if hit.t < *closest_t {
                                *closest_t = hit.t;
                                *closest = Some(hit);
                            }
                        }
                    }
                }
            }
            BvhNode::Internal { aabb, left, right } => {
                if let Some((t_min, _)) = ray.intersect_aabb(aabb) {
                    if t_min > *closest_t {
                        return;
                    }

                    // Visit the nearer child first so the farther one can be culled
                    let left_t = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
                    let right_t = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);

                    match (left_t, right_t) {
                        (Some(lt), Some(rt)) => {
                            if lt <= rt {
                                self.trace_node_closest(ray, left, closest, closest_t);
                                self.trace_node_closest(ray, right, closest, closest_t);
                            } else {
                                self.trace_node_closest(ray, right, closest, closest_t);
                                self.trace_node_closest(ray, left, closest, closest_t);
                            }
                        }
                        (Some(_), None) => {
                            self.trace_node_closest(ray, left, closest, closest_t);
                        }
                        (None, Some(_)) => {
                            self.trace_node_closest(ray, right, closest, closest_t);
                        }
                        (None, None) => {}
                    }
                }
            }
        }
    }

    fn count_node(&self, ray: &Ray, node: &BvhNode, count: &mut usize) {
        match node {
            BvhNode::Leaf { aabb, triangles } => {
                if ray.intersect_aabb(aabb).is_some() {
                    *count += triangles
                        .iter()
                        .filter(|&&idx| self.triangles[idx].intersect_ray(ray).is_some())
                        .count();
                }
            }
            BvhNode::Internal { aabb, left, right } => {
                if ray.intersect_aabb(aabb).is_some() {
                    self.count_node(ray, left, count);
                    self.count_node(ray, right, count);
                }
            }
        }
    }

    fn within_node(&self, point: &Point3, r2: f64, node: &BvhNode) -> bool {
        if node.aabb().distance_squared(point) > r2 {
            return false;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => triangles
                .iter()
                .any(|&idx| self.triangles[idx].distance_squared(point) <= r2),
            BvhNode::Internal { left, right, .. } => {
                self.within_node(point, r2, left) || self.within_node(point, r2, right)
            }
        }
    }
}

/// Build a BVH node recursively using SAH.
fn build_node(tri_data: &mut [(usize, Aabb3, Point3)]) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in tri_data.iter() {
        bounds.include_aabb(aabb);
    }

    if tri_data.len() <= MAX_LEAF_SIZE {
        return BvhNode::Leaf {
            aabb: bounds,
            triangles: tri_data.iter().map(|(idx, _, _)| *idx).collect(),
        };
    }

    let (best_axis, best_pos) = find_best_split(tri_data, &bounds);
    let mut mid = partition(tri_data, best_axis, best_pos);

    // Fallback if partition fails
    if mid == 0 || mid == tri_data.len() {
        mid = tri_data.len() / 2;
    }

    let (left_data, right_data) = tri_data.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_data)),
        right: Box::new(build_node(right_data)),
    }
}

/// Find the best split axis and position using SAH.
fn find_best_split(tri_data: &[(usize, Aabb3, Point3)], bounds: &Aabb3) -> (usize, f64) {
    const NUM_BUCKETS: usize = 12;

    let extent = bounds.size();
    let total_area = bounds.surface_area().max(1e-300);

    let mut best_cost = f64::INFINITY;
    let mut best_axis = 0;
    let mut best_pos = 0.0;

    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = bounds.min[axis];

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        for (_, aabb, centroid) in tri_data {
            let b = ((centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(aabb);
        }

        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                left_bounds.include_aabb(&bucket_bounds[i]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                right_bounds.include_aabb(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = 0.125
                + left_bounds.surface_area() / total_area * left_count as f64
                + right_bounds.surface_area() / total_area * right_count as f64;

            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent;
            }
        }
    }

    (best_axis, best_pos)
}

/// Partition triangles by centroid along an axis.
fn partition(tri_data: &mut [(usize, Aabb3, Point3)], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = tri_data.len();

    while left < right {
        if tri_data[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            tri_data.swap(left, right);
        }
    }

    left
}
