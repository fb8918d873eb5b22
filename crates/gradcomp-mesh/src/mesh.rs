//! Triangle soup meshes.

use gradcomp_math::{Aabb3, Point3, Vec3};

use crate::adjacency::MeshAdjacency;
use crate::Triangle;

/// An ordered collection of triangles.
///
/// Triangles are stored by value; connectivity is recovered from shared
/// vertex positions by [`MeshAdjacency`] when needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from a triangle list.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Closed axis-aligned box with outward-facing triangles.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let p = |i: usize, j: usize, k: usize| {
            Point3::new(
                if i == 0 { min.x } else { max.x },
                if j == 0 { min.y } else { max.y },
                if k == 0 { min.z } else { max.z },
            )
        };
        let quads = [
            [p(0, 0, 0), p(0, 1, 0), p(1, 1, 0), p(1, 0, 0)],
            [p(0, 0, 1), p(1, 0, 1), p(1, 1, 1), p(0, 1, 1)],
            [p(0, 0, 0), p(1, 0, 0), p(1, 0, 1), p(0, 0, 1)],
            [p(0, 1, 0), p(0, 1, 1), p(1, 1, 1), p(1, 1, 0)],
            [p(0, 0, 0), p(0, 0, 1), p(0, 1, 1), p(0, 1, 0)],
            [p(1, 0, 0), p(1, 1, 0), p(1, 1, 1), p(1, 0, 1)],
        ];
        let mut triangles = Vec::with_capacity(12);
        for [a, b, c, d] in quads {
            triangles.push(Triangle::new(a, b, c));
            triangles.push(Triangle::new(a, c, d));
        }
        Self { triangles }
    }

    /// All triangles, in insertion order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Consume the mesh, returning its triangles.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a triangle.
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Bounding box of every vertex. Empty meshes give an empty box.
    pub fn bounds(&self) -> Aabb3 {
        Aabb3::from_points(self.triangles.iter().flat_map(|t| t.vertices.iter()))
    }

    /// Copy of the mesh shifted by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Mesh {
        Mesh::from_triangles(self.triangles.iter().map(|t| t.translated(offset)).collect())
    }

    /// Build the shared-edge adjacency for the current triangles.
    pub fn adjacency(&self) -> MeshAdjacency {
        MeshAdjacency::build(&self.triangles)
    }

    /// Remove the triangles at `indices` and return them in the order given.
    ///
    /// Out-of-range and repeated indices are ignored. Remaining triangles keep
    /// their relative order.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Triangle> {
        let mut taken = vec![false; self.triangles.len()];
        let mut removed = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx < taken.len() && !taken[idx] {
                taken[idx] = true;
                removed.push(self.triangles[idx]);
            }
        }
        let mut flags = taken.into_iter();
        self.triangles.retain(|_| !flags.next().unwrap_or(false));
        removed
    }
}
