//! Shared-edge adjacency for triangle soups.

use std::collections::HashMap;

use gradcomp_math::Point3;

use crate::Triangle;

/// Exact bit pattern of a vertex position, with `-0.0` folded into `0.0`.
type VertexKey = [u64; 3];

/// Canonical (smaller, larger) pair of vertex keys.
type EdgeKey = (VertexKey, VertexKey);

fn vertex_key(p: &Point3) -> VertexKey {
    let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

fn edge_key(a: &Point3, b: &Point3) -> EdgeKey {
    let (ka, kb) = (vertex_key(a), vertex_key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Edge-to-triangle map built from vertex positions.
///
/// Two triangles are neighbors iff they share both endpoints of an edge,
/// regardless of the edge's direction in either triangle.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    edge_to_faces: HashMap<EdgeKey, Vec<usize>>,
    face_edges: Vec<[EdgeKey; 3]>,
}

impl MeshAdjacency {
    /// Build adjacency structures from a triangle list.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut edge_to_faces: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
        let mut face_edges = Vec::with_capacity(triangles.len());

        for (face_idx, tri) in triangles.iter().enumerate() {
            let keys = tri.edges().map(|(a, b)| edge_key(&a, &b));
            for key in &keys {
                edge_to_faces.entry(*key).or_default().push(face_idx);
            }
            face_edges.push(keys);
        }

        Self {
            edge_to_faces,
            face_edges,
        }
    }

    /// Triangles sharing an edge with `face`, each listed once, in edge order.
    pub fn neighbors(&self, face: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let Some(edges) = self.face_edges.get(face) else {
            return out;
        };
        for key in edges {
            if let Some(faces) = self.edge_to_faces.get(key) {
                for &other in faces {
                    if other != face && !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }
        out
    }

    /// Number of edges shared by more than two triangles.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Number of edges used by exactly one triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Unit square split along its diagonal, plus a far-away triangle.
    fn square_and_island() -> Vec<Triangle> {
        vec![
            Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)),
            Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)),
            Triangle::new(p(5.0, 0.0, 0.0), p(6.0, 0.0, 0.0), p(5.0, 1.0, 0.0)),
        ]
    }

    #[test]
    fn test_neighbors_share_edge() {
        let adj = MeshAdjacency::build(&square_and_island());
        assert_eq!(adj.neighbors(0), vec![1]);
        assert_eq!(adj.neighbors(1), vec![0]);
        assert!(adj.neighbors(2).is_empty());
        assert!(adj.neighbors(99).is_empty());
    }

    #[test]
    fn test_vertex_only_contact_is_not_adjacent() {
        let tris = vec![
            Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            Triangle::new(p(0.0, 0.0, 0.0), p(-1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)),
        ];
        let adj = MeshAdjacency::build(&tris);
        assert!(adj.neighbors(0).is_empty());
    }

    #[test]
    fn test_negative_zero_matches() {
        let tris = vec![
            Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            Triangle::new(p(1.0, 0.0, 0.0), p(-0.0, 1.0, -0.0), p(1.0, 1.0, 0.0)),
        ];
        let adj = MeshAdjacency::build(&tris);
        assert_eq!(adj.neighbors(0), vec![1]);
    }

    #[test]
    fn test_edge_counts() {
        let adj = MeshAdjacency::build(&square_and_island());
        assert_eq!(adj.boundary_edge_count(), 7);
        assert_eq!(adj.non_manifold_edge_count(), 0);
    }
}
