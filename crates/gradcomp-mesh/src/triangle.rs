//! Triangles with derived normals and basic geometric queries.

use gradcomp_math::{Aabb3, Point3, Vec3};

use crate::Ray;

/// A triangle given by three points in counter-clockwise (outward) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Create a new triangle from vertices.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unnormalized normal `(b - a) × (c - a)`; its length is twice the area.
    pub fn area_normal(&self) -> Vec3 {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit outward normal. Degenerate triangles return the zero vector.
    pub fn normal(&self) -> Vec3 {
        let n = self.area_normal();
        let len = n.norm();
        if len > 1e-300 {
            n / len
        } else {
            Vec3::zeros()
        }
    }

    /// Triangle area.
    pub fn area(&self) -> f64 {
        self.area_normal().norm() * 0.5
    }

    /// Average of the three vertices.
    pub fn centroid(&self) -> Point3 {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Bounding box of the vertices.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_points(&self.vertices)
    }

    /// The three edges as vertex pairs, in winding order.
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Ray parameter of the intersection with this triangle, if any.
    ///
    /// Möller–Trumbore; hits behind the origin are ignored and rays parallel
    /// to the plane never hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let [a, b, c] = &self.vertices;
        let e1 = b - a;
        let e2 = c - a;
        let dir = ray.direction.as_ref();
        let p = dir.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < 1e-14 {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = ray.origin - a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&e1);
        let v = dir.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(&q) * inv_det;
        if t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }

    /// Closest point on the triangle to `p`.
    ///
    /// Region classification from Ericson, "Real-Time Collision Detection" §5.1.5.
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        let [a, b, c] = self.vertices;
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }

    /// Squared distance from `p` to the triangle.
    pub fn distance_squared(&self, p: &Point3) -> f64 {
        (self.closest_point(p) - p).norm_squared()
    }

    /// Copy of the triangle shifted by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Triangle {
        let [a, b, c] = self.vertices;
        Triangle::new(a + offset, b + offset, c + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_xy() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_normal_follows_winding() {
        let t = unit_xy();
        assert_relative_eq!(t.normal(), Vec3::z());
        let flipped = Triangle::new(t.vertices[0], t.vertices[2], t.vertices[1]);
        assert_relative_eq!(flipped.normal(), -Vec3::z());
        assert_relative_eq!(t.area(), 0.5);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let t = Triangle::new(p, p, p);
        assert_eq!(t.normal(), Vec3::zeros());
    }

    #[test]
    fn test_intersect_ray_hit_and_miss() {
        let t = unit_xy();
        let hit = Ray::new(Point3::new(0.2, 0.2, -1.0), Vec3::z());
        assert_relative_eq!(t.intersect_ray(&hit).unwrap(), 1.0);

        let miss = Ray::new(Point3::new(0.8, 0.8, -1.0), Vec3::z());
        assert!(t.intersect_ray(&miss).is_none());

        let behind = Ray::new(Point3::new(0.2, 0.2, 1.0), Vec3::z());
        assert!(t.intersect_ray(&behind).is_none());

        let parallel = Ray::new(Point3::new(0.2, 0.2, 0.0), Vec3::x());
        assert!(t.intersect_ray(&parallel).is_none());
    }

    #[test]
    fn test_closest_point_regions() {
        let t = unit_xy();
        // Above the face
        let p = t.closest_point(&Point3::new(0.25, 0.25, 3.0));
        assert_relative_eq!(p, Point3::new(0.25, 0.25, 0.0));
        // Past a vertex
        let p = t.closest_point(&Point3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 0.0));
        // Beside the hypotenuse
        let p = t.closest_point(&Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
        assert_relative_eq!(t.distance_squared(&Point3::new(0.5, -2.0, 0.0)), 4.0);
    }
}
