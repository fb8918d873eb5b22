#![warn(missing_docs)]

//! Math types for the gradcomp model generator.
//!
//! Thin wrappers around nalgebra providing the point and vector types used
//! throughout the workspace, an axis-aligned bounding box, and an RGB color.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Build the smallest AABB containing every point of the iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        aabb
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another box.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        let mut out = *self;
        out.include_aabb(other);
        out
    }

    /// Overlap of two boxes. The result is empty if they do not overlap.
    pub fn intersection(&self, other: &Aabb3) -> Aabb3 {
        Aabb3 {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    /// Test if two AABBs overlap (touching counts as overlap).
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Test if a point lies inside or on the boundary of the box.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Return a copy grown by `tol` in all directions.
    pub fn expanded(&self, tol: f64) -> Aabb3 {
        let d = Vec3::new(tol, tol, tol);
        Aabb3 {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Return a copy shifted by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Aabb3 {
        Aabb3 {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Squared distance from a point to the box (zero inside).
    pub fn distance_squared(&self, p: &Point3) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        let dz = (self.min.z - p.z).max(0.0).max(p.z - self.max.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Surface area of the box.
    pub fn surface_area(&self) -> f64 {
        let d = self.size();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

/// Linear RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color {
    /// Pure white.
    pub const WHITE: Color = Color::gray(1.0);
    /// Pure black.
    pub const BLACK: Color = Color::gray(0.0);

    /// Color from three channels.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gray with all channels equal to `v`.
    pub const fn gray(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Quantize to 8-bit channels, clamping out-of-range values.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Multiply every channel by `s`.
    pub fn scale(&self, s: f64) -> Color {
        Color::rgb(self.r * s, self.g * s, self.b * s)
    }

    /// Channel-wise sum.
    pub fn add(&self, other: &Color) -> Color {
        Color::rgb(self.r + other.r, self.g + other.g, self.b + other.b)
    }

    /// Channel-wise mean of a set of colors, black when empty.
    pub fn mean(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::BLACK;
        }
        let sum = colors.iter().fold(Color::BLACK, |acc, c| acc.add(c));
        sum.scale(1.0 / colors.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_from_points() {
        let pts = [
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
        ];
        let aabb = Aabb3::from_points(&pts);
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 4.0, 3.0));
        assert_relative_eq!(aabb.center().y, 1.0);
    }

    #[test]
    fn test_aabb_empty() {
        let aabb = Aabb3::empty();
        assert!(aabb.is_empty());
        let other = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.union(&other), other);
    }

    #[test]
    fn test_aabb_intersection_disjoint() {
        let a = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb3::new(Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 3.0, 3.0));
        assert!(a.intersection(&b).is_empty());
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_aabb_distance() {
        let a = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(a.distance_squared(&Point3::new(0.5, 0.5, 0.5)), 0.0);
        assert_relative_eq!(a.distance_squared(&Point3::new(3.0, 0.5, 0.5)), 4.0);
    }

    #[test]
    fn test_color_rgb8() {
        let c = Color::from_rgb8(0xC5, 0x76, 0xF6);
        assert_eq!(c.to_rgb8(), [0xC5, 0x76, 0xF6]);
        assert_eq!(Color::rgb(2.0, -1.0, 0.5).to_rgb8(), [255, 0, 128]);
    }

    #[test]
    fn test_color_mean() {
        let m = Color::mean(&[Color::WHITE, Color::BLACK]);
        assert_relative_eq!(m.r, 0.5);
        assert_eq!(Color::mean(&[]), Color::BLACK);
    }
}
