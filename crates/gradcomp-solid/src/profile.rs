//! Bitmap-backed 2D profiles.
//!
//! A [`Bitmap2d`] is a binary image read from disk; a [`Profile`] places it
//! in world space on the XZ plane and smooths its pixel edges by bilinear
//! interpolation of pixel coverage.

use std::path::Path;

use gradcomp_math::{Aabb3, Point2, Point3};
use image::GrayImage;
use tracing::debug;

use crate::error::{Result, SolidError};

/// Pixels darker than this (as a fraction of full scale) are filled.
const FILL_THRESHOLD: f64 = 0.5;

/// Interpolated coverage at or above this counts as inside.
const COVERAGE_THRESHOLD: f64 = 0.5;

/// Binary bitmap with row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap2d {
    width: usize,
    height: usize,
    filled: Vec<bool>,
}

impl Bitmap2d {
    /// Read an image file; dark pixels become filled.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| SolidError::Image {
            path: path.to_path_buf(),
            source: e,
        })?;
        let bitmap = Self::from_luma(&img.to_luma8());
        debug!(
            "Loaded bitmap {} ({}x{}, {} filled)",
            path.display(),
            bitmap.width,
            bitmap.height,
            bitmap.filled.iter().filter(|&&f| f).count()
        );
        Ok(bitmap)
    }

    /// Threshold a grayscale image. Image rows run top to bottom, so they are
    /// flipped to make +y point up.
    pub fn from_luma(img: &GrayImage) -> Self {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let mut filled = vec![false; width * height];
        for (x, y, pixel) in img.enumerate_pixels() {
            let row = height - 1 - y as usize;
            filled[row * width + x as usize] = (pixel.0[0] as f64 / 255.0) < FILL_THRESHOLD;
        }
        Self {
            width,
            height,
            filled,
        }
    }

    /// Bitmap from rows given top row first, `true` meaning filled.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut filled = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            let flipped = height - 1 - y;
            for (x, &f) in row.iter().enumerate() {
                filled[flipped * width + x] = f;
            }
        }
        Self {
            width,
            height,
            filled,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether pixel `(x, y)` is filled, with `y = 0` the bottom row.
    /// Pixels outside the image are empty.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.filled[y as usize * self.width + x as usize]
    }

    /// Pixel-space box around every filled pixel, as `(min, max)` corners.
    pub fn filled_bounds(&self) -> Option<(Point2, Point2)> {
        let mut range: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.filled[y * self.width + x] {
                    continue;
                }
                range = Some(match range {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        range.map(|(x0, y0, x1, y1)| {
            (
                Point2::new(x0 as f64, y0 as f64),
                Point2::new((x1 + 1) as f64, (y1 + 1) as f64),
            )
        })
    }

    /// Bilinear coverage at pixel-space point `u`, in `[0, 1]`.
    ///
    /// Pixel `(x, y)` covers `[x, x+1] × [y, y+1]`; its value is taken at
    /// the pixel center.
    pub fn coverage(&self, u: &Point2) -> f64 {
        let fx = u.x - 0.5;
        let fy = u.y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);
        let v = |x: i64, y: i64| if self.get(x, y) { 1.0 } else { 0.0 };
        let bottom = v(x0, y0) * (1.0 - tx) + v(x0 + 1, y0) * tx;
        let top = v(x0, y0 + 1) * (1.0 - tx) + v(x0 + 1, y0 + 1) * tx;
        bottom * (1.0 - ty) + top * ty
    }
}

/// A bitmap placed on the XZ plane and clipped to a 3D box.
#[derive(Debug, Clone)]
pub struct Profile {
    bitmap: Bitmap2d,
    /// World units per pixel.
    scale: f64,
    pixel_center: Point2,
    world_center: Point2,
    bounds: Aabb3,
}

impl Profile {
    /// Scale the filled region of `bitmap` to `width` world units and center
    /// it on `center` (world X, Z). Points outside `bounds` are never inside.
    pub fn fit(bitmap: Bitmap2d, width: f64, center: Point2, bounds: Aabb3) -> Result<Self> {
        let (min, max) = bitmap.filled_bounds().ok_or_else(|| {
            SolidError::EmptyProfile(format!("{}x{}", bitmap.width, bitmap.height))
        })?;
        let scale = width / (max.x - min.x);
        Ok(Self {
            bitmap,
            scale,
            pixel_center: midpoint(&min, &max),
            world_center: center,
            bounds,
        })
    }

    /// World units per pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Clipping box.
    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Whether world point `(x, z)` lies inside the smoothed profile,
    /// ignoring the clipping box.
    pub fn contains_2d(&self, q: &Point2) -> bool {
        let u = self.pixel_center + (q - self.world_center) / self.scale;
        self.bitmap.coverage(&u) >= COVERAGE_THRESHOLD
    }

    /// Whether `p` is inside the clipping box and its `(x, z)` is inside the
    /// profile.
    pub fn contains(&self, p: &Point3) -> bool {
        self.bounds.contains(p) && self.contains_2d(&Point2::new(p.x, p.z))
    }
}

fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Luma;

    /// Top row: one dark pixel on the left. Bottom row: all light.
    fn two_by_two() -> GrayImage {
        let mut img = GrayImage::from_pixel(2, 2, Luma([255]));
        img.put_pixel(0, 0, Luma([10]));
        img
    }

    #[test]
    fn test_from_luma_flips_rows() {
        let bitmap = Bitmap2d::from_luma(&two_by_two());
        assert!(bitmap.get(0, 1));
        assert!(!bitmap.get(0, 0));
        assert!(!bitmap.get(1, 1));
        assert!(!bitmap.get(-1, 1));
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.png");
        two_by_two().save(&path).unwrap();
        let bitmap = Bitmap2d::load(&path).unwrap();
        assert_eq!(bitmap, Bitmap2d::from_luma(&two_by_two()));
    }

    #[test]
    fn test_load_missing_image() {
        let err = Bitmap2d::load(Path::new("/nonexistent/text.png")).unwrap_err();
        assert!(matches!(err, SolidError::Image { .. }));
    }

    #[test]
    fn test_filled_bounds() {
        let bitmap = Bitmap2d::from_rows(&[
            vec![false, false, false, false],
            vec![false, true, true, false],
            vec![false, false, true, false],
        ]);
        let (min, max) = bitmap.filled_bounds().unwrap();
        assert_eq!(min, Point2::new(1.0, 0.0));
        assert_eq!(max, Point2::new(3.0, 2.0));
        assert!(Bitmap2d::from_rows(&[vec![false; 3]]).filled_bounds().is_none());
    }

    #[test]
    fn test_coverage_is_bilinear() {
        let bitmap = Bitmap2d::from_rows(&[vec![true, false]]);
        assert_relative_eq!(bitmap.coverage(&Point2::new(0.5, 0.5)), 1.0);
        assert_relative_eq!(bitmap.coverage(&Point2::new(1.0, 0.5)), 0.5);
        assert_relative_eq!(bitmap.coverage(&Point2::new(1.5, 0.5)), 0.0);
        assert_relative_eq!(bitmap.coverage(&Point2::new(0.5, 0.75)), 0.75);
    }

    #[test]
    fn test_profile_fit_scales_and_centers() {
        // 4x2 block of filled pixels inside a wider image.
        let bitmap = Bitmap2d::from_rows(&[
            vec![false, true, true, true, true, false],
            vec![false, true, true, true, true, false],
        ]);
        let bounds = Aabb3::new(Point3::new(-10.0, -1.0, -10.0), Point3::new(10.0, 1.0, 10.0));
        let profile = Profile::fit(bitmap, 8.0, Point2::new(100.0, 0.0), bounds).unwrap();
        assert_relative_eq!(profile.scale(), 2.0);

        assert!(profile.contains_2d(&Point2::new(100.0, 0.0)));
        assert!(profile.contains_2d(&Point2::new(103.5, 1.5)));
        assert!(!profile.contains_2d(&Point2::new(104.5, 0.0)));
        assert!(!profile.contains_2d(&Point2::new(100.0, 2.5)));

        // Clipped by the box even where the profile is filled.
        assert!(!profile.contains(&Point3::new(100.0, 0.0, 0.0)));
    }

    #[test]
    fn test_profile_rejects_blank_bitmap() {
        let bitmap = Bitmap2d::from_rows(&[vec![false, false]]);
        let bounds = Aabb3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let err = Profile::fit(bitmap, 1.0, Point2::origin(), bounds).unwrap_err();
        assert!(matches!(err, SolidError::EmptyProfile(_)));
    }
}
