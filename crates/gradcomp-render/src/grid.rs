//! Grids of randomly oriented views.

use std::path::Path;

use gradcomp_math::Color;
use gradcomp_mesh::{Bvh, Mesh};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::camera::Camera;
use crate::error::{RenderError, Result};

/// Preview layout and camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Tiles per column.
    pub rows: u32,
    /// Tiles per row.
    pub cols: u32,
    /// Edge length of each square tile in pixels.
    pub tile_size: u32,
    /// Seed for camera directions.
    pub seed: u64,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Camera distance as a multiple of the mesh's bounding radius.
    pub distance_factor: f64,
    /// Light applied regardless of orientation, in `[0, 1]`.
    pub ambient: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            tile_size: 300,
            seed: 0,
            fov_degrees: 60.0,
            distance_factor: 2.2,
            ambient: 0.25,
        }
    }
}

impl RenderSettings {
    /// Check the settings for values that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.tile_size == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "grid {}x{} of {}px tiles is empty",
                self.rows, self.cols, self.tile_size
            )));
        }
        if self.fov_degrees.is_nan() || self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(RenderError::InvalidSettings(format!(
                "field of view {} must be between 0 and 180 degrees",
                self.fov_degrees
            )));
        }
        if self.distance_factor.is_nan() || self.distance_factor <= 0.0 {
            return Err(RenderError::InvalidSettings(format!(
                "distance factor {} must be positive",
                self.distance_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return Err(RenderError::InvalidSettings(format!(
                "ambient {} must be in [0, 1]",
                self.ambient
            )));
        }
        Ok(())
    }
}

const BACKGROUND: Color = Color::WHITE;

/// Render `mesh` from `rows × cols` random directions into one image.
///
/// `colors` holds one color per triangle.
pub fn render_grid(mesh: &Mesh, colors: &[Color], settings: &RenderSettings) -> Result<RgbImage> {
    settings.validate()?;
    if mesh.is_empty() {
        return Err(RenderError::EmptyMesh);
    }
    if colors.len() != mesh.len() {
        return Err(RenderError::ColorCountMismatch {
            triangles: mesh.len(),
            colors: colors.len(),
        });
    }

    let bvh = Bvh::build(mesh);
    let bounds = mesh.bounds();
    let center = bounds.center();
    let radius = (bounds.size().norm() * 0.5).max(f64::EPSILON);
    let distance = radius * settings.distance_factor;

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let cameras: Vec<Camera> = (0..settings.rows * settings.cols)
        .map(|_| Camera::orbit(&mut rng, center, distance, settings.fov_degrees))
        .collect();

    let tile = settings.tile_size;
    let width = settings.cols * tile;
    let height = settings.rows * tile;
    info!(
        "Rendering {}x{} preview ({} views)",
        width,
        height,
        cameras.len()
    );

    let pixels: Vec<u8> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let (bvh, cameras) = (&bvh, &cameras);
            (0..width).flat_map(move |x| {
                let camera = &cameras[((y / tile) * settings.cols + x / tile) as usize];
                shade(bvh, colors, camera, x % tile, y % tile, tile, settings.ambient).to_rgb8()
            })
        })
        .collect();

    debug!("Rendered {} pixels", pixels.len() / 3);
    RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        RenderError::InvalidSettings(format!("pixel buffer does not fit {}x{}", width, height))
    })
}

/// Render and write the preview as PNG.
pub fn save_grid(path: &Path, mesh: &Mesh, colors: &[Color], settings: &RenderSettings) -> Result<()> {
    let image = render_grid(mesh, colors, settings)?;
    image.save(path).map_err(|e| RenderError::Image {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Saved preview to {}", path.display());
    Ok(())
}

/// Headlight shading: the light sits at the eye, so brightness falls off
/// with the angle between the view ray and the surface. Both triangle
/// sides are lit.
fn shade(bvh: &Bvh, colors: &[Color], camera: &Camera, x: u32, y: u32, size: u32, ambient: f64) -> Color {
    let ray = camera.pixel_ray(x, y, size);
    match bvh.trace_closest(&ray) {
        Some(hit) => {
            let lambert = hit.normal.dot(&ray.direction.into_inner()).abs();
            colors[hit.triangle].scale(ambient + (1.0 - ambient) * lambert)
        }
        None => BACKGROUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradcomp_math::Point3;
    use image::Rgb;

    fn cube() -> Mesh {
        Mesh::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    fn small() -> RenderSettings {
        RenderSettings {
            rows: 2,
            cols: 3,
            tile_size: 24,
            seed: 42,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_dimensions_and_background() {
        let mesh = cube();
        let colors = vec![Color::rgb(1.0, 0.0, 0.0); mesh.len()];
        let image = render_grid(&mesh, &colors, &small()).unwrap();
        assert_eq!(image.dimensions(), (72, 48));

        // Corners of each tile look past the cube; centers look at it.
        for row in 0..2 {
            for col in 0..3 {
                let (x0, y0) = (col * 24, row * 24);
                assert_eq!(*image.get_pixel(x0, y0), Rgb([255, 255, 255]));
                let center = image.get_pixel(x0 + 12, y0 + 12);
                assert!(center.0[0] > 0 && center.0[1] == 0 && center.0[2] == 0);
            }
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mesh = cube();
        let colors: Vec<Color> = (0..mesh.len())
            .map(|i| Color::gray(i as f64 / mesh.len() as f64))
            .collect();
        let a = render_grid(&mesh, &colors, &small()).unwrap();
        let b = render_grid(&mesh, &colors, &small()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_color_count_mismatch() {
        let err = render_grid(&cube(), &[Color::WHITE], &small()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ColorCountMismatch {
                triangles: 12,
                colors: 1
            }
        ));
    }

    #[test]
    fn test_invalid_settings() {
        let mesh = cube();
        let colors = vec![Color::WHITE; mesh.len()];
        let settings = RenderSettings {
            rows: 0,
            ..small()
        };
        assert!(matches!(
            render_grid(&mesh, &colors, &settings),
            Err(RenderError::InvalidSettings(_))
        ));
        assert!(render_grid(&Mesh::new(), &[], &small()).is_err());
    }

    #[test]
    fn test_save_grid_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rendering.png");
        let mesh = cube();
        let colors = vec![Color::BLACK; mesh.len()];
        save_grid(&path, &mesh, &colors, &small()).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (72, 48));
    }
}
