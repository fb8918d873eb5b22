//! Pinhole cameras.

use gradcomp_math::{Point3, Vec3};
use gradcomp_mesh::Ray;
use rand::Rng;

/// A perspective camera looking at a target.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Eye position.
    pub position: Point3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    /// `tan(fov / 2)`.
    half_extent: f64,
}

impl Camera {
    /// Camera at `position` looking at `target` with a vertical field of
    /// view of `fov_degrees`. +Z is up unless the view is nearly vertical.
    pub fn look_at(position: Point3, target: Point3, fov_degrees: f64) -> Self {
        let forward = (target - position).normalize();
        let world_up = if forward.z.abs() > 0.99 {
            Vec3::y()
        } else {
            Vec3::z()
        };
        let right = forward.cross(&world_up).normalize();
        let up = right.cross(&forward);
        Self {
            position,
            forward,
            right,
            up,
            half_extent: (fov_degrees.to_radians() * 0.5).tan(),
        }
    }

    /// Camera on a sphere of `distance` around `target`, in a uniformly
    /// random direction drawn from `rng`.
    pub fn orbit<R: Rng>(rng: &mut R, target: Point3, distance: f64, fov_degrees: f64) -> Self {
        let z: f64 = rng.random_range(-1.0..1.0);
        let phi: f64 = rng.random_range(0.0..std::f64::consts::TAU);
        let r = (1.0 - z * z).sqrt();
        let dir = Vec3::new(r * phi.cos(), r * phi.sin(), z);
        Self::look_at(target + dir * distance, target, fov_degrees)
    }

    /// Viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Ray through the center of pixel `(x, y)` of a `size × size` image,
    /// with `y` growing downward.
    pub fn pixel_ray(&self, x: u32, y: u32, size: u32) -> Ray {
        let s = size as f64;
        let u = ((x as f64 + 0.5) / s) * 2.0 - 1.0;
        let v = 1.0 - ((y as f64 + 0.5) / s) * 2.0;
        let dir = self.forward + (self.right * u + self.up * v) * self.half_extent;
        Ray::new(self.position, dir)
    }
}
