//! Scene assembly: computer, cap and lettering combined into one colored
//! solid, then contoured into a mesh.

use gradcomp_export::save_material_obj;
use gradcomp_math::{Color, Vec3};
use gradcomp_render::save_grid;
use gradcomp_solid::{dual_contour, Bitmap2d, ColorRules, ContourMesh, Solid};
use tracing::{debug, info};

use crate::assets::{Asset, AssetDir, BASE, COMPUTER, HAT_BASE, SCREEN};
use crate::cap::{graduation_cap, GraduationCap};
use crate::error::{GradcompError, Result};
use crate::screen::{screen_patch, screen_text, screen_text_solid};
use crate::settings::Settings;

/// Accent color of the `base` region (#C576F6).
pub const PURPLE: Color = Color::rgb(197.0 / 255.0, 118.0 / 255.0, 246.0 / 255.0);

/// The full model as an implicit solid with its color rules.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Laptop body.
    pub computer: Asset,
    /// Graduation cap on top of the body.
    pub cap: GraduationCap,
    /// Raised lettering.
    pub screen_text: Solid,
    /// Union of body, cap and lettering.
    pub solid: Solid,
    /// Color of every point of `solid`.
    pub colors: ColorRules,
}

impl Scene {
    /// Compose the scene from loaded assets.
    pub fn from_parts(
        computer: Asset,
        base: Asset,
        screen: Asset,
        hat_base: Asset,
        text: Bitmap2d,
    ) -> Result<Self> {
        let lettering = screen_text(&screen, text)?;
        let raised = screen_text_solid(&computer.solid, &lettering);
        let patch = screen_patch(&computer.mesh, &screen)?;
        let cap = graduation_cap(&hat_base)?;

        let computer_colors = ColorRules::new(Color::WHITE)
            .with_rule(lettering, Color::WHITE)
            .with_rule(patch.shell, Color::BLACK)
            .with_rule(base.solid, PURPLE);

        let colors = ColorRules::new(Color::WHITE)
            .with_rule(cap.solid.clone(), cap.colors.clone())
            .with_rule(computer.solid.clone(), computer_colors)
            .with_rule(raised.clone(), Color::WHITE);

        let solid = Solid::Union(vec![
            computer.solid.clone(),
            cap.solid.clone(),
            raised.clone(),
        ]);
        debug!("Scene bounds {:?}", solid.bounds());

        Ok(Self {
            computer,
            cap,
            screen_text: raised,
            solid,
            colors,
        })
    }

    /// Load every asset from `assets` and compose the scene.
    pub fn load(assets: &AssetDir) -> Result<Self> {
        info!("Loading assets from {}", assets.root().display());
        let computer = assets.load(COMPUTER)?;
        let base = assets.load(BASE)?;
        let screen = assets.load(SCREEN)?;
        let hat_base = assets.load(HAT_BASE)?;
        let text = assets.load_text()?;
        Self::from_parts(computer, base, screen, hat_base, text)
    }

    /// Contour the scene at `resolution` and color every triangle.
    pub fn generate(&self, resolution: f64) -> Result<GeneratedModel> {
        info!("Contouring scene at resolution {}", resolution);
        let contour = dual_contour(&self.solid, resolution)?;
        let colors = self.colors.triangle_colors(&contour);
        let model = GeneratedModel { contour, colors };
        let size = model.size();
        info!(
            "Generated {} triangles, size ({:.4}, {:.4}, {:.4})",
            model.contour.len(),
            size.x,
            size.y,
            size.z
        );
        Ok(model)
    }
}

/// A contoured, colored mesh ready for output.
#[derive(Debug, Clone)]
pub struct GeneratedModel {
    /// Mesh with interior samples.
    pub contour: ContourMesh,
    /// One color per triangle.
    pub colors: Vec<Color>,
}

impl GeneratedModel {
    /// Extent of the mesh bounding box.
    pub fn size(&self) -> Vec3 {
        let bounds = self.contour.bounds();
        if bounds.is_empty() {
            Vec3::zeros()
        } else {
            bounds.size()
        }
    }

    /// The size as one line of text, e.g. `size: {2.2 0.5 1.9}`.
    pub fn size_line(&self) -> String {
        let size = self.size();
        format!("size: {{{} {} {}}}", size.x, size.y, size.z)
    }
}

/// Run the whole pipeline: load assets, generate the model, write the
/// preview image and the OBJ archive.
pub fn run(settings: &Settings) -> Result<GeneratedModel> {
    settings.validate()?;
    std::fs::create_dir_all(&settings.output_dir).map_err(|e| GradcompError::OutputDir {
        path: settings.output_dir.clone(),
        source: e,
    })?;

    let scene = Scene::load(&AssetDir::new(&settings.assets_dir))?;
    let model = scene.generate(settings.resolution)?;

    let mesh = &model.contour.mesh;
    save_grid(&settings.rendering_path(), mesh, &model.colors, &settings.render)?;
    save_material_obj(&settings.archive_path(), mesh, &model.colors)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradcomp_math::Point3;
    use gradcomp_mesh::Mesh;

    use crate::cap::GOLD;

    fn cuboid(name: &str, min: [f64; 3], max: [f64; 3]) -> Asset {
        Asset::from_mesh(
            name,
            Mesh::cuboid(
                Point3::new(min[0], min[1], min[2]),
                Point3::new(max[0], max[1], max[2]),
            ),
        )
    }

    fn scene() -> Scene {
        let row = |dark: bool| (0..8).map(|x| dark && (2..6).contains(&x)).collect::<Vec<_>>();
        let text = Bitmap2d::from_rows(&[row(false), row(true), row(true), row(false)]);
        Scene::from_parts(
            cuboid("computer", [-1.0, 0.0, 0.0], [1.2, 0.2, 1.2]),
            cuboid("base", [-1.1, -0.1, -0.1], [1.3, 0.3, 0.1]),
            cuboid("screen", [-0.8, -0.1, 0.2], [0.8, 0.05, 1.0]),
            cuboid("hat_base", [-0.3, -0.2, 1.2], [0.3, 0.4, 1.3]),
            text,
        )
        .unwrap()
    }

    #[test]
    fn test_purple_is_accent_color() {
        assert_eq!(PURPLE.to_rgb8(), [0xC5, 0x76, 0xF6]);
    }

    #[test]
    fn test_color_priorities() {
        let scene = scene();
        let c = |x, y, z| scene.colors.color_at(&Point3::new(x, y, z));
        // Cap skirt overlaps the top of the body; the cap wins.
        assert_eq!(c(0.0, 0.1, 1.18), Color::BLACK);
        assert_eq!(c(0.3, 0.1, 1.4), GOLD);
        // Display surface next to the lettering.
        assert_eq!(c(0.9, 0.005, 0.6), Color::BLACK);
        // Lettering on the display.
        assert_eq!(c(0.0, 0.005, 0.6), Color::WHITE);
        // Raised lettering in front of the body.
        assert_eq!(c(0.0, -0.01, 0.6), Color::WHITE);
        // Accent region at the bottom of the body.
        assert_eq!(c(0.5, 0.1, 0.05), PURPLE);
        // Plain body.
        assert_eq!(c(0.5, 0.1, 0.6), Color::WHITE);
    }

    #[test]
    fn test_scene_solid_is_union() {
        let scene = scene();
        assert!(scene.solid.contains(&Point3::new(0.5, 0.1, 0.6)));
        assert!(scene.solid.contains(&Point3::new(0.0, 0.1, 1.55)));
        assert!(scene.solid.contains(&Point3::new(0.0, -0.01, 0.6)));
        assert!(!scene.solid.contains(&Point3::new(0.0, -0.05, 0.6)));
        assert!(!scene.solid.contains(&Point3::new(-0.9, 0.1, 1.7)));
    }

    #[test]
    fn test_size_line_format() {
        let model = GeneratedModel {
            contour: dual_contour(
                &Solid::Rect(gradcomp_math::Aabb3::new(
                    Point3::origin(),
                    Point3::new(1.0, 1.0, 1.0),
                )),
                0.25,
            )
            .unwrap(),
            colors: Vec::new(),
        };
        let size = model.size();
        assert_eq!(
            model.size_line(),
            format!("size: {{{} {} {}}}", size.x, size.y, size.z)
        );

        let empty = GeneratedModel {
            contour: ContourMesh::default(),
            colors: Vec::new(),
        };
        assert_eq!(empty.size_line(), "size: {0 0 0}");
    }

    #[test]
    fn test_generate_coarse() {
        let model = scene().generate(0.05).unwrap();
        assert!(!model.contour.is_empty());
        assert_eq!(model.colors.len(), model.contour.len());
        let size = model.size();
        // Body spans 2.2 in X; the mesh sits within a cell of it.
        assert!(size.x > 2.1 && size.x < 2.35, "size.x = {}", size.x);
        assert!(model.colors.iter().any(|c| c.to_rgb8() == GOLD.to_rgb8()));
    }
}
