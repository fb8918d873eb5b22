//! Spatial color assignment by ordered rules.

use gradcomp_math::{Color, Point3};
use rayon::prelude::*;

use crate::contour::ContourMesh;
use crate::Solid;

/// What a matching rule resolves to.
#[derive(Debug, Clone)]
pub enum ColorSource {
    /// A fixed color.
    Constant(Color),
    /// A nested rule list, evaluated at the same point.
    Rules(ColorRules),
}

impl ColorSource {
    /// Resolve the color at `p`.
    pub fn color_at(&self, p: &Point3) -> Color {
        match self {
            ColorSource::Constant(c) => *c,
            ColorSource::Rules(rules) => rules.color_at(p),
        }
    }
}

impl From<Color> for ColorSource {
    fn from(color: Color) -> Self {
        ColorSource::Constant(color)
    }
}

impl From<ColorRules> for ColorSource {
    fn from(rules: ColorRules) -> Self {
        ColorSource::Rules(rules)
    }
}

/// Ordered `(solid, color)` rules. The first rule whose solid contains the
/// point decides its color; if none does, the fallback applies.
#[derive(Debug, Clone)]
pub struct ColorRules {
    rules: Vec<(Solid, ColorSource)>,
    fallback: Color,
}

impl ColorRules {
    /// Empty rule list.
    pub fn new(fallback: Color) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule with lower priority than every existing one.
    pub fn with_rule(mut self, solid: Solid, source: impl Into<ColorSource>) -> Self {
        self.rules.push((solid, source.into()));
        self
    }

    /// Number of rules, excluding the fallback.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if only the fallback applies.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Color at `p`.
    pub fn color_at(&self, p: &Point3) -> Color {
        self.rules
            .iter()
            .find(|(solid, _)| solid.contains(p))
            .map_or(self.fallback, |(_, source)| source.color_at(p))
    }

    /// Per-vertex colors of a contoured mesh, classified at each vertex's
    /// interior sample.
    pub fn vertex_colors(&self, contour: &ContourMesh) -> Vec<[Color; 3]> {
        contour
            .interior
            .par_iter()
            .map(|samples| samples.map(|p| self.color_at(&p)))
            .collect()
    }

    /// Per-triangle colors: the mean of each triangle's vertex colors.
    pub fn triangle_colors(&self, contour: &ContourMesh) -> Vec<Color> {
        self.vertex_colors(contour)
            .iter()
            .map(|colors| Color::mean(colors))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradcomp_math::Aabb3;
    use gradcomp_mesh::{Mesh, Triangle};

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    fn slab(x0: f64, x1: f64) -> Solid {
        Solid::Rect(Aabb3::new(
            Point3::new(x0, -10.0, -10.0),
            Point3::new(x1, 10.0, 10.0),
        ))
    }

    #[test]
    fn test_first_match_wins() {
        let rules = ColorRules::new(Color::WHITE)
            .with_rule(slab(0.0, 2.0), RED)
            .with_rule(slab(1.0, 3.0), BLUE);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.color_at(&Point3::new(0.5, 0.0, 0.0)), RED);
        assert_eq!(rules.color_at(&Point3::new(1.5, 0.0, 0.0)), RED);
        assert_eq!(rules.color_at(&Point3::new(2.5, 0.0, 0.0)), BLUE);
        assert_eq!(rules.color_at(&Point3::new(5.0, 0.0, 0.0)), Color::WHITE);
    }

    #[test]
    fn test_nested_rules() {
        let inner = ColorRules::new(Color::BLACK).with_rule(slab(0.0, 0.5), RED);
        let rules = ColorRules::new(Color::WHITE)
            .with_rule(slab(0.0, 1.0), inner)
            .with_rule(slab(-1.0, 2.0), BLUE);
        assert_eq!(rules.color_at(&Point3::new(0.25, 0.0, 0.0)), RED);
        // Inside the outer match: the nested fallback wins over later rules.
        assert_eq!(rules.color_at(&Point3::new(0.75, 0.0, 0.0)), Color::BLACK);
        assert_eq!(rules.color_at(&Point3::new(1.5, 0.0, 0.0)), BLUE);
    }

    #[test]
    fn test_triangle_colors_average_vertices() {
        let tri = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let contour = ContourMesh {
            mesh: Mesh::from_triangles(vec![tri]),
            interior: vec![[
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(0.6, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
            ]],
        };
        let rules = ColorRules::new(Color::BLACK).with_rule(slab(0.0, 1.0), Color::gray(0.9));
        assert_eq!(
            rules.vertex_colors(&contour),
            vec![[Color::gray(0.9), Color::gray(0.9), Color::BLACK]]
        );
        let colors = rules.triangle_colors(&contour);
        assert!((colors[0].r - 0.6).abs() < 1e-12);
        assert!(ColorRules::new(Color::WHITE).is_empty());
    }
}
