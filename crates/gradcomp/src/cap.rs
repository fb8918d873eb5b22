//! Graduation cap with a tassel.
//!
//! The cap is built around the `hat_base` board: a rounded skirt below it,
//! the board itself lifted on top, and a tassel that runs from the middle
//! of the board over its +X edge and hangs down.

use gradcomp_math::{Aabb3, Color, Point2, Point3, Vec3};
use gradcomp_solid::{BezierCurve, ColorRules, Curve2d, JoinedCurve, Solid, Tube};
use tracing::debug;

use crate::assets::Asset;
use crate::error::Result;

/// Tassel color (#FFD700).
pub const GOLD: Color = Color::rgb(1.0, 215.0 / 255.0, 0.0);

/// How far the board is lifted above the skirt.
const BOARD_LIFT: f64 = 0.3;
/// Radius of the skirt's trimming cone.
const SKIRT_RADIUS: f64 = 0.8;
/// Half-length of the skirt's trimming cone.
const SKIRT_CONE_HALF_HEIGHT: f64 = 3.0;
/// Skirt extends this far below the board asset.
const SKIRT_DROP: f64 = 0.05;

/// Size of the rounded corners in the tassel cord.
const CORD_CORNER: f64 = 0.075;
/// Length of the cord hanging past the board edge.
const CORD_DROP: f64 = 0.2;
/// Cord thickness.
const CORD_RADIUS: f64 = 0.05;
/// Parameter step between cord samples.
const CORD_SAMPLES: usize = 100;

const KNOT_DROP: f64 = 0.15;
const KNOT_RADIUS: f64 = 0.08;
const FRINGE_DROP: f64 = 0.4;
const FRINGE_RADIUS: f64 = 0.13;
/// Where along the cord the fringe cone starts.
const FRINGE_START: f64 = 0.85;

/// The assembled cap.
#[derive(Debug, Clone)]
pub struct GraduationCap {
    /// Whole cap: skirt, board and tassel.
    pub solid: Solid,
    /// Tassel alone.
    pub tassel: Solid,
    /// Gold on the tassel, black elsewhere.
    pub colors: ColorRules,
}

/// Path of the tassel cord in the XZ plane: up and over from `start`,
/// along to the board edge `width` away, then down.
pub fn tassel_curve(start: &Point3, width: f64) -> Result<JoinedCurve> {
    let (x, z) = (start.x, start.z);
    let c = CORD_CORNER;
    let curve = JoinedCurve::new(vec![
        BezierCurve::quadratic(
            Point2::new(x, z),
            Point2::new(x, z + c),
            Point2::new(x + c, z + c),
        ),
        BezierCurve::line(Point2::new(x + c, z + c), Point2::new(x + width - c, z + c)),
        BezierCurve::quadratic(
            Point2::new(x + width - c, z + c),
            Point2::new(x + width, z + c),
            Point2::new(x + width, z),
        ),
        BezierCurve::line(Point2::new(x + width, z), Point2::new(x + width, z - CORD_DROP)),
    ])?;
    Ok(curve)
}

/// Build the cap around `hat_base`.
pub fn graduation_cap(hat_base: &Asset) -> Result<GraduationCap> {
    let bounds = hat_base.bounds();
    let mid = bounds.center();

    let skirt = Solid::Intersect(vec![
        Solid::Rect(Aabb3::new(
            bounds.min - Vec3::z() * SKIRT_DROP,
            bounds.max + Vec3::z() * BOARD_LIFT,
        )),
        Solid::Cone {
            tip: mid + Vec3::z() * SKIRT_CONE_HALF_HEIGHT,
            base: mid - Vec3::z() * SKIRT_CONE_HALF_HEIGHT,
            radius: SKIRT_RADIUS,
        },
    ]);

    let board = hat_base.solid.clone().translate(Vec3::z() * BOARD_LIFT);
    let board_bounds = board.bounds();
    let start = board_bounds.center();
    let width = board_bounds.max.x - start.x;

    let curve = tassel_curve(&start, width)?;
    let cord_point = |t: f64| {
        let p = curve.evaluate(t);
        Point3::new(p.x, start.y, p.y)
    };
    let step = 1.0 / CORD_SAMPLES as f64;
    let segments = (1..=CORD_SAMPLES)
        .map(|k| (cord_point((k - 1) as f64 * step), cord_point(k as f64 * step)))
        .collect();
    let cord = Solid::Tube(Tube::new(segments, CORD_RADIUS));

    let end = Point3::new(start.x + width, start.y, start.z);
    let tassel = Solid::Union(vec![
        cord,
        Solid::Sphere {
            center: end - Vec3::z() * KNOT_DROP,
            radius: KNOT_RADIUS,
        },
        Solid::Cone {
            tip: cord_point(FRINGE_START),
            base: end - Vec3::z() * FRINGE_DROP,
            radius: FRINGE_RADIUS,
        },
    ]);
    debug!("Cap board centered at {:?}, tassel width {:.3}", start, width);

    let colors = ColorRules::new(Color::BLACK).with_rule(tassel.clone(), GOLD);
    let solid = Solid::Union(vec![skirt, board, tassel.clone()]);

    Ok(GraduationCap {
        solid,
        tassel,
        colors,
    })
}
