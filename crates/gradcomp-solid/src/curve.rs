//! Planar parametric curves.

use gradcomp_math::Point2;

use crate::error::{Result, SolidError};

/// A 2D parametric curve over `t ∈ [0, 1]`.
pub trait Curve2d: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;
}

// =============================================================================
// BezierCurve
// =============================================================================

/// Bezier curve of arbitrary degree, evaluated with de Casteljau's algorithm.
///
/// Two control points give a straight segment, three a quadratic, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    /// Control points; the curve passes through the first and last.
    pub points: Vec<Point2>,
}

impl BezierCurve {
    /// Curve from its control points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Straight segment from `a` to `b`.
    pub fn line(a: Point2, b: Point2) -> Self {
        Self::new(vec![a, b])
    }

    /// Quadratic curve from `a` to `c` pulled toward `b`.
    pub fn quadratic(a: Point2, b: Point2, c: Point2) -> Self {
        Self::new(vec![a, b, c])
    }
}

impl Curve2d for BezierCurve {
    fn evaluate(&self, t: f64) -> Point2 {
        let mut work = self.points.clone();
        if work.is_empty() {
            return Point2::origin();
        }
        for level in (1..work.len()).rev() {
            for i in 0..level {
                work[i] = work[i] + (work[i + 1] - work[i]) * t;
            }
        }
        work[0]
    }
}

// =============================================================================
// JoinedCurve
// =============================================================================

/// Curves evaluated end to end.
///
/// The parameter range is split evenly: with `n` pieces, piece `i` covers
/// `[i/n, (i+1)/n]` regardless of its length.
#[derive(Debug, Clone)]
pub struct JoinedCurve {
    pieces: Vec<BezierCurve>,
}

impl JoinedCurve {
    /// Join `pieces` in order.
    pub fn new(pieces: Vec<BezierCurve>) -> Result<Self> {
        if pieces.is_empty() {
            return Err(SolidError::EmptyCurve);
        }
        Ok(Self { pieces })
    }

    /// The joined pieces.
    pub fn pieces(&self) -> &[BezierCurve] {
        &self.pieces
    }
}

impl Curve2d for JoinedCurve {
    fn evaluate(&self, t: f64) -> Point2 {
        let n = self.pieces.len();
        let scaled = t.clamp(0.0, 1.0) * n as f64;
        let idx = (scaled.floor() as usize).min(n - 1);
        self.pieces[idx].evaluate(scaled - idx as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bezier_line() {
        let line = BezierCurve::line(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
        let p = line.evaluate(0.25);
        assert_relative_eq!(p.x, 0.5);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn test_bezier_quadratic() {
        let q = BezierCurve::quadratic(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        );
        assert_eq!(q.evaluate(0.0), Point2::new(0.0, 0.0));
        assert_eq!(q.evaluate(1.0), Point2::new(1.0, 1.0));
        // (1-t)^2 a + 2t(1-t) b + t^2 c at t = 0.5
        let mid = q.evaluate(0.5);
        assert_relative_eq!(mid.x, 0.25);
        assert_relative_eq!(mid.y, 0.75);
    }

    #[test]
    fn test_joined_curve_splits_parameter_evenly() {
        let curve = JoinedCurve::new(vec![
            BezierCurve::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            BezierCurve::line(Point2::new(1.0, 0.0), Point2::new(1.0, 10.0)),
        ])
        .unwrap();
        assert_relative_eq!(curve.evaluate(0.25).x, 0.5);
        assert_relative_eq!(curve.evaluate(0.5).y, 0.0);
        assert_relative_eq!(curve.evaluate(0.75).y, 5.0);
        assert_relative_eq!(curve.evaluate(1.0).y, 10.0);
        assert_relative_eq!(curve.evaluate(1.5).y, 10.0);
    }

    #[test]
    fn test_joined_curve_rejects_empty() {
        assert!(matches!(
            JoinedCurve::new(vec![]),
            Err(SolidError::EmptyCurve)
        ));
    }
}
