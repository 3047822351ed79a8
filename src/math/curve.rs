use super::{BezierCurve, LineSegment2d, Point2d, Vector2d};
use crate::error::Error;

/// The closed set of curves a path segment can follow.
///
/// All queries are in the arc-length domain so callers never deal with the
/// underlying curve parameter.
#[derive(Clone, Debug)]
pub enum PathCurve {
    /// A straight line with zero curvature everywhere.
    Line(LineSegment2d),
    /// A Bezier curve of degree 1 to 6.
    Bezier(BezierCurve),
}

impl PathCurve {
    /// The total arc length of the curve.
    pub fn total_arc_length(&self) -> Result<f64, Error> {
        match self {
            PathCurve::Line(line) => Ok(line.length()),
            PathCurve::Bezier(curve) => curve.total_arc_length(),
        }
    }

    /// The point at the given arc length along the curve.
    pub fn point_at_arc_length(&self, arc_length: f64) -> Result<Point2d, Error> {
        match self {
            PathCurve::Line(line) => Ok(line.point_at(arc_length)),
            PathCurve::Bezier(curve) => curve.point_at_arc_length(arc_length),
        }
    }

    /// The signed curvature at the given arc length along the curve.
    ///
    /// Positive curvature means the left side is the inner side of the turn.
    pub fn curvature_at_arc_length(&self, arc_length: f64) -> Result<f64, Error> {
        match self {
            PathCurve::Line(_) => Ok(0.0),
            PathCurve::Bezier(curve) => curve.curvature_at_arc_length(arc_length),
        }
    }

    /// The unit tangent at the given arc length along the curve.
    pub fn heading_at_arc_length(&self, arc_length: f64) -> Result<Vector2d, Error> {
        match self {
            PathCurve::Line(line) => Ok(line.heading()),
            PathCurve::Bezier(curve) => curve.heading_at_arc_length(arc_length),
        }
    }
}

impl From<LineSegment2d> for PathCurve {
    fn from(line: LineSegment2d) -> Self {
        PathCurve::Line(line)
    }
}

impl From<BezierCurve> for PathCurve {
    fn from(curve: BezierCurve) -> Self {
        PathCurve::Bezier(curve)
    }
}
