//! Waypoint stitching: chooses the curve joining two oriented waypoints.

use super::Waypoint;
use crate::error::Error;
use crate::math::{
    line_intersection, rot90, vector_angle, wrap_angle, BezierCurve, LineSegment2d, PathCurve,
    Point2d,
};
use cgmath::prelude::*;

/// Angular tolerance below which two directions are considered equal.
const ANGULAR_EPSILON: f64 = 1e-9;

/// Heading changes beyond this angle use the off-chord construction, since
/// the heading-ray intersection becomes distant or degenerate.
const LARGE_TURN_THRESHOLD: f64 = 2.0 * std::f64::consts::FRAC_PI_3;

/// Builds the curve joining `prev` to `next`, tangent to both headings.
///
/// Let `theta1` and `theta2` be the heading angles, `alpha` the angle of the
/// chord relative to `theta1` and `beta = theta2 - theta1`, both wrapped
/// into (-pi, pi]. The case analysis in order:
///
/// * `alpha` and `beta` both zero: the waypoints are colinear, emit a line.
/// * The final heading turns back across the chord (`alpha >= 0, beta < alpha`
///   or `alpha <= 0, beta > alpha`): a 7-control-point curve anchored at the
///   chord midpoint.
/// * `|beta| > |alpha|` up to a 2pi/3 turn: a 5-control-point curve through
///   the intersection of the two heading rays.
/// * `|beta| > |alpha|` beyond that (near-antiparallel headings): the same
///   7-point construction, anchored one chord length off the chord midpoint
///   on the side the first heading points to.
/// * Anything else is geometrically inconsistent and fails.
pub(super) fn connect(
    prev: &Waypoint,
    next: &Waypoint,
    fraction: f64,
) -> Result<PathCurve, Error> {
    let chord = next.position - prev.position;
    let theta1 = vector_angle(prev.heading);
    let theta2 = vector_angle(next.heading);
    let alpha = wrap_angle(vector_angle(chord) - theta1);
    let beta = wrap_angle(theta2 - theta1);

    if chord.magnitude() < ANGULAR_EPSILON {
        return Err(geometry_error(prev, next, alpha, beta));
    }

    if alpha.abs() < ANGULAR_EPSILON && beta.abs() < ANGULAR_EPSILON {
        let line = LineSegment2d::from_ends(prev.position, next.position);
        return Ok(line.into());
    }

    if (alpha >= 0.0 && beta < alpha) || (alpha <= 0.0 && beta > alpha) {
        let midpoint = prev.position + 0.5 * chord;
        return anchored_curve(prev, next, midpoint, fraction);
    }

    if beta.abs() > alpha.abs() && beta.abs() <= LARGE_TURN_THRESHOLD {
        let apex = line_intersection(prev.position, prev.heading, next.position, next.heading)
            .ok_or_else(|| geometry_error(prev, next, alpha, beta))?;
        let controls = [
            prev.position,
            prev.position + fraction * (apex - prev.position),
            apex,
            apex + fraction * (next.position - apex),
            next.position,
        ];
        return Ok(BezierCurve::new(&controls)?.into());
    }

    if beta.abs() > alpha.abs() {
        let midpoint = prev.position + 0.5 * chord;
        let mut normal = rot90(chord.normalize());
        if normal.dot(prev.heading) < 0.0 {
            normal = -normal;
        }
        let apex = midpoint + chord.magnitude() * normal;
        return anchored_curve(prev, next, apex, fraction);
    }

    Err(geometry_error(prev, next, alpha, beta))
}

/// The 7-control-point construction: the anchor is projected onto each
/// waypoint's heading line to give the shoulder points, and the secondary
/// control points sit at `fraction` along the chords to the shoulders.
fn anchored_curve(
    prev: &Waypoint,
    next: &Waypoint,
    anchor: Point2d,
    fraction: f64,
) -> Result<PathCurve, Error> {
    let shoulder_1 = prev.position + prev.heading * (anchor - prev.position).dot(prev.heading);
    let shoulder_2 = next.position + next.heading * (anchor - next.position).dot(next.heading);
    let controls = [
        prev.position,
        prev.position + fraction * (shoulder_1 - prev.position),
        shoulder_1,
        anchor,
        shoulder_2,
        next.position + fraction * (shoulder_2 - next.position),
        next.position,
    ];
    Ok(BezierCurve::new(&controls)?.into())
}

fn geometry_error(prev: &Waypoint, next: &Waypoint, alpha: f64, beta: f64) -> Error {
    Error::WaypointGeometry {
        from: prev.position,
        to: next.position,
        alpha,
        beta,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_point(p: Point2d, x: f64, y: f64) {
        assert_approx_eq!(p.x, x, 1e-9);
        assert_approx_eq!(p.y, y, 1e-9);
    }

    #[test]
    fn colinear_waypoints_join_with_a_line() {
        let a = Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0);
        let b = Waypoint::new(0.0, 120.0, FRAC_PI_2, 10.0);
        let curve = connect(&a, &b, 0.5).unwrap();
        match curve {
            PathCurve::Line(line) => assert_approx_eq!(line.length(), 120.0, 1e-9),
            PathCurve::Bezier(_) => panic!("expected a line"),
        }
    }

    #[test]
    fn quarter_turn_uses_heading_ray_intersection() {
        let a = Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0);
        let b = Waypoint::new(100.0, 100.0, 0.0, 0.0);
        let curve = connect(&a, &b, 0.5).unwrap();
        let PathCurve::Bezier(curve) = curve else {
            panic!("expected a Bezier curve");
        };
        let points = curve.control_points();
        assert_eq!(points.len(), 5);
        assert_point(points[0], 0.0, 0.0);
        assert_point(points[1], 0.0, 50.0);
        assert_point(points[2], 0.0, 100.0);
        assert_point(points[3], 50.0, 100.0);
        assert_point(points[4], 100.0, 100.0);
    }

    #[test]
    fn antiparallel_headings_anchor_off_the_chord() {
        let a = Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0);
        let b = Waypoint::new(100.0, 0.0, -FRAC_PI_2, 0.0);
        let curve = connect(&a, &b, 0.5).unwrap();
        let PathCurve::Bezier(curve) = curve else {
            panic!("expected a Bezier curve");
        };
        let points = curve.control_points();
        assert_eq!(points.len(), 7);
        assert_point(points[0], 0.0, 0.0);
        assert_point(points[1], 0.0, 50.0);
        assert_point(points[2], 0.0, 100.0);
        assert_point(points[3], 50.0, 100.0);
        assert_point(points[4], 100.0, 100.0);
        assert_point(points[5], 100.0, 50.0);
        assert_point(points[6], 100.0, 0.0);
    }

    #[test]
    fn stitched_curves_are_tangent_to_both_headings() {
        let cases = [
            (Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0), Waypoint::new(100.0, 100.0, 0.0, 0.0)),
            (Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0), Waypoint::new(100.0, 0.0, -FRAC_PI_2, 0.0)),
            (Waypoint::new(10.0, -5.0, 0.3, 0.0), Waypoint::new(80.0, 40.0, 1.4, 0.0)),
            (Waypoint::new(0.0, 0.0, PI, 0.0), Waypoint::new(-60.0, -60.0, -FRAC_PI_2, 0.0)),
        ];
        for (a, b) in cases {
            let PathCurve::Bezier(curve) = connect(&a, &b, 0.5).unwrap() else {
                panic!("expected a Bezier curve");
            };
            let start = curve.heading(0.0);
            assert_approx_eq!(start.x, a.heading.x, 1e-9);
            assert_approx_eq!(start.y, a.heading.y, 1e-9);
            let end = curve.heading(1.0);
            assert_approx_eq!(end.x, b.heading.x, 1e-9);
            assert_approx_eq!(end.y, b.heading.y, 1e-9);
        }
    }

    #[test]
    fn inconsistent_pair_is_an_error() {
        // The chord angle equals the heading change exactly; no case matches.
        let a = Waypoint::new(0.0, 0.0, 0.0, 0.0);
        let b = Waypoint::new(100.0, 50.0, 0.5_f64.atan(), 0.0);
        let err = connect(&a, &b, 0.5).unwrap_err();
        match err {
            Error::WaypointGeometry { alpha, beta, .. } => {
                assert_approx_eq!(alpha, beta, 1e-12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn coincident_waypoints_are_an_error() {
        let a = Waypoint::new(5.0, 5.0, 0.0, 0.0);
        let b = Waypoint::new(5.0, 5.0, 1.0, 0.0);
        assert!(matches!(
            connect(&a, &b, 0.5),
            Err(Error::WaypointGeometry { .. })
        ));
    }
}
