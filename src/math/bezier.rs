use super::{ArcLengthTable, Point2d, Vector2d, DEFAULT_TABLE_RESOLUTION};
use crate::error::Error;
use arrayvec::ArrayVec;
use cgmath::prelude::*;
use std::sync::OnceLock;

/// The maximum number of control points, bounding the curve at degree 6.
pub const MAX_CONTROL_POINTS: usize = 7;

/// Binomial coefficients up to n = 6, padded with zeros.
const BINOMIAL: [[f64; 7]; 7] = [
    [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 3.0, 3.0, 1.0, 0.0, 0.0, 0.0],
    [1.0, 4.0, 6.0, 4.0, 1.0, 0.0, 0.0],
    [1.0, 5.0, 10.0, 10.0, 5.0, 1.0, 0.0],
    [1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0],
];

/// A Bezier curve of degree 1 to 6.
///
/// The derivative curve is built once at construction and is itself a full
/// [`BezierCurve`] of one lower degree, owned exclusively by its parent, so
/// the chain bottoms out after at most six levels.
///
/// The arc-length table is built lazily on the first arc-length query and is
/// write-once; concurrent callers block until the single build completes.
#[derive(Clone, Debug)]
pub struct BezierCurve {
    points: ArrayVec<Point2d, MAX_CONTROL_POINTS>,
    derivative: Option<Box<BezierCurve>>,
    table: OnceLock<Result<ArcLengthTable, Error>>,
}

impl BezierCurve {
    /// Creates a new Bezier curve from 2 to 7 control points.
    pub fn new(control_points: &[Point2d]) -> Result<Self, Error> {
        if !(2..=MAX_CONTROL_POINTS).contains(&control_points.len()) {
            return Err(Error::invalid_config(format!(
                "a Bezier curve needs 2 to {MAX_CONTROL_POINTS} control points, got {}",
                control_points.len()
            )));
        }
        Ok(Self::from_points(control_points.iter().copied().collect()))
    }

    fn from_points(points: ArrayVec<Point2d, MAX_CONTROL_POINTS>) -> Self {
        let derivative = (points.len() > 1).then(|| {
            let scale = (points.len() - 1) as f64;
            let derived = points
                .windows(2)
                .map(|pair| Point2d::from_vec((pair[1] - pair[0]) * scale))
                .collect();
            Box::new(Self::from_points(derived))
        });
        Self {
            points,
            derivative,
            table: OnceLock::new(),
        }
    }

    /// The degree of the curve.
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// The control points of the curve.
    pub fn control_points(&self) -> &[Point2d] {
        &self.points
    }

    /// The derivative curve, or `None` for a constant curve.
    pub fn derivative(&self) -> Option<&BezierCurve> {
        self.derivative.as_deref()
    }

    /// Samples the curve using the Bernstein basis formula.
    pub fn point(&self, t: f64) -> Point2d {
        let n = self.degree();
        let mt = 1.0 - t;
        let mut acc = Vector2d::zero();
        for (k, p) in self.points.iter().enumerate() {
            let basis = BINOMIAL[n][k] * mt.powi((n - k) as i32) * t.powi(k as i32);
            acc += basis * p.to_vec();
        }
        Point2d::from_vec(acc)
    }

    /// Samples the curve by recursive linear interpolation of the control
    /// points. Agrees with [`point`](Self::point) to floating tolerance.
    pub fn de_casteljau(&self, t: f64) -> Point2d {
        let mut pts: ArrayVec<Vector2d, MAX_CONTROL_POINTS> =
            self.points.iter().map(|p| p.to_vec()).collect();
        let mt = 1.0 - t;
        for k in (1..pts.len()).rev() {
            for i in 0..k {
                pts[i] = mt * pts[i] + t * pts[i + 1];
            }
        }
        Point2d::from_vec(pts[0])
    }

    /// Samples the first derivative of the curve.
    pub fn sample_dt(&self, t: f64) -> Vector2d {
        self.derivative
            .as_ref()
            .map_or_else(Vector2d::zero, |d| d.point(t).to_vec())
    }

    /// Samples the second derivative of the curve.
    pub fn sample_dt2(&self, t: f64) -> Vector2d {
        self.derivative
            .as_ref()
            .map_or_else(Vector2d::zero, |d| d.sample_dt(t))
    }

    /// The speed along the curve, `|dB/dt|`.
    pub fn speed(&self, t: f64) -> f64 {
        self.sample_dt(t).magnitude()
    }

    /// The signed curvature at parameter `t`.
    ///
    /// Positive curvature means the left side is the inner side of the turn.
    pub fn curvature(&self, t: f64) -> f64 {
        let d1 = self.sample_dt(t);
        let d2 = self.sample_dt2(t);
        let denom = d1.magnitude2().powf(1.5);
        if denom < 1e-30 {
            return 0.0;
        }
        d1.perp_dot(d2) / denom
    }

    /// The unit tangent at parameter `t`.
    pub fn heading(&self, t: f64) -> Vector2d {
        let d1 = self.sample_dt(t);
        let mag = d1.magnitude();
        if mag > 1e-12 {
            return d1 / mag;
        }
        // Degenerate tangent; fall back to a small secant around t.
        let h = 1e-6;
        let p1 = self.point((t - h).max(0.0));
        let p2 = self.point((t + h).min(1.0));
        (p2 - p1).normalize()
    }

    /// The curve's arc-length table, building it on first use.
    ///
    /// Construction runs to completion exactly once; a construction failure
    /// permanently poisons the curve's arc-length queries.
    pub fn table(&self) -> Result<&ArcLengthTable, Error> {
        self.table
            .get_or_init(|| ArcLengthTable::build(|t| self.speed(t), DEFAULT_TABLE_RESOLUTION))
            .as_ref()
            .map_err(Error::clone)
    }

    /// The total arc length of the curve.
    pub fn total_arc_length(&self) -> Result<f64, Error> {
        Ok(self.table()?.total())
    }

    /// The arc length travelled at parameter `t`.
    pub fn arc_length(&self, t: f64) -> Result<f64, Error> {
        Ok(self.table()?.arc_length_at(t))
    }

    /// The parameter that reaches the given arc length.
    pub fn t_at_arc_length(&self, arc_length: f64) -> Result<f64, Error> {
        Ok(self.table()?.t_at_arc_length(arc_length))
    }

    /// The point at the given arc length along the curve.
    pub fn point_at_arc_length(&self, arc_length: f64) -> Result<Point2d, Error> {
        Ok(self.point(self.t_at_arc_length(arc_length)?))
    }

    /// The signed curvature at the given arc length along the curve.
    pub fn curvature_at_arc_length(&self, arc_length: f64) -> Result<f64, Error> {
        Ok(self.curvature(self.t_at_arc_length(arc_length)?))
    }

    /// The unit tangent at the given arc length along the curve.
    pub fn heading_at_arc_length(&self, arc_length: f64) -> Result<Vector2d, Error> {
        Ok(self.heading(self.t_at_arc_length(arc_length)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    fn random_curve(rng: &mut impl Rng, count: usize) -> BezierCurve {
        let points: Vec<Point2d> = (0..count)
            .map(|_| Point2d::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
            .collect();
        BezierCurve::new(&points).unwrap()
    }

    #[test]
    fn bernstein_matches_de_casteljau() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        for count in 2..=MAX_CONTROL_POINTS {
            let curve = random_curve(&mut rng, count);
            for i in 0..=100 {
                let t = i as f64 / 100.0;
                let a = curve.point(t);
                let b = curve.de_casteljau(t);
                assert_approx_eq!(a.x, b.x, 1e-9);
                assert_approx_eq!(a.y, b.y, 1e-9);
            }
        }
    }

    #[test]
    fn rejects_bad_control_point_counts() {
        assert!(BezierCurve::new(&[Point2d::new(0.0, 0.0)]).is_err());
        let many = [Point2d::new(0.0, 0.0); 8];
        assert!(BezierCurve::new(&many).is_err());
    }

    #[test]
    fn derivative_chain_descends_by_one_degree() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let curve = random_curve(&mut rng, 7);
        let mut level = Some(&curve);
        for degree in (0..=6).rev() {
            let curve = level.unwrap();
            assert_eq!(curve.degree(), degree);
            level = curve.derivative();
        }
        assert!(level.is_none());
    }

    #[test]
    fn endpoint_tangents_follow_control_polygon() {
        let curve = BezierCurve::new(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 50.0),
            Point2d::new(50.0, 100.0),
            Point2d::new(100.0, 100.0),
        ])
        .unwrap();
        let start = curve.heading(0.0);
        assert_approx_eq!(start.x, 0.0, 1e-12);
        assert_approx_eq!(start.y, 1.0, 1e-12);
        let end = curve.heading(1.0);
        assert_approx_eq!(end.x, 1.0, 1e-12);
        assert_approx_eq!(end.y, 0.0, 1e-12);
    }

    #[test]
    fn left_turn_has_positive_curvature() {
        // Quarter turn from +x towards +y, bending left the whole way.
        let curve = BezierCurve::new(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
        ])
        .unwrap();
        for i in 0..=10 {
            assert!(curve.curvature(i as f64 / 10.0) > 0.0);
        }
        // The mirror image bends right.
        let mirrored = BezierCurve::new(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, -1.0),
        ])
        .unwrap();
        for i in 0..=10 {
            assert!(mirrored.curvature(i as f64 / 10.0) < 0.0);
        }
    }

    #[test]
    fn straight_curve_arc_length_is_chord_length() {
        let curve = BezierCurve::new(&[Point2d::new(1.0, 2.0), Point2d::new(4.0, 6.0)]).unwrap();
        assert_approx_eq!(curve.total_arc_length().unwrap(), 5.0, 1e-9);
        assert_approx_eq!(curve.arc_length(0.5).unwrap(), 2.5, 1e-9);
    }

    #[test]
    fn quarter_circle_approximation_length() {
        // The standard cubic approximation of a unit quarter circle.
        let k = 0.5522847498;
        let curve = BezierCurve::new(&[
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, k),
            Point2d::new(k, 1.0),
            Point2d::new(0.0, 1.0),
        ])
        .unwrap();
        assert_approx_eq!(
            curve.total_arc_length().unwrap(),
            std::f64::consts::FRAC_PI_2,
            1e-3
        );
        // Curvature is close to 1 everywhere and positive (left turn).
        for i in 0..=10 {
            assert_approx_eq!(curve.curvature(i as f64 / 10.0), 1.0, 0.01);
        }
    }

    #[test]
    fn arc_length_round_trip() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let curve = random_curve(&mut rng, 5);
        for i in 0..=50 {
            let t = i as f64 / 50.0;
            let s = curve.arc_length(t).unwrap();
            assert_approx_eq!(curve.t_at_arc_length(s).unwrap(), t, 1e-5);
        }
    }
}
