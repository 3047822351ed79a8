use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// A directed straight line segment, the zero-curvature path curve.
#[derive(Clone, Copy, Debug)]
pub struct LineSegment2d {
    start: Point2d,
    end: Point2d,
}

impl LineSegment2d {
    /// Creates a line segment from its two end points.
    pub const fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point2d {
        self.start
    }

    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The vector from the start to the end of the segment.
    pub fn direction(&self) -> Vector2d {
        self.end - self.start
    }

    /// The unit vector pointing from the start towards the end.
    pub fn heading(&self) -> Vector2d {
        self.direction().normalize()
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.direction().magnitude()
    }

    /// The point at the given distance along the segment from its start.
    pub fn point_at(&self, distance: f64) -> Point2d {
        self.start + distance * self.heading()
    }

    /// The point at the given fraction along the segment, where 0 is the
    /// start and 1 is the end.
    pub fn point_at_fraction(&self, fraction: f64) -> Point2d {
        self.start + fraction * self.direction()
    }
}

/// Computes the intersection of two infinite lines given in point-direction
/// form, or `None` if the lines are parallel.
pub fn line_intersection(
    p: Point2d,
    r: Vector2d,
    q: Point2d,
    s: Vector2d,
) -> Option<Point2d> {
    let denom = r.perp_dot(s);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (q - p).perp_dot(s) / denom;
    Some(p + t * r)
}
