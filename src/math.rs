//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
pub use bezier::BezierCurve;
pub use curve::PathCurve;
pub use gauss::{integrate64, integrate8};
pub use line::{line_intersection, LineSegment2d};
pub use lut::{ArcLengthTable, DEFAULT_TABLE_RESOLUTION};
pub use util::*;

mod bezier;
mod curve;
mod gauss;
mod line;
mod lut;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;
