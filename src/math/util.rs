use super::Vector2d;
use std::f64::consts::{PI, TAU};

/// A constant for consistent floating-point equality checking within this crate.
pub const EPSILON: f64 = 1e-6;

/// Rotates a vector 90 degrees anticlockwise, yielding its left normal.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Creates the unit vector pointing at the given angle in radians,
/// measured anticlockwise from the positive x-axis.
pub fn unit_vector(angle: f64) -> Vector2d {
    Vector2d::new(angle.cos(), angle.sin())
}

/// Returns the angle of a vector in radians, in (-pi, pi].
pub fn vector_angle(vec: Vector2d) -> f64 {
    vec.y.atan2(vec.x)
}

/// Rotates a vector anticlockwise by the given angle in radians.
pub fn rotate(vec: Vector2d, angle: f64) -> Vector2d {
    let (sin, cos) = angle.sin_cos();
    Vector2d::new(vec.x * cos - vec.y * sin, vec.x * sin + vec.y * cos)
}

/// Normalizes an angle in radians into (-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(TAU);
    if angle > PI {
        angle - TAU
    } else {
        angle
    }
}

/// Linearly interpolates between `low` and `high`.
pub fn lerp(low: f64, high: f64, mu: f64) -> f64 {
    (high - low) * mu + low
}

/// Returns true if the two values differ by less than `epsilon`.
pub fn epsilon_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
