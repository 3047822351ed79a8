//! Offline trajectory generation for differential-drive robots.
//!
//! Oriented waypoints are stitched into a tangent-continuous path of Bezier
//! curves and line segments, a trapezoidal motion profile is fitted over the
//! path's arc length, and the result is sampled into left and right wheel
//! point streams a drivetrain follower can execute.
//!
//! ```
//! use tank_traj::{generate, GeneratorConfig, Waypoint};
//! use std::f64::consts::FRAC_PI_2;
//!
//! let waypoints = [
//!     Waypoint::new(0.0, 0.0, FRAC_PI_2, 0.0),
//!     Waypoint::new(100.0, 100.0, 0.0, 0.0),
//! ];
//! let config = GeneratorConfig::new(25.0, 5.0, 10.0, 0.02);
//! let wheels = generate(&waypoints, &config, true).unwrap();
//! assert_eq!(wheels.left.len(), wheels.right.len());
//! ```

pub use cgmath;
pub use error::Error;
pub use motion::{
    generate_profile, CompletionBehavior, MotionProfile, MotionProfileConstraints,
    MotionProfileGoal, MotionSegment, MotionState,
};
pub use path::{
    InvalidWaypointPolicy, Path, PathSegment, Waypoint, DEFAULT_MID_CONTROL_FRACTION,
};
pub use trajectory::{
    generate, sample_wheels, GeneratorConfig, InterpolatedTrajectory, TrajectoryPoint,
    WheelTrajectories,
};

mod error;
pub mod math;
mod motion;
mod path;
mod trajectory;
