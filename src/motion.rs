//! Constrained 1-D trapezoidal motion profiles over cumulative arc length.

pub use generate::{
    generate_profile, CompletionBehavior, MotionProfileConstraints, MotionProfileGoal,
};
pub use profile::MotionProfile;
pub use state::{MotionSegment, MotionState};

mod generate;
mod profile;
mod state;
