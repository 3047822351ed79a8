use crate::math::{epsilon_eq, EPSILON};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kinematic state of the robot's centre at an instant in time.
///
/// `pos` is the signed cumulative arc length along the path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionState {
    /// The time in seconds.
    pub t: f64,
    /// The signed cumulative arc length in units.
    pub pos: f64,
    /// The velocity in units/s.
    pub vel: f64,
    /// The acceleration in units/s^2.
    pub acc: f64,
}

impl MotionState {
    pub const fn new(t: f64, pos: f64, vel: f64, acc: f64) -> Self {
        Self { t, pos, vel, acc }
    }

    /// The state at time `t` assuming constant acceleration from this state.
    pub fn extrapolate(&self, t: f64) -> MotionState {
        let dt = t - self.t;
        MotionState {
            t,
            pos: self.pos + self.vel * dt + 0.5 * self.acc * dt * dt,
            vel: self.vel + self.acc * dt,
            acc: self.acc,
        }
    }

    /// The same state with position, velocity and acceleration negated,
    /// used to mirror a profile for backward driving.
    pub fn flipped(&self) -> MotionState {
        MotionState {
            t: self.t,
            pos: -self.pos,
            vel: -self.vel,
            acc: -self.acc,
        }
    }

    /// Returns true if the two states describe the same motion at the same
    /// time, within floating tolerance.
    pub fn coincident(&self, other: &MotionState) -> bool {
        epsilon_eq(self.t, other.t, EPSILON)
            && epsilon_eq(self.pos, other.pos, EPSILON)
            && epsilon_eq(self.vel, other.vel, EPSILON)
    }
}

/// One constant-acceleration phase of a motion profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSegment {
    pub start: MotionState,
    pub end: MotionState,
}

impl MotionSegment {
    pub const fn new(start: MotionState, end: MotionState) -> Self {
        Self { start, end }
    }

    /// The duration of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end.t - self.start.t
    }

    /// Returns true if `t` falls within the segment's time span.
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start.t - EPSILON && t <= self.end.t + EPSILON
    }

    /// The interpolated state at time `t` within the segment.
    pub fn state_at(&self, t: f64) -> MotionState {
        self.start.extrapolate(t.min(self.end.t))
    }

    /// The segment with both end states sign-flipped.
    pub fn flipped(&self) -> MotionSegment {
        MotionSegment {
            start: self.start.flipped(),
            end: self.end.flipped(),
        }
    }
}
