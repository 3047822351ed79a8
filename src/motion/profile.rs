use super::{MotionSegment, MotionState};
use crate::math::EPSILON;

/// A piecewise constant-acceleration motion profile over cumulative arc
/// length, queryable by absolute time.
#[derive(Clone, Debug, Default)]
pub struct MotionProfile {
    segments: Vec<MotionSegment>,
}

impl MotionProfile {
    pub(crate) fn from_segments(segments: Vec<MotionSegment>) -> Self {
        Self { segments }
    }

    /// The constant-acceleration phases of the profile, in time order.
    pub fn segments(&self) -> &[MotionSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The state at the start of the profile.
    pub fn start_state(&self) -> MotionState {
        self.segments.first().map_or_else(Default::default, |s| s.start)
    }

    /// The state at the end of the profile.
    pub fn end_state(&self) -> MotionState {
        self.segments.last().map_or_else(Default::default, |s| s.end)
    }

    pub fn start_time(&self) -> f64 {
        self.start_state().t
    }

    pub fn end_time(&self) -> f64 {
        self.end_state().t
    }

    /// The total duration of the profile in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// The interpolated state at time `t`, or `None` once `t` falls outside
    /// the profile's time span.
    pub fn state_by_time(&self, t: f64) -> Option<MotionState> {
        self.segments
            .iter()
            .find(|segment| segment.contains_time(t))
            .map(|segment| segment.state_at(t))
    }

    /// The interpolated state at time `t`, clamped to the profile's first or
    /// last state outside its time span. Used by samplers that must always
    /// produce a full-length point array.
    pub fn state_by_time_clamped(&self, t: f64) -> MotionState {
        if t <= self.start_time() {
            return self.start_state();
        }
        self.state_by_time(t).unwrap_or_else(|| self.end_state())
    }

    /// Appends another profile to the end of this one.
    ///
    /// The appended profile must continue where this one ends; sub-profiles
    /// generated from the running end state always do.
    pub fn append(&mut self, other: MotionProfile) {
        debug_assert!(
            self.is_empty()
                || other.is_empty()
                || self.end_state().coincident(&other.start_state()),
            "appended profile does not continue from the current end state"
        );
        self.segments.extend(other.segments);
    }

    /// A new profile with every state's position, velocity and acceleration
    /// negated, converting a forward profile into a backward one.
    pub fn mirrored(&self) -> MotionProfile {
        MotionProfile {
            segments: self.segments.iter().map(MotionSegment::flipped).collect(),
        }
    }

    /// Discards everything before time `t`, truncating the segment that
    /// spans it. Supports receding-horizon consumers that re-query the
    /// remainder of the profile as time advances.
    pub fn trim_before(&mut self, t: f64) {
        self.segments.retain(|segment| segment.end.t > t + EPSILON);
        if let Some(first) = self.segments.first_mut() {
            if first.start.t < t {
                first.start = first.start.extrapolate(t);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::motion::{
        generate_profile, CompletionBehavior, MotionProfileConstraints, MotionProfileGoal,
    };
    use assert_approx_eq::assert_approx_eq;

    const CONSTRAINTS: MotionProfileConstraints = MotionProfileConstraints {
        max_velocity: 10.0,
        max_acceleration: 2.0,
    };

    fn profile_to(position: f64, velocity: f64, start: MotionState) -> MotionProfile {
        let goal = MotionProfileGoal {
            position,
            max_abs_velocity: velocity,
            completion: CompletionBehavior::Overshoot,
        };
        generate_profile(CONSTRAINTS, goal, start).unwrap()
    }

    #[test]
    fn append_sums_durations_and_preserves_the_boundary_state() {
        let first = profile_to(60.0, 4.0, MotionState::default());
        let second = profile_to(150.0, 0.0, first.end_state());
        let boundary_time = first.end_time();
        let boundary = first.end_state();

        let mut combined = first.clone();
        combined.append(second.clone());
        assert_approx_eq!(
            combined.duration(),
            first.duration() + second.duration(),
            1e-9
        );
        let state = combined.state_by_time(boundary_time).unwrap();
        assert_approx_eq!(state.pos, boundary.pos, 1e-9);
        assert_approx_eq!(state.vel, boundary.vel, 1e-9);
    }

    #[test]
    fn mirroring_twice_is_the_identity() {
        let profile = profile_to(100.0, 0.0, MotionState::default());
        let twice = profile.mirrored().mirrored();
        for (a, b) in profile.segments().iter().zip(twice.segments()) {
            assert_eq!(a, b);
        }
        let mirrored = profile.mirrored();
        assert_approx_eq!(mirrored.end_state().pos, -100.0, 1e-9);
        assert!(mirrored.state_by_time_clamped(5.0).vel < 0.0);
    }

    #[test]
    fn query_past_the_end_returns_none_but_clamped_holds() {
        let profile = profile_to(100.0, 0.0, MotionState::default());
        let after = profile.end_time() + 1.0;
        assert!(profile.state_by_time(after).is_none());
        let clamped = profile.state_by_time_clamped(after);
        assert_approx_eq!(clamped.pos, 100.0, 1e-9);
        assert_approx_eq!(clamped.vel, 0.0, 1e-9);
    }

    #[test]
    fn trim_before_drops_the_elapsed_prefix() {
        let mut profile = profile_to(100.0, 0.0, MotionState::default());
        let mid = 0.5 * profile.duration();
        let expected = profile.state_by_time(mid).unwrap();
        profile.trim_before(mid);
        let start = profile.start_state();
        assert_approx_eq!(start.t, expected.t, 1e-9);
        assert_approx_eq!(start.pos, expected.pos, 1e-9);
        assert_approx_eq!(start.vel, expected.vel, 1e-9);
        assert_approx_eq!(profile.end_state().pos, 100.0, 1e-9);
    }

    #[test]
    fn empty_profile_queries_are_sane() {
        let profile = MotionProfile::default();
        assert!(profile.is_empty());
        assert_eq!(profile.duration(), 0.0);
        assert!(profile.state_by_time(1.0).is_none());
    }
}
