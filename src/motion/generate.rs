use super::{MotionProfile, MotionSegment, MotionState};
use crate::error::Error;
use crate::math::{epsilon_eq, EPSILON};

/// Symmetric velocity and acceleration bounds, applied in both travel
/// directions.
#[derive(Clone, Copy, Debug)]
pub struct MotionProfileConstraints {
    /// The absolute maximum velocity in units/s.
    pub max_velocity: f64,
    /// The absolute maximum acceleration in units/s^2.
    pub max_acceleration: f64,
}

/// What to do when a goal cannot be met exactly within the constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionBehavior {
    /// Respect the acceleration limit and let the final position overshoot
    /// the goal while still reaching the target speed.
    Overshoot,
    /// Hit the exact goal position and speed, momentarily exceeding the
    /// acceleration limit if required.
    ViolateMaxAccel,
}

/// The target end state of one generated sub-profile.
#[derive(Clone, Copy, Debug)]
pub struct MotionProfileGoal {
    /// The target cumulative arc length in units.
    pub position: f64,
    /// The absolute target speed at the goal position, in units/s.
    pub max_abs_velocity: f64,
    /// How to resolve an unreachable exact goal.
    pub completion: CompletionBehavior,
}

/// Generates a trapezoidal motion profile from `start` to `goal`.
///
/// The profile accelerates at the limit towards the lesser of the velocity
/// bound and the peak speed the distance allows, cruises, then decelerates
/// to the goal speed, degenerating to a triangle when there is no room to
/// cruise. Goals that are unreachable even in principle (behind the start
/// state, or faster than the velocity bound) surface as
/// [`Error::InfeasibleProfile`].
pub fn generate_profile(
    constraints: MotionProfileConstraints,
    goal: MotionProfileGoal,
    start: MotionState,
) -> Result<MotionProfile, Error> {
    let MotionProfileConstraints {
        max_velocity: vmax,
        max_acceleration: amax,
    } = constraints;
    if !(vmax > 0.0) || !(amax > 0.0) {
        return Err(Error::invalid_config(format!(
            "velocity and acceleration limits must be positive, got {vmax} and {amax}"
        )));
    }

    let v0 = start.vel.max(0.0);
    let vg = goal.max_abs_velocity;
    let distance = goal.position - start.pos;
    if distance < -EPSILON || vg < 0.0 || vg > vmax + EPSILON {
        return Err(Error::InfeasibleProfile {
            position: goal.position,
            velocity: vg,
        });
    }
    let distance = distance.max(0.0);

    let mut builder = ProfileBuilder::new(start);

    // Distance needed to change speed between v0 and vg at the limit.
    let change_distance = (v0 * v0 - vg * vg).abs() / (2.0 * amax);
    if distance + EPSILON < change_distance {
        match goal.completion {
            CompletionBehavior::Overshoot => {
                let acc = if vg > v0 { amax } else { -amax };
                builder.phase(acc, (vg - v0).abs() / amax);
            }
            CompletionBehavior::ViolateMaxAccel => {
                if distance < EPSILON {
                    builder.velocity_jump(vg);
                } else {
                    let acc = (vg * vg - v0 * v0) / (2.0 * distance);
                    builder.phase(acc, 2.0 * distance / (v0 + vg));
                }
            }
        }
        return Ok(builder.finish(&goal));
    }

    // The peak speed reachable if the profile accelerated to a point and
    // decelerated for the rest of the distance.
    let peak = (amax * distance + 0.5 * (v0 * v0 + vg * vg)).sqrt();
    let cruise = peak.min(vmax);
    if cruise < EPSILON && distance > EPSILON {
        return Err(Error::InfeasibleProfile {
            position: goal.position,
            velocity: vg,
        });
    }

    let ramp_in = (cruise * cruise - v0 * v0).abs() / (2.0 * amax);
    let ramp_out = (cruise * cruise - vg * vg).abs() / (2.0 * amax);
    let cruise_distance = (distance - ramp_in - ramp_out).max(0.0);

    if cruise > v0 + EPSILON {
        builder.phase(amax, (cruise - v0) / amax);
    } else if v0 > cruise + EPSILON {
        builder.phase(-amax, (v0 - cruise) / amax);
    }
    if cruise_distance > EPSILON {
        builder.phase(0.0, cruise_distance / cruise);
    }
    if cruise > vg + EPSILON {
        builder.phase(-amax, (cruise - vg) / amax);
    }
    Ok(builder.finish(&goal))
}

struct ProfileBuilder {
    state: MotionState,
    segments: Vec<MotionSegment>,
}

impl ProfileBuilder {
    fn new(start: MotionState) -> Self {
        Self {
            state: MotionState::new(start.t, start.pos, start.vel.max(0.0), 0.0),
            segments: vec![],
        }
    }

    /// Appends one constant-acceleration phase of the given duration.
    fn phase(&mut self, acc: f64, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let start = MotionState { acc, ..self.state };
        let end = start.extrapolate(start.t + dt);
        self.segments.push(MotionSegment::new(start, end));
        self.state = end;
    }

    /// Appends a zero-duration segment that steps the velocity directly,
    /// the degenerate `ViolateMaxAccel` resolution over zero distance.
    fn velocity_jump(&mut self, vel: f64) {
        let start = MotionState {
            acc: 0.0,
            ..self.state
        };
        let end = MotionState { vel, ..start };
        self.segments.push(MotionSegment::new(start, end));
        self.state = end;
    }

    /// Finalizes the profile, snapping the end state onto the goal where it
    /// already agrees to floating tolerance.
    fn finish(mut self, goal: &MotionProfileGoal) -> MotionProfile {
        if self.segments.is_empty() {
            // Already at the goal; a single zero-duration segment keeps the
            // profile queryable.
            self.segments
                .push(MotionSegment::new(self.state, self.state));
        }
        if let Some(last) = self.segments.last_mut() {
            if epsilon_eq(last.end.vel, goal.max_abs_velocity, EPSILON) {
                last.end.vel = goal.max_abs_velocity;
            }
            if epsilon_eq(last.end.pos, goal.position, EPSILON) {
                last.end.pos = goal.position;
            }
        }
        MotionProfile::from_segments(self.segments)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const CONSTRAINTS: MotionProfileConstraints = MotionProfileConstraints {
        max_velocity: 10.0,
        max_acceleration: 2.0,
    };

    fn goal(position: f64, velocity: f64) -> MotionProfileGoal {
        MotionProfileGoal {
            position,
            max_abs_velocity: velocity,
            completion: CompletionBehavior::Overshoot,
        }
    }

    #[test]
    fn full_trapezoid_from_rest() {
        let profile = generate_profile(CONSTRAINTS, goal(100.0, 0.0), MotionState::default())
            .unwrap();
        // Ramp up 5s/25u, cruise 5s/50u, ramp down 5s/25u.
        assert_eq!(profile.segments().len(), 3);
        assert_approx_eq!(profile.duration(), 15.0, 1e-9);
        let end = profile.end_state();
        assert_approx_eq!(end.pos, 100.0, 1e-9);
        assert_approx_eq!(end.vel, 0.0, 1e-9);
        let cruise = profile.state_by_time(7.5).unwrap();
        assert_approx_eq!(cruise.vel, 10.0, 1e-9);
        assert_approx_eq!(cruise.acc, 0.0, 1e-9);
    }

    #[test]
    fn short_move_degenerates_to_a_triangle() {
        let profile = generate_profile(CONSTRAINTS, goal(16.0, 0.0), MotionState::default())
            .unwrap();
        assert_eq!(profile.segments().len(), 2);
        let end = profile.end_state();
        assert_approx_eq!(end.pos, 16.0, 1e-9);
        assert_approx_eq!(end.vel, 0.0, 1e-9);
        // Peak velocity sqrt(a * d) = sqrt(32).
        let peak = profile.state_by_time(0.5 * profile.duration()).unwrap();
        assert_approx_eq!(peak.vel, 32.0_f64.sqrt(), 1e-9);
    }

    #[test]
    fn nonzero_end_speed() {
        let profile = generate_profile(CONSTRAINTS, goal(100.0, 6.0), MotionState::default())
            .unwrap();
        let end = profile.end_state();
        assert_approx_eq!(end.pos, 100.0, 1e-9);
        assert_approx_eq!(end.vel, 6.0, 1e-9);
    }

    #[test]
    fn overshoot_trades_position_for_the_speed_target() {
        // Moving fast with almost no room to slow down.
        let start = MotionState::new(0.0, 0.0, 10.0, 0.0);
        let profile = generate_profile(CONSTRAINTS, goal(1.0, 0.0), start).unwrap();
        let end = profile.end_state();
        assert_approx_eq!(end.vel, 0.0, 1e-9);
        // Stopping from 10 at 2 units/s^2 takes 25 units.
        assert_approx_eq!(end.pos, 25.0, 1e-9);
    }

    #[test]
    fn violate_max_accel_hits_the_exact_goal() {
        let start = MotionState::new(0.0, 0.0, 10.0, 0.0);
        let exact = MotionProfileGoal {
            position: 1.0,
            max_abs_velocity: 0.0,
            completion: CompletionBehavior::ViolateMaxAccel,
        };
        let profile = generate_profile(CONSTRAINTS, exact, start).unwrap();
        let end = profile.end_state();
        assert_approx_eq!(end.pos, 1.0, 1e-9);
        assert_approx_eq!(end.vel, 0.0, 1e-9);
        // The single braking phase exceeds the limit.
        assert!(profile.segments()[0].start.acc.abs() > CONSTRAINTS.max_acceleration);
    }

    #[test]
    fn chained_profile_continues_from_previous_state() {
        let first = generate_profile(CONSTRAINTS, goal(50.0, 6.0), MotionState::default())
            .unwrap();
        let second =
            generate_profile(CONSTRAINTS, goal(100.0, 0.0), first.end_state()).unwrap();
        assert_approx_eq!(second.start_state().vel, 6.0, 1e-9);
        assert_approx_eq!(second.end_state().pos, 100.0, 1e-9);
        assert!(second.start_time() >= first.duration() - 1e-9);
    }

    #[test]
    fn goal_behind_start_is_infeasible() {
        let start = MotionState::new(0.0, 50.0, 0.0, 0.0);
        let err = generate_profile(CONSTRAINTS, goal(10.0, 0.0), start).unwrap_err();
        assert!(matches!(err, Error::InfeasibleProfile { .. }));
    }

    #[test]
    fn goal_speed_above_the_limit_is_infeasible() {
        let err =
            generate_profile(CONSTRAINTS, goal(100.0, 50.0), MotionState::default()).unwrap_err();
        assert!(matches!(err, Error::InfeasibleProfile { .. }));
    }

    #[test]
    fn zero_distance_goal_yields_a_queryable_profile() {
        let profile =
            generate_profile(CONSTRAINTS, goal(0.0, 0.0), MotionState::default()).unwrap();
        assert_eq!(profile.segments().len(), 1);
        assert_approx_eq!(profile.duration(), 0.0, 1e-12);
    }
}
