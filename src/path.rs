use crate::error::Error;
use crate::math::{unit_vector, PathCurve, Point2d, Vector2d};
use crate::motion::{
    generate_profile, CompletionBehavior, MotionProfile, MotionProfileConstraints,
    MotionProfileGoal, MotionState,
};
use cgmath::prelude::*;

mod builder;

/// The default fraction along the chords to the shoulder/intersection points
/// at which the secondary control points are placed. Lower values produce
/// sharper curves; higher values overshoot wider.
pub const DEFAULT_MID_CONTROL_FRACTION: f64 = 0.5;

/// An oriented waypoint the robot drives through.
#[derive(Clone, Copy, Debug)]
pub struct Waypoint {
    /// The position of the robot's centre.
    pub position: Point2d,
    /// The unit vector the robot is facing along.
    pub heading: Vector2d,
    /// The signed target speed as the robot passes through, in units/s.
    pub speed: f64,
}

impl Waypoint {
    /// Creates a waypoint from a position, a heading angle in radians
    /// (anticlockwise from the positive x-axis) and a target speed.
    pub fn new(x: f64, y: f64, heading_radians: f64, speed: f64) -> Self {
        Self {
            position: Point2d::new(x, y),
            heading: unit_vector(heading_radians),
            speed,
        }
    }

    /// Creates a waypoint from a position and a heading vector, which is
    /// normalized to unit length.
    pub fn with_heading_vector(position: Point2d, heading: Vector2d, speed: f64) -> Self {
        Self {
            position,
            heading: heading.normalize(),
            speed,
        }
    }
}

/// One leg of a path: the curve joining two consecutive waypoints.
#[derive(Clone, Debug)]
pub struct PathSegment {
    pub start: Waypoint,
    pub end: Waypoint,
    pub curve: PathCurve,
}

/// What to do when a pair of waypoints matches none of the stitching cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidWaypointPolicy {
    /// Propagate a [`Error::WaypointGeometry`] to the caller.
    #[default]
    Fail,
    /// Log a warning and drop the offending waypoint.
    Skip,
}

/// An ordered sequence of tangent-continuous path segments built from
/// waypoints, with an optional motion profile attached after generation.
#[derive(Clone, Debug)]
pub struct Path {
    segments: Vec<PathSegment>,
    last: Waypoint,
    drive_forwards: bool,
    policy: InvalidWaypointPolicy,
    profile: Option<MotionProfile>,
}

impl Path {
    /// Creates an empty path starting at the given waypoint.
    pub fn new(first: Waypoint, drive_forwards: bool) -> Self {
        Self {
            segments: vec![],
            last: first,
            drive_forwards,
            policy: InvalidWaypointPolicy::default(),
            profile: None,
        }
    }

    /// Sets the policy for geometrically inconsistent waypoint pairs.
    pub fn with_invalid_waypoint_policy(mut self, policy: InvalidWaypointPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Appends a segment joining the previous waypoint to `waypoint`,
    /// using the default mid-control fraction.
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> Result<(), Error> {
        self.add_waypoint_with_fraction(waypoint, DEFAULT_MID_CONTROL_FRACTION)
    }

    /// Appends a segment joining the previous waypoint to `waypoint`.
    ///
    /// The curve is chosen by geometric case analysis on the two headings
    /// and the chord between the positions; it is tangent to both waypoints'
    /// headings at its ends. `fraction` places the secondary control points
    /// along the chords towards the shoulder points and must be in (0, 1].
    pub fn add_waypoint_with_fraction(
        &mut self,
        waypoint: Waypoint,
        fraction: f64,
    ) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&fraction) || fraction == 0.0 {
            return Err(Error::invalid_config(format!(
                "mid-control fraction must be in (0, 1], got {fraction}"
            )));
        }
        match builder::connect(&self.last, &waypoint, fraction) {
            Ok(curve) => {
                self.segments.push(PathSegment {
                    start: self.last,
                    end: waypoint,
                    curve,
                });
                self.last = waypoint;
                Ok(())
            }
            Err(err @ Error::WaypointGeometry { .. })
                if self.policy == InvalidWaypointPolicy::Skip =>
            {
                log::warn!("dropping waypoint: {err}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Appends a pre-built segment, bypassing waypoint stitching.
    ///
    /// The caller is responsible for the curve being tangent-continuous with
    /// the path built so far.
    pub fn add_segment(&mut self, segment: PathSegment) {
        self.last = segment.end;
        self.segments.push(segment);
    }

    /// The segments of the path, in driving order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether the robot traverses the path driving forwards.
    pub fn drive_forwards(&self) -> bool {
        self.drive_forwards
    }

    /// The sum of the segment arc lengths, in segment order.
    pub fn total_arc_length(&self) -> Result<f64, Error> {
        let mut total = 0.0;
        for segment in &self.segments {
            total += segment.curve.total_arc_length()?;
        }
        Ok(total)
    }

    /// Generates and attaches the motion profile for this path.
    ///
    /// One trapezoidal sub-profile is generated per segment, each starting
    /// from the end state of the previous one and targeting the cumulative
    /// arc length at the segment's end together with the end waypoint's
    /// target speed. If the path drives backwards, the whole profile is
    /// mirrored once at the end.
    pub fn generate_profile(
        &mut self,
        max_velocity: f64,
        max_acceleration: f64,
    ) -> Result<(), Error> {
        if self.segments.is_empty() {
            return Err(Error::invalid_config("path has no segments"));
        }
        let constraints = MotionProfileConstraints {
            max_velocity,
            max_acceleration,
        };
        let mut profile = MotionProfile::default();
        let mut state = MotionState::default();
        let mut cumulative = 0.0;
        for segment in &self.segments {
            cumulative += segment.curve.total_arc_length()?;
            let goal = MotionProfileGoal {
                position: cumulative,
                max_abs_velocity: segment.end.speed.abs(),
                completion: CompletionBehavior::Overshoot,
            };
            let sub = generate_profile(constraints, goal, state)?;
            state = sub.end_state();
            profile.append(sub);
        }
        if !self.drive_forwards {
            profile = profile.mirrored();
        }
        self.profile = Some(profile);
        Ok(())
    }

    /// The motion profile, if one has been generated.
    pub fn profile(&self) -> Option<&MotionProfile> {
        self.profile.as_ref()
    }
}
