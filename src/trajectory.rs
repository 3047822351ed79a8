//! Samples a profiled path into per-wheel trajectory point streams.

use crate::error::Error;
use crate::math::{lerp, rot90, vector_angle, wrap_angle, PathCurve};
use crate::path::{Path, PathSegment, Waypoint, DEFAULT_MID_CONTROL_FRACTION};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Curvatures below this are treated as a straight path.
const CURVATURE_EPSILON: f64 = 1e-20;

/// One timestep of a wheel's trajectory, ready to feed a follower.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryPoint {
    /// The wheel's x coordinate in field units.
    pub x: f64,
    /// The wheel's y coordinate in field units.
    pub y: f64,
    /// The signed distance the wheel has rolled, in units.
    pub position: f64,
    /// The wheel's signed velocity in units/s.
    pub velocity: f64,
    /// The wheel's signed acceleration in units/s^2.
    pub acceleration: f64,
    /// The robot's heading in radians, anticlockwise from the positive x-axis.
    pub heading: f64,
    /// The timestep this point is valid for, in seconds.
    pub duration: f64,
}

/// The left and right wheel point streams, sampled at the same instants.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelTrajectories {
    pub left: Vec<TrajectoryPoint>,
    pub right: Vec<TrajectoryPoint>,
}

impl WheelTrajectories {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// The robot and sampling parameters for trajectory generation.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// The maximum centre velocity in units/s.
    pub max_velocity: f64,
    /// The maximum centre acceleration in units/s^2.
    pub max_acceleration: f64,
    /// The distance between the wheel centrelines, in units.
    pub track_width: f64,
    /// The timestep between consecutive trajectory points, in seconds.
    pub point_duration_sec: f64,
    /// The fraction along the chords at which the secondary Bezier control
    /// points are placed when stitching waypoints.
    pub mid_control_fraction: f64,
}

impl GeneratorConfig {
    pub fn new(
        max_velocity: f64,
        max_acceleration: f64,
        track_width: f64,
        point_duration_sec: f64,
    ) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            track_width,
            point_duration_sec,
            mid_control_fraction: DEFAULT_MID_CONTROL_FRACTION,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
            ("track_width", self.track_width),
            ("point_duration_sec", self.point_duration_sec),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.mid_control_fraction > 0.0) || self.mid_control_fraction > 1.0 {
            return Err(Error::invalid_config(format!(
                "mid_control_fraction must be in (0, 1], got {}",
                self.mid_control_fraction
            )));
        }
        Ok(())
    }
}

/// Generates the per-wheel trajectories for a path through `waypoints`.
///
/// Stitches the waypoints into a path, attaches a trapezoidal motion
/// profile within the configured limits, and samples it at the configured
/// timestep. This is the whole pipeline in one call; build a [`Path`]
/// directly for finer control.
pub fn generate(
    waypoints: &[Waypoint],
    config: &GeneratorConfig,
    drive_forwards: bool,
) -> Result<WheelTrajectories, Error> {
    config.validate()?;
    let (first, rest) = match waypoints.split_first() {
        Some(split) if !split.1.is_empty() => split,
        _ => {
            return Err(Error::invalid_config(
                "at least two waypoints are required",
            ));
        }
    };
    let mut path = Path::new(*first, drive_forwards);
    for waypoint in rest {
        path.add_waypoint_with_fraction(*waypoint, config.mid_control_fraction)?;
    }
    path.generate_profile(config.max_velocity, config.max_acceleration)?;
    log::info!(
        "profiled {} segment(s), {:.3} units over {:.3}s",
        path.segments().len(),
        path.total_arc_length()?,
        path.profile().map_or(0.0, |p| p.duration()),
    );
    sample_wheels(&path, config)
}

/// Samples the path's motion profile into left and right wheel points at the
/// configured timestep.
///
/// Wheel speeds are scaled from the centre speed by their turn radii,
/// normalized so the outer wheel carries the centre speed and neither wheel
/// exceeds the velocity limit. Wheel accelerations are finite-differenced
/// from consecutive velocities. Fails with [`Error::InvalidConfiguration`]
/// if the path turns tighter than half the track width allows.
pub fn sample_wheels(path: &Path, config: &GeneratorConfig) -> Result<WheelTrajectories, Error> {
    let profile = path
        .profile()
        .ok_or_else(|| Error::invalid_config("path has no motion profile"))?;
    let dt = config.point_duration_sec;
    let half_width = 0.5 * config.track_width;
    // One extra sample past the profile end so the streams finish at rest
    // with zero finite-differenced acceleration.
    let steps = (profile.duration() / dt).ceil() as usize + 1;

    let mut out = WheelTrajectories {
        left: Vec::with_capacity(steps + 1),
        right: Vec::with_capacity(steps + 1),
    };
    let mut cursor = PathCursor::new(path.segments());
    let mut rolled = (0.0, 0.0);
    let mut previous = (0.0, 0.0);
    for i in 0..=steps {
        let t = (i as f64 * dt).min(profile.end_time());
        let state = profile.state_by_time_clamped(t);
        let (curve, along) = cursor.seek(state.pos.abs())?;

        let centre = curve.point_at_arc_length(along)?;
        let tangent = curve.heading_at_arc_length(along)?;
        let normal = rot90(tangent);
        let heading = vector_angle(tangent);
        let curvature = curve.curvature_at_arc_length(along)?;
        let (left_scale, right_scale) = wheel_scales(curvature, config.track_width)?;

        let velocity = (state.vel * left_scale, state.vel * right_scale);
        if i > 0 {
            // Trapezoidal integration of the rolled distance.
            rolled.0 += 0.5 * (previous.0 + velocity.0) * dt;
            rolled.1 += 0.5 * (previous.1 + velocity.1) * dt;
        }
        let acceleration = if i == 0 {
            (0.0, 0.0)
        } else {
            ((velocity.0 - previous.0) / dt, (velocity.1 - previous.1) / dt)
        };
        previous = velocity;

        let left_at = centre + half_width * normal;
        let right_at = centre - half_width * normal;
        out.left.push(TrajectoryPoint {
            x: left_at.x,
            y: left_at.y,
            position: rolled.0,
            velocity: velocity.0,
            acceleration: acceleration.0,
            heading,
            duration: dt,
        });
        out.right.push(TrajectoryPoint {
            x: right_at.x,
            y: right_at.y,
            position: rolled.1,
            velocity: velocity.1,
            acceleration: acceleration.1,
            heading,
            duration: dt,
        });
    }
    Ok(out)
}

/// The per-wheel velocity scale factors for the given signed curvature.
///
/// Positive curvature turns left, so the left wheel rides the inner, shorter
/// radius. The scales are normalized by the outer radius so the faster wheel
/// matches the centre speed exactly.
fn wheel_scales(curvature: f64, track_width: f64) -> Result<(f64, f64), Error> {
    if curvature.abs() < CURVATURE_EPSILON {
        return Ok((1.0, 1.0));
    }
    let radius = 1.0 / curvature;
    if 2.0 * radius.abs() < track_width {
        return Err(Error::invalid_config(format!(
            "turn radius {:.3} is tighter than half the track width {:.3}",
            radius.abs(),
            track_width
        )));
    }
    let left = (radius - 0.5 * track_width).abs();
    let right = (radius + 0.5 * track_width).abs();
    let outer = left.max(right);
    Ok((left / outer, right / outer))
}

/// A monotonic cursor over a path's segments, mapping cumulative arc length
/// along the whole path to a segment-local arc length.
struct PathCursor<'a> {
    segments: &'a [PathSegment],
    index: usize,
    consumed: f64,
}

impl<'a> PathCursor<'a> {
    fn new(segments: &'a [PathSegment]) -> Self {
        Self {
            segments,
            index: 0,
            consumed: 0.0,
        }
    }

    /// The curve containing `arc_length` and the offset within it. Queries
    /// must be non-decreasing; past the end of the path the last segment's
    /// end is returned.
    fn seek(&mut self, arc_length: f64) -> Result<(&'a PathCurve, f64), Error> {
        loop {
            let segment = &self.segments[self.index];
            let length = segment.curve.total_arc_length()?;
            let along = arc_length - self.consumed;
            if along <= length || self.index + 1 == self.segments.len() {
                return Ok((&segment.curve, along.clamp(0.0, length)));
            }
            self.consumed += length;
            self.index += 1;
        }
    }
}

/// The centre velocity and heading of a profiled path resampled at a uniform
/// interval, for constant-time lookup at a sensor or control loop rate.
#[derive(Clone, Debug)]
pub struct InterpolatedTrajectory {
    interval: f64,
    velocities: Vec<f64>,
    headings: Vec<f64>,
}

impl InterpolatedTrajectory {
    pub fn from_path(path: &Path, interval: f64) -> Result<Self, Error> {
        if !(interval > 0.0) {
            return Err(Error::invalid_config(format!(
                "sample interval must be positive, got {interval}"
            )));
        }
        let profile = path
            .profile()
            .ok_or_else(|| Error::invalid_config("path has no motion profile"))?;
        let steps = (profile.duration() / interval).ceil() as usize;
        let mut cursor = PathCursor::new(path.segments());
        let mut velocities = Vec::with_capacity(steps + 1);
        let mut headings = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let t = (i as f64 * interval).min(profile.end_time());
            let state = profile.state_by_time_clamped(t);
            let (curve, along) = cursor.seek(state.pos.abs())?;
            velocities.push(state.vel);
            headings.push(vector_angle(curve.heading_at_arc_length(along)?));
        }
        Ok(Self {
            interval,
            velocities,
            headings,
        })
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn duration(&self) -> f64 {
        (self.velocities.len() - 1) as f64 * self.interval
    }

    /// The interpolated centre velocity and heading at time `t`, clamped to
    /// the trajectory's time span. Headings interpolate along the shorter
    /// angular arc.
    pub fn sample(&self, t: f64) -> (f64, f64) {
        let last = self.velocities.len() - 1;
        let scaled = (t / self.interval).clamp(0.0, last as f64);
        let index = (scaled.floor() as usize).min(last.saturating_sub(1));
        if last == 0 {
            return (self.velocities[0], self.headings[0]);
        }
        let frac = scaled - index as f64;
        let velocity = lerp(self.velocities[index], self.velocities[index + 1], frac);
        let h0 = self.headings[index];
        let heading = wrap_angle(h0 + frac * wrap_angle(self.headings[index + 1] - h0));
        (velocity, heading)
    }
}
