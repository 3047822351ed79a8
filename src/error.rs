use crate::math::Point2d;
use thiserror::Error;

/// The errors produced by path construction and trajectory generation.
///
/// Geometry and table-construction failures are fatal to the affected
/// segment or curve and always propagate; nothing is silently skipped
/// unless the caller opts into [`InvalidWaypointPolicy::Skip`].
///
/// [`InvalidWaypointPolicy::Skip`]: crate::InvalidWaypointPolicy::Skip
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// No stitching case joins the two waypoints.
    ///
    /// `alpha` is the angle of the chord relative to the first waypoint's
    /// heading, and `beta` is the angle between the two headings, both in
    /// radians.
    #[error(
        "no curve joins the waypoint at ({:.3}, {:.3}) to the waypoint at ({:.3}, {:.3}) \
         (alpha = {alpha:.4} rad, beta = {beta:.4} rad)",
        from.x, from.y, to.x, to.y
    )]
    WaypointGeometry {
        from: Point2d,
        to: Point2d,
        alpha: f64,
        beta: f64,
    },

    /// An arc-length table failed its monotonicity invariant after construction.
    #[error("arc-length table is not monotone increasing at sample {index} of {resolution}")]
    NumericalInstability { index: usize, resolution: usize },

    /// A motion profile goal is unreachable under the given constraints.
    #[error(
        "goal at position {position:.3} with velocity {velocity:.3} is unreachable \
         under the given constraints"
    )]
    InfeasibleProfile { position: f64, velocity: f64 },

    /// A scalar configuration value is out of range, or the track width is
    /// incompatible with the path's minimum turning radius.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
