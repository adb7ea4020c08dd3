use crate::matcher::{Deadline, MatchError, MatchResult};

use geo::Point;
use mapmatch_geo::{Crs, Reproject, Trace};

pub trait Matcher: Send + Sync {
    /// Matches every position of the trace onto a road of the index.
    ///
    /// The result holds exactly one [`Match`](crate::Match) per position,
    /// in trace order, each carrying the position as it was given. An
    /// empty trace produces an empty result.
    fn match_trace(&self, trace: &Trace) -> Result<MatchResult, MatchError> {
        self.match_trace_until(trace, Deadline::none())
    }

    /// Like [`Matcher::match_trace`], but abandons the match with
    /// [`MatchError::DeadlineExceeded`] once the `deadline` passes.
    fn match_trace_until(
        &self,
        trace: &Trace,
        deadline: Deadline,
    ) -> Result<MatchResult, MatchError>;
}

/// The positions of the trace, expressed in the `crs` system of the index.
pub(crate) fn positions(
    trace: &Trace,
    crs: Crs,
    projection: &impl Reproject,
) -> Result<Vec<Point>, MatchError> {
    let positions = trace.to_crs(crs, projection)?.points().collect();
    Ok(positions)
}

/// Rejects distances which are negative, infinite or not a number.
pub(crate) fn ensure_distance(value: f64, message: &'static str) -> Result<(), MatchError> {
    if !value.is_finite() || value < 0.0 {
        return Err(MatchError::InvalidConfig(message));
    }

    Ok(())
}
