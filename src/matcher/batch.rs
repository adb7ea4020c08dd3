use crate::matcher::{Deadline, MatchError, MatchResult, Matcher};

use log::info;
use mapmatch_geo::Trace;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Matches many traces at once, in parallel.
///
/// Every [`Matcher`] is a batch matcher. Each trace is matched
/// independently on the rayon pool, so that parallelism lies between
/// traces rather than within one. Results are returned in input order.
pub trait BatchMatch: Matcher {
    fn match_batch(&self, traces: &[Trace]) -> Vec<Result<MatchResult, MatchError>> {
        self.match_batch_within(traces, None)
    }

    /// Matches each trace with a deadline of `budget` from the moment its
    /// own match begins. A trace which overruns fails alone, with
    /// [`MatchError::DeadlineExceeded`], without affecting its siblings.
    fn match_batch_within(
        &self,
        traces: &[Trace],
        budget: Option<Duration>,
    ) -> Vec<Result<MatchResult, MatchError>> {
        let start_time = Instant::now();

        let results = traces
            .par_iter()
            .map(|trace| {
                let deadline = budget.map_or(Deadline::none(), Deadline::after);
                self.match_trace_until(trace, deadline)
            })
            .collect::<Vec<_>>();

        info!(
            "Finished. Matched {} of {} traces in {}ms",
            results.iter().filter(|result| result.is_ok()).count(),
            traces.len(),
            start_time.elapsed().as_millis()
        );

        results
    }
}

impl<M: Matcher + ?Sized> BatchMatch for M {}
