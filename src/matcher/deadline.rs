use crate::matcher::MatchError;

use std::time::{Duration, Instant};

/// The instant by which a match must complete, if any.
///
/// Matchers check the deadline as they progress through a trace, and
/// abandon the match with [`MatchError::DeadlineExceeded`] once it passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline which never passes.
    #[inline]
    pub const fn none() -> Self {
        Deadline(None)
    }

    #[inline]
    pub const fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    /// A deadline `budget` from now.
    #[inline]
    pub fn after(budget: Duration) -> Self {
        // An unrepresentable instant is as good as never.
        Deadline(Instant::now().checked_add(budget))
    }

    #[inline]
    pub fn instant(&self) -> Option<Instant> {
        self.0
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.0.is_some_and(|instant| Instant::now() >= instant)
    }

    /// Fails if the deadline has passed, having processed `processed` of `total` positions.
    #[inline]
    pub fn check(&self, processed: usize, total: usize) -> Result<(), MatchError> {
        if self.expired() {
            return Err(MatchError::DeadlineExceeded { processed, total });
        }

        Ok(())
    }
}
