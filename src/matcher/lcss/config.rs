use crate::matcher::MatchError;
use crate::matcher::definition::ensure_distance;

use serde::{Deserialize, Serialize};

const DEFAULT_DISTANCE_EPSILON: f64 = 50.0; // 50m
const DEFAULT_MAX_CANDIDATES: usize = 25;
const DEFAULT_RESTART_PENALTY: f64 = 1.0;

/// Tuning of the [`LcssMatcher`](crate::LcssMatcher).
///
/// Can be loaded from any serde format. Missing fields take their defaults.
///
/// ```rust
/// use mapmatch::LcssConfig;
///
/// let config = LcssConfig::default().with_distance_epsilon(20.0);
/// assert_eq!(config.max_candidates, 25);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcssConfig {
    /// A position is close to a road when strictly nearer than this distance.
    ///
    /// Only close roads become candidates, and the similarity of a candidate
    /// falls linearly from one, upon the road, to zero at this distance.
    pub distance_epsilon: f64,

    /// The most candidates kept per position, nearest first.
    pub max_candidates: usize,

    /// The score lost when the aligned path moves between two roads
    /// other than through a junction joining them. A value above one means
    /// a single position is never worth leaving the network for.
    pub restart_penalty: f64,
}

impl Default for LcssConfig {
    fn default() -> Self {
        LcssConfig {
            distance_epsilon: DEFAULT_DISTANCE_EPSILON,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            restart_penalty: DEFAULT_RESTART_PENALTY,
        }
    }
}

impl LcssConfig {
    pub fn with_distance_epsilon(self, distance_epsilon: f64) -> Self {
        LcssConfig {
            distance_epsilon,
            ..self
        }
    }

    pub fn with_max_candidates(self, max_candidates: usize) -> Self {
        LcssConfig {
            max_candidates,
            ..self
        }
    }

    pub fn with_restart_penalty(self, restart_penalty: f64) -> Self {
        LcssConfig {
            restart_penalty,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        ensure_distance(self.distance_epsilon, "distance epsilon must be finite and non-negative")?;
        ensure_distance(self.restart_penalty, "restart penalty must be finite and non-negative")?;

        if self.distance_epsilon == 0.0 {
            return Err(MatchError::InvalidConfig("distance epsilon must be positive"));
        }

        if self.max_candidates == 0 {
            return Err(MatchError::InvalidConfig("at least one candidate must be kept"));
        }

        Ok(())
    }

    /// Similarity of a position `distance` away from a road, within `(0, 1]`
    /// for close roads and `None` otherwise.
    #[inline]
    pub fn similarity(&self, distance: f64) -> Option<f64> {
        (distance < self.distance_epsilon).then(|| 1.0 - distance / self.distance_epsilon)
    }
}
