use itertools::Itertools;
use mapmatch_geo::{Coordinate, RoadId};
use serde::Serialize;
use std::fmt::{Debug, Formatter};

/// The road assigned to a single position of a trace.
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    /// The position as given, in the reference system of the input trace.
    pub coordinate: Coordinate,

    /// The assigned road, or `None` if no road was acceptable.
    ///
    /// An unmatched position is not an error, it is an expected outcome
    /// for positions which stray far from the network.
    pub road: Option<RoadId>,

    /// Planar distance to the assigned road, in the units of the index system.
    ///
    /// For an unmatched position this is the distance to the nearest road
    /// that was considered, or infinite if there was none.
    pub distance: f64,
}

impl Match {
    pub fn matched(coordinate: Coordinate, road: RoadId, distance: f64) -> Self {
        Match {
            coordinate,
            road: Some(road),
            distance,
        }
    }

    pub fn unmatched(coordinate: Coordinate, distance: f64) -> Self {
        Match {
            coordinate,
            road: None,
            distance,
        }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.road.is_some()
    }
}

impl Debug for Match {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.road {
            Some(road) => write!(f, "{:?} -> {road} ({:.3})", self.coordinate, self.distance),
            None => write!(f, "{:?} -> unmatched ({:.3})", self.coordinate, self.distance),
        }
    }
}

/// The outcome of matching a trace, one [`Match`] per input position, in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchResult {
    pub matches: Vec<Match>,
}

impl MatchResult {
    pub fn new(matches: Vec<Match>) -> Self {
        MatchResult { matches }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    /// The assigned road of every position, in order.
    pub fn roads(&self) -> impl Iterator<Item = Option<RoadId>> + '_ {
        self.matches.iter().map(|m| m.road)
    }

    /// The sequence of distinct roads travelled, skipping unmatched
    /// positions and collapsing consecutive repeats.
    pub fn path(&self) -> Vec<RoadId> {
        self.matches.iter().filter_map(|m| m.road).dedup().collect()
    }

    /// Fraction of positions which were assigned a road, zero when empty.
    pub fn matched_ratio(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            len => (len - self.unmatched()) as f64 / len as f64,
        }
    }

    /// Number of positions without an assigned road.
    pub fn unmatched(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_matched()).count()
    }
}

impl IntoIterator for MatchResult {
    type Item = Match;
    type IntoIter = std::vec::IntoIter<Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}
