use crate::index::RoadIndex;
use crate::matcher::lcss::LcssConfig;
use crate::matcher::{Deadline, MatchError};

use geo::Point;
use itertools::Itertools;
use mapmatch_geo::RoadId;
use mapmatch_geo::distance::point_to_line;
use measure_time::debug_time;

/// A road close enough to a position to be matched against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub road: RoadId,
    pub distance: f64,
    pub similarity: f64,

    /// Slot of the road within the index.
    pub(crate) slot: usize,
}

/// Every candidate of a single position, nearest first.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub origin: Point,
    pub candidates: Vec<Candidate>,
}

impl Layer {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Generates the candidate layers of an alignment, one per position.
pub struct LayerGenerator<'a> {
    index: &'a RoadIndex,
    config: &'a LcssConfig,
}

impl<'a> LayerGenerator<'a> {
    pub fn new(index: &'a RoadIndex, config: &'a LcssConfig) -> Self {
        LayerGenerator { index, config }
    }

    /// The candidates of a single position.
    ///
    /// The square scan of half-width epsilon holds every road strictly
    /// nearer than epsilon. Those further away are then filtered out.
    pub fn layer(&self, origin: Point) -> Layer {
        let candidates = self
            .index
            .locate_around(&origin, self.config.distance_epsilon)
            .filter_map(|entry| {
                let distance = point_to_line(&origin, self.index.road_at(entry.slot).geom());
                let similarity = self.config.similarity(distance)?;

                Some(Candidate {
                    road: entry.id,
                    distance,
                    similarity,
                    slot: entry.slot,
                })
            })
            .sorted_by(|a, b| a.distance.total_cmp(&b.distance).then(a.road.cmp(&b.road)))
            .take(self.config.max_candidates)
            .collect();

        Layer { origin, candidates }
    }

    /// The layers of every position in order.
    pub fn with_points(&self, input: &[Point], deadline: Deadline) -> Result<Vec<Layer>, MatchError> {
        debug_time!("Layer generation");

        input
            .iter()
            .enumerate()
            .map(|(processed, origin)| {
                deadline
                    .check(processed, input.len())
                    .map(|_| self.layer(*origin))
            })
            .collect()
    }
}
