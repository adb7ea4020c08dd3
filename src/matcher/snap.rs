use crate::index::RoadIndex;
use crate::matcher::definition::{ensure_distance, positions};
use crate::matcher::{Deadline, Match, MatchError, MatchResult, Matcher};

use geo::Point;
use log::debug;
use mapmatch_geo::distance::point_to_line;
use mapmatch_geo::{Reproject, RoadId, Trace, WebMercator};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
#[cfg(feature = "tracing")]
use tracing::Level;

const DEFAULT_SEARCH_DISTANCE: f64 = 100.0; // 100m
const DEFAULT_MAX_DISTANCE: f64 = 50.0; // 50m

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Half-width of the square scanned for nearby roads.
    ///
    /// Positions with no road in range fall back to an exhaustive nearest
    /// search, so this only bounds the common case.
    pub search_distance: f64,

    /// Roads further than this are never assigned.
    pub max_distance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        SnapConfig {
            search_distance: DEFAULT_SEARCH_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl SnapConfig {
    pub fn with_search_distance(self, search_distance: f64) -> Self {
        SnapConfig {
            search_distance,
            ..self
        }
    }

    pub fn with_max_distance(self, max_distance: f64) -> Self {
        SnapConfig {
            max_distance,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        ensure_distance(self.search_distance, "search distance must be finite and non-negative")?;
        ensure_distance(self.max_distance, "max distance must be finite and non-negative")
    }
}

/// Assigns every position to its nearest road, independently of its neighbours.
///
/// This is the baseline matcher. It is fast and predictable, but a trace
/// running between two close, parallel roads may jump between them from
/// one position to the next.
pub struct LineSnapMatcher<'a, P: Reproject = WebMercator> {
    index: &'a RoadIndex,
    projection: P,
    pub config: SnapConfig,
}

impl<'a> LineSnapMatcher<'a> {
    pub fn new(index: &'a RoadIndex) -> Self {
        Self::with_projection(index, WebMercator)
    }
}

impl<'a, P: Reproject> LineSnapMatcher<'a, P> {
    pub fn with_projection(index: &'a RoadIndex, projection: P) -> Self {
        LineSnapMatcher {
            index,
            projection,
            config: SnapConfig::default(),
        }
    }

    pub fn with_config(self, config: SnapConfig) -> Self {
        LineSnapMatcher { config, ..self }
    }

    /// The nearest road to `point`, ties broken by identifier.
    ///
    /// A road found by the square scan is only known to be nearest if it
    /// lies within the scanned distance, beyond that any road may be nearer.
    fn nearest(&self, point: &Point) -> Option<(RoadId, f64)> {
        let local = self
            .index
            .around(point, self.config.search_distance)
            .map(|road| (road.id(), point_to_line(point, road.geom())))
            .min_by(|(a, da), (b, db)| da.total_cmp(db).then(a.cmp(b)));

        match local {
            Some((_, distance)) if distance <= self.config.search_distance => local,
            _ => self.index.closest(point),
        }
    }
}

impl<P: Reproject> Debug for LineSnapMatcher<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LineSnapMatcher over {:?}", self.index)
    }
}

impl<P: Reproject> Matcher for LineSnapMatcher<'_, P> {
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip_all))]
    fn match_trace_until(
        &self,
        trace: &Trace,
        deadline: Deadline,
    ) -> Result<MatchResult, MatchError> {
        self.config.validate()?;

        let positions = positions(trace, self.index.crs(), &self.projection)?;
        let total = positions.len();

        let matches = trace
            .iter()
            .zip(positions.iter())
            .enumerate()
            .map(|(processed, (coordinate, point))| {
                deadline.check(processed, total)?;

                let matched = match self.nearest(point) {
                    Some((road, distance)) if distance <= self.config.max_distance => {
                        Match::matched(*coordinate, road, distance)
                    }
                    Some((_, distance)) => Match::unmatched(*coordinate, distance),
                    None => Match::unmatched(*coordinate, f64::INFINITY),
                };

                Ok(matched)
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        let result = MatchResult::new(matches);
        debug!(
            "Snapped {} positions, {} unmatched",
            result.len(),
            result.unmatched()
        );

        Ok(result)
    }
}
