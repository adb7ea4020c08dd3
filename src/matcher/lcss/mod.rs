//! Sequence alignment of a trace against the road network.
//!
//! The matcher treats the trace as a sequence and aligns it against the
//! network in the manner of a longest common subsequence. A position is
//! considered common with a road when it lies within a tolerance of it,
//! and runs of positions following a continuous stretch of network are
//! preferred over independently nearest roads. This resolves the
//! ambiguity of close, parallel roads which defeats the line snap.

pub mod alignment;
pub mod candidate;
#[doc(hidden)]
pub mod config;

#[doc(inline)]
pub use alignment::{Alignment, align};
#[doc(inline)]
pub use candidate::{Candidate, Layer, LayerGenerator};
#[doc(inline)]
pub use config::LcssConfig;

use crate::index::RoadIndex;
use crate::matcher::definition::positions;
use crate::matcher::{Deadline, Match, MatchError, MatchResult, Matcher};

use log::info;
use mapmatch_geo::{Reproject, Trace, WebMercator};
use std::fmt::{Debug, Formatter};
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::Level;

pub struct LcssMatcher<'a, P: Reproject = WebMercator> {
    index: &'a RoadIndex,
    projection: P,
    pub config: LcssConfig,
}

impl<'a> LcssMatcher<'a> {
    pub fn new(index: &'a RoadIndex) -> Self {
        Self::with_projection(index, WebMercator)
    }
}

impl<'a, P: Reproject> LcssMatcher<'a, P> {
    pub fn with_projection(index: &'a RoadIndex, projection: P) -> Self {
        LcssMatcher {
            index,
            projection,
            config: LcssConfig::default(),
        }
    }

    pub fn with_config(self, config: LcssConfig) -> Self {
        LcssMatcher { config, ..self }
    }

    /// Aligns the trace against the network, exposing the chosen
    /// candidates and their [score](Alignment::score).
    pub fn align(&self, trace: &Trace, deadline: Deadline) -> Result<Alignment, MatchError> {
        let layers = self.layers(trace, deadline)?;
        align(self.index, &layers, &self.config, deadline)
    }

    fn layers(&self, trace: &Trace, deadline: Deadline) -> Result<Vec<Layer>, MatchError> {
        self.config.validate()?;

        let positions = positions(trace, self.index.crs(), &self.projection)?;
        LayerGenerator::new(self.index, &self.config).with_points(&positions, deadline)
    }
}

impl<P: Reproject> Debug for LcssMatcher<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LcssMatcher over {:?}", self.index)
    }
}

impl<P: Reproject> Matcher for LcssMatcher<'_, P> {
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip_all))]
    fn match_trace_until(
        &self,
        trace: &Trace,
        deadline: Deadline,
    ) -> Result<MatchResult, MatchError> {
        let start_time = Instant::now();
        let layers = self.layers(trace, deadline)?;
        let alignment = align(self.index, &layers, &self.config, deadline)?;

        let matches = trace
            .iter()
            .zip(layers.iter())
            .zip(alignment.steps())
            .map(|((coordinate, layer), step)| match step {
                Some(candidate) => Match::matched(*coordinate, candidate.road, candidate.distance),
                None => {
                    // Unmatched positions still report how far away the network was.
                    let distance = self
                        .index
                        .closest(&layer.origin)
                        .map_or(f64::INFINITY, |(_, distance)| distance);

                    Match::unmatched(*coordinate, distance)
                }
            })
            .collect();

        info!(
            "Finished. Aligned {} of {} positions (score {:.3}) in {}ms",
            alignment.matched(),
            trace.len(),
            alignment.score(),
            start_time.elapsed().as_millis()
        );

        Ok(MatchResult::new(matches))
    }
}
