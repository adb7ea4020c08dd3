use mapmatch_geo::{Crs, RoadId};
use thiserror::Error;

/// Malformed road geometry encountered whilst building a [`RoadIndex`](crate::RoadIndex).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("road {0} has fewer than two positions")]
    TooFewPositions(RoadId),

    #[error("road {0} has zero length")]
    ZeroLength(RoadId),

    #[error("road {0} contains a non-finite position")]
    NonFinite(RoadId),

    #[error("road identifier {0} is not unique")]
    DuplicateRoad(RoadId),

    #[error("road {road} is expressed in {found}, but the map is in {expected}")]
    CrsMismatch {
        road: RoadId,
        expected: Crs,
        found: Crs,
    },
}
