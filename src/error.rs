use crate::impl_err;
use crate::index::IndexError;
use crate::matcher::MatchError;

use mapmatch_geo::GeoError;
use thiserror::Error;

/// Every error the crate may surface.
///
/// None of these are fatal, each describes a condition the caller
/// may recover from. Notably, failing to find a road for a position
/// is not an error, see [`Match::road`](crate::Match::road).
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geo(GeoError),

    #[error(transparent)]
    Index(IndexError),

    #[error(transparent)]
    Match(MatchError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl_err!(GeoError, Geo);
impl_err!(IndexError, Index);
impl_err!(MatchError, Match);
