use mapmatch_geo::GeoError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("could not express trace in the index system: {0}")]
    Projection(#[from] GeoError),

    #[error("deadline exceeded after {processed} of {total} positions")]
    DeadlineExceeded { processed: usize, total: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
