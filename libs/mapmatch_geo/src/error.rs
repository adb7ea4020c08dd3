use crate::Crs;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// A reference system which has no known projection.
    #[error("unsupported reference system: {0}")]
    UnsupportedCrs(Crs),

    #[error("could not parse reference system from {0:?}")]
    UnrecognizedCrs(String),

    /// Two operands were expressed in different reference systems.
    #[error("reference system mismatch, expected {expected} but found {found}")]
    CrsMismatch { expected: Crs, found: Crs },

    #[error("operation requires at least one coordinate, but the trace was empty")]
    EmptyTrace,

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}
