//! Bounding-box index over the roads of a map.

#[doc(hidden)]
pub mod entry;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
#[allow(clippy::module_inception)]
pub mod index;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use entry::{IndexPoint, RoadEntry};
#[doc(inline)]
pub use error::IndexError;
#[doc(inline)]
pub use index::RoadIndex;
