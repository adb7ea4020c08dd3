#![doc = include_str!("../README.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

pub mod error;
pub mod index;
pub mod map;
pub mod matcher;
pub mod util;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use index::RoadIndex;
#[doc(inline)]
pub use map::{InMemoryMap, RoadMap};
#[doc(inline)]
pub use matcher::{
    BatchMatch, Deadline, LcssConfig, LcssMatcher, LineSnapMatcher, Match, MatchError,
    MatchResult, Matcher, SnapConfig,
};

pub use mapmatch_geo as primitives;
#[doc(no_inline)]
pub use mapmatch_geo::{Coordinate, Crs, Geofence, Reproject, Road, RoadId, Trace, WebMercator};
