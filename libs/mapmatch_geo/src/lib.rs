//! Geometry, reference-system and trace primitives used by `mapmatch`.

/// Semi-major axis of the WGS84 ellipsoid, used as the web-mercator sphere radius.
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6378137.0;

/// Latitude at which the web-mercator projection becomes square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.0511287798066;

#[doc(hidden)]
pub mod coord;
#[doc(hidden)]
pub mod crs;
pub mod distance;
#[doc(hidden)]
pub mod error;
pub mod geofence;
pub mod project;
#[doc(hidden)]
pub mod road;
#[doc(hidden)]
pub mod trace;

#[doc(inline)]
pub use coord::Coordinate;
#[doc(inline)]
pub use crs::Crs;
#[doc(inline)]
pub use distance::{coord_distance, distance, road_to_coord_distance};
#[doc(inline)]
pub use error::GeoError;
#[doc(inline)]
pub use geofence::{Geofence, geofence_from_trace};
#[doc(inline)]
pub use project::{Reproject, WebMercator, latlon_to_xy, transform, xy_to_latlon};
#[doc(inline)]
pub use road::{Road, RoadId};
#[doc(inline)]
pub use trace::Trace;
