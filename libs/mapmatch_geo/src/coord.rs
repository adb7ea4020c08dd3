use crate::error::GeoError;
use crate::project::Reproject;
use crate::Crs;

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// A position tagged with the reference system it is expressed in.
///
/// Coordinates are immutable once created, re-expressing one in another
/// system produces a new coordinate, see [`Coordinate::to_crs`].
///
/// ```rust
/// use mapmatch_geo::{Coordinate, Crs, WebMercator};
///
/// let coordinate = Coordinate::new(174.7762, -41.2865, Crs::LATLON);
/// let projected = coordinate.to_crs(Crs::XY, &WebMercator).unwrap();
/// println!("Position: {:?}", projected);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    geom: Point,
    crs: Crs,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl Coordinate {
    /// Creates a coordinate at `(x, y)`. For geographic systems this is `(lng, lat)`.
    pub fn new(x: f64, y: f64, crs: Crs) -> Self {
        Self::from_point(Point::new(x, y), crs)
    }

    pub fn from_point(geom: Point, crs: Crs) -> Self {
        Coordinate {
            geom,
            crs,
            timestamp: None,
        }
    }

    /// Attaches the time at which the position was observed.
    pub fn at(self, timestamp: DateTime<Utc>) -> Self {
        Coordinate {
            timestamp: Some(timestamp),
            ..self
        }
    }

    #[inline]
    pub fn geom(&self) -> Point {
        self.geom
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.geom.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.geom.y()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Re-expresses the coordinate in the `crs` reference system,
    /// preserving any timestamp.
    pub fn to_crs(&self, crs: Crs, projection: &impl Reproject) -> Result<Self, GeoError> {
        if self.crs == crs {
            return Ok(*self);
        }

        let geom = projection.reproject(self.geom, self.crs, crs)?;
        Ok(Coordinate { geom, crs, ..*self })
    }
}

impl Debug for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {}) [{}]", self.x(), self.y(), self.crs)
    }
}

impl From<Coordinate> for Point {
    fn from(value: Coordinate) -> Self {
        value.geom
    }
}
