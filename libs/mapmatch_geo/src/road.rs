use crate::error::GeoError;
use crate::project::Reproject;
use crate::Crs;

use geo::{BoundingRect, Coord, LineString, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The identifier of a road, unique within a single map.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct RoadId(pub u64);

impl RoadId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        RoadId(id)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl Debug for RoadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RoadId({})", self.0)
    }
}

impl Display for RoadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoadId {
    fn from(value: u64) -> Self {
        RoadId(value)
    }
}

/// A single road within a map.
///
/// The road holds an [identifier](#method.id) and its polyline
/// [geometry](#method.geom), along with the reference system the geometry
/// is expressed in. Roads are immutable, and owned by their map.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    id: RoadId,
    geom: LineString,
    crs: Crs,
}

impl Road {
    pub fn new(id: RoadId, geom: LineString, crs: Crs) -> Self {
        Road {
            id,
            geom,
            crs,
        }
    }

    #[inline]
    pub fn id(&self) -> RoadId {
        self.id
    }

    #[inline]
    pub fn geom(&self) -> &LineString {
        &self.geom
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The extent of the road geometry, `None` if the geometry has no points.
    pub fn bounds(&self) -> Option<Rect> {
        self.geom.bounding_rect()
    }

    /// First and last positions of the polyline.
    pub fn endpoints(&self) -> Option<(Coord, Coord)> {
        Some((*self.geom.0.first()?, *self.geom.0.last()?))
    }

    /// Re-expresses the road geometry in the `crs` reference system.
    pub fn to_crs(&self, crs: Crs, projection: &impl Reproject) -> Result<Self, GeoError> {
        if self.crs == crs {
            return Ok(self.clone());
        }

        let geom = self
            .geom
            .points()
            .map(|point| projection.reproject(point, self.crs, crs))
            .collect::<Result<LineString, _>>()?;

        Ok(Road {
            id: self.id,
            geom,
            crs,
        })
    }
}

impl Debug for Road {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Road({}, {} positions) [{}]",
            self.id,
            self.geom.0.len(),
            self.crs
        )
    }
}
