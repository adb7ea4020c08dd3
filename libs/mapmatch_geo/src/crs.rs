//! Reference systems understood by the matching engine.
//!
//! Two systems are supported throughout: the geographic [`Crs::LATLON`]
//! (`EPSG:4326`, degrees) and the projected [`Crs::XY`] (`EPSG:3857`, meters).
//! Any other EPSG code can be represented, so that it may be carried on data,
//! but cannot be projected.

use crate::error::GeoError;

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A coordinate reference system, identified by its EPSG code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// WGS84 longitude/latitude, in degrees.
    pub const LATLON: Crs = Crs::new(4326);

    /// Web Mercator, in meters.
    pub const XY: Crs = Crs::new(3857);

    pub const fn new(epsg: u32) -> Self {
        Crs { epsg }
    }

    #[inline]
    pub const fn epsg(&self) -> u32 {
        self.epsg
    }

    /// If the system has a known projection.
    pub const fn is_supported(&self) -> bool {
        matches!(self.epsg, 4326 | 3857)
    }

    pub const fn is_geographic(&self) -> bool {
        self.epsg == Crs::LATLON.epsg
    }

    pub const fn is_projected(&self) -> bool {
        self.epsg == Crs::XY.epsg
    }

    /// Fails with [`GeoError::CrsMismatch`] unless both systems are equal.
    #[inline]
    pub fn ensure(&self, found: Crs) -> Result<(), GeoError> {
        if *self == found {
            Ok(())
        } else {
            Err(GeoError::CrsMismatch {
                expected: *self,
                found,
            })
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

impl Debug for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crs(EPSG:{})", self.epsg)
    }
}

impl FromStr for Crs {
    type Err = GeoError;

    /// Accepts `EPSG:<code>` (case-insensitive) or a bare numeric code.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let code = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => &trimmed[5..],
            _ => trimmed,
        };

        code.parse::<u32>()
            .map(Crs::new)
            .map_err(|_| GeoError::UnrecognizedCrs(value.to_string()))
    }
}

impl TryFrom<String> for Crs {
    type Error = GeoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Crs::from_str(&value)
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.to_string()
    }
}
