//! Required structures to project between reference systems.

use crate::error::GeoError;
use crate::{Crs, MAX_MERCATOR_LATITUDE, WGS84_EQUATORIAL_RADIUS};

use geo::Point;
use std::f64::consts::FRAC_PI_4;

/// Allows for projection between two reference systems.
///
/// Implementations are injected wherever a conversion may happen
/// (traces, geofences, matchers), rather than living in module-level
/// state, so that a caller may swap in a different transformer, or share
/// an expensive one across a batch.
///
/// ### Example
/// ```rust
/// use mapmatch_geo::{Crs, Reproject, WebMercator};
/// use geo::Point;
///
/// let wellington = Point::new(174.7762, -41.2865);
/// let projected = WebMercator.reproject(wellington, Crs::LATLON, Crs::XY).unwrap();
/// // We now have the web-mercator position, in meters.
/// assert!(projected.x() > 19_000_000.0);
/// ```
pub trait Reproject: Send + Sync {
    /// Projects a position from one reference system into another.
    ///
    /// Positions are always in `(x, y)` order, that is `(lng, lat)` for
    /// geographic systems.
    fn reproject(&self, point: Point, from: Crs, to: Crs) -> Result<Point, GeoError>;
}

/// The spherical Web Mercator projection, between `EPSG:4326` and `EPSG:3857`.
///
/// *Learn more [here](https://en.wikipedia.org/wiki/Web_Mercator_projection?useskin=vector).*
#[derive(Clone, Copy, Debug, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Forward projection, `(lng, lat)` in degrees into meters.
    pub fn forward(&self, point: Point) -> Result<Point, GeoError> {
        let (lng, lat) = point.x_y();

        if !lng.is_finite() || !lat.is_finite() {
            return Err(GeoError::InvalidCoordinate(format!(
                "Position must be finite. Given: {point:?}"
            )));
        }

        if lat.abs() > MAX_MERCATOR_LATITUDE {
            return Err(GeoError::InvalidCoordinate(format!(
                "Latitude must be within +/-{MAX_MERCATOR_LATITUDE}. Given: {lat}"
            )));
        }

        let x = WGS84_EQUATORIAL_RADIUS * lng.to_radians();
        let y = WGS84_EQUATORIAL_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();

        Ok(Point::new(x, y))
    }

    /// Inverse projection, meters into `(lng, lat)` in degrees.
    pub fn inverse(&self, point: Point) -> Result<Point, GeoError> {
        let (x, y) = point.x_y();

        if !x.is_finite() || !y.is_finite() {
            return Err(GeoError::InvalidCoordinate(format!(
                "Position must be finite. Given: {point:?}"
            )));
        }

        let lng = (x / WGS84_EQUATORIAL_RADIUS).to_degrees();
        let lat = (2.0 * (y / WGS84_EQUATORIAL_RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();

        Ok(Point::new(lng, lat))
    }
}

impl Reproject for WebMercator {
    fn reproject(&self, point: Point, from: Crs, to: Crs) -> Result<Point, GeoError> {
        if !from.is_supported() {
            return Err(GeoError::UnsupportedCrs(from));
        }

        if !to.is_supported() {
            return Err(GeoError::UnsupportedCrs(to));
        }

        match (from.is_geographic(), to.is_geographic()) {
            (true, false) => self.forward(point),
            (false, true) => self.inverse(point),
            _ => Ok(point),
        }
    }
}

/// Reprojects a single point using the [`WebMercator`] transformer.
#[inline]
pub fn transform(point: Point, from: Crs, to: Crs) -> Result<Point, GeoError> {
    WebMercator.reproject(point, from, to)
}

/// Converts a web-mercator `(x, y)` position into a `(lat, lon)` pair.
pub fn xy_to_latlon(x: f64, y: f64) -> Result<(f64, f64), GeoError> {
    let point = WebMercator.inverse(Point::new(x, y))?;
    Ok((point.y(), point.x()))
}

/// Converts a `(lat, lon)` pair into a web-mercator `(x, y)` position.
pub fn latlon_to_xy(lat: f64, lon: f64) -> Result<(f64, f64), GeoError> {
    let point = WebMercator.forward(Point::new(lon, lat))?;
    Ok(point.x_y())
}
