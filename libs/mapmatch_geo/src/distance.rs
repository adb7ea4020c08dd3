//! Planar distance primitives.
//!
//! All distances are euclidean within the reference system shared by both
//! operands, so they are in meters for [`Crs::XY`](crate::Crs::XY) and in
//! degrees for [`Crs::LATLON`](crate::Crs::LATLON). Operands in different
//! systems are rejected rather than silently converted.

use crate::error::GeoError;
use crate::{Coordinate, Road};

use geo::{Distance, Euclidean, LineString, Point};

/// Shortest planar distance between a coordinate and a road's polyline.
///
/// ### Errors
/// Fails with [`GeoError::CrsMismatch`] if the coordinate and road are
/// expressed in different reference systems.
#[inline]
pub fn distance(coordinate: &Coordinate, road: &Road) -> Result<f64, GeoError> {
    road.crs().ensure(coordinate.crs())?;
    Ok(point_to_line(&coordinate.geom(), road.geom()))
}

/// Alias of [`distance`] with the operands the other way around.
#[inline]
pub fn road_to_coord_distance(road: &Road, coordinate: &Coordinate) -> Result<f64, GeoError> {
    distance(coordinate, road)
}

/// Planar distance between two coordinates. Symmetric in its arguments.
#[inline]
pub fn coord_distance(a: &Coordinate, b: &Coordinate) -> Result<f64, GeoError> {
    a.crs().ensure(b.crs())?;
    Ok(Euclidean.distance(a.geom(), b.geom()))
}

/// Unchecked distance from a point to a polyline, both assumed to share a system.
///
/// A polyline with a single position degrades to the point-point distance,
/// and an empty polyline is infinitely far away.
#[inline]
pub fn point_to_line(point: &Point, line: &LineString) -> f64 {
    match line.0.as_slice() {
        [] => f64::INFINITY,
        [only] => Euclidean.distance(*point, Point(*only)),
        _ => Euclidean.distance(point, line),
    }
}
