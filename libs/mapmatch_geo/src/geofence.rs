//! Geofences scope which part of a network is relevant to a trace.

use crate::error::GeoError;
use crate::project::Reproject;
use crate::{Coordinate, Crs, Trace};

use geo::{
    Area, BooleanOps, BoundingRect, Coord, Intersects, LineString, MapCoords, MultiPolygon, Point,
    Polygon, Rect,
};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt::{Debug, Formatter};
#[cfg(feature = "tracing")]
use tracing::Level;

/// Padding given to a geofence built with zero padding, in meters.
///
/// A zero-radius buffer has no area, so it could not contain the trace it was
/// generated from. One millimeter is well below any positioning accuracy.
pub const MIN_PADDING: f64 = 1e-3;

/// Default number of segments used to approximate a quarter circle.
pub const DEFAULT_BUFFER_RESOLUTION: usize = 16;

/// A polygonal region of interest, expressed in a reference system.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    crs: Crs,
    geometry: MultiPolygon,
}

impl Geofence {
    pub fn new(geometry: impl Into<MultiPolygon>, crs: Crs) -> Self {
        Geofence {
            crs,
            geometry: geometry.into(),
        }
    }

    /// Builds the geofence around a trace. See [`geofence_from_trace`].
    pub fn from_trace(
        trace: &Trace,
        padding: f64,
        buffer_resolution: usize,
        output: Crs,
        projection: &impl Reproject,
    ) -> Result<Self, GeoError> {
        geofence_from_trace(trace, padding, buffer_resolution, output, projection)
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn geometry(&self) -> &MultiPolygon {
        &self.geometry
    }

    /// Area of the region, in the squared units of its reference system.
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    pub fn bounding_rect(&self) -> Option<Rect> {
        self.geometry.bounding_rect()
    }

    /// If the coordinate lies inside the region, or on its boundary.
    pub fn contains(&self, coordinate: &Coordinate) -> Result<bool, GeoError> {
        self.crs.ensure(coordinate.crs())?;
        Ok(self.geometry.intersects(&coordinate.geom()))
    }

    /// Re-expresses every vertex of the region in the `crs` reference system.
    pub fn to_crs(&self, crs: Crs, projection: &impl Reproject) -> Result<Self, GeoError> {
        if self.crs == crs {
            return Ok(self.clone());
        }

        let from = self.crs;
        let geometry = self.geometry.try_map_coords(|coord| {
            projection
                .reproject(Point(coord), from, crs)
                .map(Coord::from)
        })?;

        Ok(Geofence { crs, geometry })
    }
}

impl Debug for Geofence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Geofence of {} polygon(s) [{}]",
            self.geometry.0.len(),
            self.crs
        )
    }
}

/// Computes the region surrounding a trace.
///
/// Every coordinate is buffered by `padding` meters in the projected system
/// ([`Crs::XY`]), converting the trace first if needed, and the union of all
/// buffers forms the region. It is returned in the `output` reference system.
///
/// The `buffer_resolution` is the number of segments approximating a quarter
/// of each buffer's circle. Higher values give smoother regions at higher cost.
///
/// ### Errors
/// - [`GeoError::EmptyTrace`] if the trace has no coordinates.
/// - [`GeoError::InvalidParameter`] for a negative padding or zero resolution.
/// - [`GeoError::UnsupportedCrs`] if the trace or `output` system cannot be projected.
#[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip(trace, projection)))]
pub fn geofence_from_trace(
    trace: &Trace,
    padding: f64,
    buffer_resolution: usize,
    output: Crs,
    projection: &impl Reproject,
) -> Result<Geofence, GeoError> {
    if trace.is_empty() {
        return Err(GeoError::EmptyTrace);
    }

    if !padding.is_finite() || padding < 0.0 {
        return Err(GeoError::InvalidParameter(
            "padding must be a finite, non-negative distance",
        ));
    }

    if buffer_resolution == 0 {
        return Err(GeoError::InvalidParameter(
            "buffer resolution must be at least one",
        ));
    }

    let trace = trace.to_crs(Crs::XY, projection)?;
    let radius = padding.max(MIN_PADDING);

    let geometry = trace
        .coords()
        .par_iter()
        .map(|coordinate| buffer(coordinate.geom(), radius, buffer_resolution))
        .map(|polygon| MultiPolygon::new(vec![polygon]))
        .reduce(|| MultiPolygon::new(vec![]), |a, b| a.union(&b));

    debug!(
        "Buffered {} positions into {} polygon(s) at {radius}m",
        trace.len(),
        geometry.0.len()
    );

    Geofence::new(geometry, Crs::XY).to_crs(output, projection)
}

/// Approximates the circle of `radius` around `center` by a regular polygon
/// with `4 * resolution` vertices, all lying upon the circle.
pub fn buffer(center: Point, radius: f64, resolution: usize) -> Polygon {
    let segments = 4 * resolution;
    let step = FRAC_PI_2 / resolution as f64;

    let ring = (0..=segments)
        .map(|n| {
            // The closing vertex repeats the first exactly.
            let angle = (n % segments) as f64 * step;
            Coord {
                x: center.x() + radius * angle.cos(),
                y: center.y() + radius * angle.sin(),
            }
        })
        .collect::<LineString>();

    Polygon::new(ring, vec![])
}
