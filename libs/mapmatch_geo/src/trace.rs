use crate::error::GeoError;
use crate::project::Reproject;
use crate::{Coordinate, Crs};

use geo::{LineString, Point};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::ops::Range;

/// An ordered sequence of observed positions to be matched onto a network.
///
/// Every coordinate in the trace shares the trace's reference system, and
/// the order of coordinates encodes the progression of the observation.
/// All transformations are pure, returning a new trace.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrace")]
pub struct Trace {
    coords: Vec<Coordinate>,
    crs: Crs,
}

/// The serialized form of a [`Trace`], checked through [`Trace::new`].
#[derive(Deserialize)]
struct RawTrace {
    coords: Vec<Coordinate>,
    crs: Crs,
}

impl TryFrom<RawTrace> for Trace {
    type Error = GeoError;

    fn try_from(raw: RawTrace) -> Result<Self, Self::Error> {
        Trace::new(raw.coords, raw.crs)
    }
}

impl Trace {
    /// Creates a trace from coordinates which must all be expressed in `crs`.
    pub fn new(coords: Vec<Coordinate>, crs: Crs) -> Result<Self, GeoError> {
        coords
            .iter()
            .try_for_each(|coordinate| crs.ensure(coordinate.crs()))?;

        Ok(Trace { coords, crs })
    }

    /// A trace with no positions.
    pub fn empty(crs: Crs) -> Self {
        Trace {
            coords: Vec::new(),
            crs,
        }
    }

    /// Creates a trace from `(x, y)` pairs, which are `(lng, lat)` in geographic systems.
    pub fn from_xy(positions: impl IntoIterator<Item = (f64, f64)>, crs: Crs) -> Self {
        let coords = positions
            .into_iter()
            .map(|(x, y)| Coordinate::new(x, y, crs))
            .collect();

        Trace { coords, crs }
    }

    /// Creates a trace from the positions of a [linestring](LineString).
    pub fn from_linestring(linestring: LineString, crs: Crs) -> Self {
        let coords = linestring
            .into_points()
            .into_iter()
            .map(|point| Coordinate::from_point(point, crs))
            .collect();

        Trace { coords, crs }
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coords.iter()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.coords.iter().map(Coordinate::geom)
    }

    pub fn linestring(&self) -> LineString {
        self.points().collect()
    }

    /// Re-expresses every coordinate of the trace in the `crs` system.
    pub fn to_crs(&self, crs: Crs, projection: &impl Reproject) -> Result<Self, GeoError> {
        if self.crs == crs {
            return Ok(self.clone());
        }

        let coords = self
            .coords
            .par_iter()
            .map(|coordinate| coordinate.to_crs(crs, projection))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Trace { coords, crs })
    }

    /// Keeps `count` evenly spaced coordinates, always including the first
    /// and last. A trace already at or below `count` is returned as-is.
    pub fn downsample(&self, count: usize) -> Self {
        if count >= self.len() {
            return self.clone();
        }

        let coords = match count {
            0 => Vec::new(),
            1 => vec![self.coords[0]],
            _ => {
                let last = (self.len() - 1) as f64;
                let step = last / (count - 1) as f64;

                (0..count)
                    .map(|n| self.coords[((n as f64 * step) as usize).min(self.len() - 1)])
                    .collect()
            }
        };

        Trace {
            coords,
            crs: self.crs,
        }
    }

    /// The sub-trace over the `range` of positions, clamped to the trace bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);

        Trace {
            coords: self.coords[start..end].to_vec(),
            crs: self.crs,
        }
    }

    /// Appends `other` to the end of this trace, both must share a system.
    pub fn concat(&self, other: &Trace) -> Result<Self, GeoError> {
        self.crs.ensure(other.crs)?;

        let coords = self
            .coords
            .iter()
            .chain(other.coords.iter())
            .copied()
            .collect();

        Ok(Trace {
            coords,
            crs: self.crs,
        })
    }

    /// Removes the positions at the given indices. Out-of-range indices are ignored.
    pub fn drop(&self, indices: impl IntoIterator<Item = usize>) -> Self {
        let removed = indices.into_iter().collect::<BTreeSet<_>>();

        let coords = self
            .coords
            .iter()
            .enumerate()
            .filter(|(index, _)| !removed.contains(index))
            .map(|(_, coordinate)| *coordinate)
            .collect();

        Trace {
            coords,
            crs: self.crs,
        }
    }
}

impl Debug for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trace with {} positions [{}]", self.len(), self.crs)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}
