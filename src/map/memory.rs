use crate::map::RoadMap;

use geo::Intersects;
use log::debug;
use mapmatch_geo::{Crs, GeoError, Geofence, Reproject, Road, RoadId};
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};

/// A road network held entirely in memory.
///
/// This is the reference [`RoadMap`] implementation. Roads are kept in
/// insertion order, and looked up through a hash of their identifiers.
#[derive(Clone)]
pub struct InMemoryMap {
    crs: Crs,
    roads: Vec<Road>,
    lookup: FxHashMap<RoadId, usize>,
}

impl InMemoryMap {
    /// Creates a map from roads which must all be expressed in `crs`.
    ///
    /// Should two roads share an identifier, lookups resolve to the first.
    pub fn new(crs: Crs, roads: impl IntoIterator<Item = Road>) -> Result<Self, GeoError> {
        let roads = roads.into_iter().collect::<Vec<_>>();
        roads.iter().try_for_each(|road| crs.ensure(road.crs()))?;

        let mut lookup = FxHashMap::default();
        roads.iter().enumerate().for_each(|(slot, road)| {
            lookup.entry(road.id()).or_insert(slot);
        });

        Ok(InMemoryMap { crs, roads, lookup })
    }

    /// Keeps only the roads which intersect the geofence.
    ///
    /// The geofence is reprojected into the map's system when required,
    /// and the map itself is left untouched.
    pub fn within(
        &self,
        geofence: &Geofence,
        projection: &impl Reproject,
    ) -> Result<Self, GeoError> {
        let geofence = geofence.to_crs(self.crs, projection)?;

        let roads = self
            .roads
            .iter()
            .filter(|road| geofence.geometry().intersects(road.geom()))
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            "Geofence retained {} of {} roads",
            roads.len(),
            self.roads.len()
        );

        InMemoryMap::new(self.crs, roads)
    }

    /// Re-expresses every road of the map in the `crs` reference system.
    pub fn to_crs(&self, crs: Crs, projection: &impl Reproject) -> Result<Self, GeoError> {
        let roads = self
            .roads
            .iter()
            .map(|road| road.to_crs(crs, projection))
            .collect::<Result<Vec<_>, _>>()?;

        InMemoryMap::new(crs, roads)
    }
}

impl RoadMap for InMemoryMap {
    #[inline]
    fn crs(&self) -> Crs {
        self.crs
    }

    fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    #[inline]
    fn road(&self, id: RoadId) -> Option<&Road> {
        self.lookup.get(&id).and_then(|slot| self.roads.get(*slot))
    }

    #[inline]
    fn len(&self) -> usize {
        self.roads.len()
    }
}

impl Debug for InMemoryMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InMemoryMap with Roads: {} [{}]", self.roads.len(), self.crs)
    }
}
