use crate::index::{IndexError, IndexPoint, RoadEntry};
use crate::map::RoadMap;

use geo::{Euclidean, Length, Point, Rect};
use itertools::Itertools;
use log::{debug, info};
use mapmatch_geo::distance::point_to_line;
use mapmatch_geo::{Crs, Road, RoadId};
use measure_time::debug_time;
use petgraph::prelude::UnGraphMap;
use rstar::{AABB, RTree};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::Level;

/// Endpoints are considered shared when equal at this many decimal places.
const ENDPOINT_PRECISION: f64 = 1e6;

/// A bounding-box index over the roads of a map.
///
/// The index is built once, in bulk, from a [`RoadMap`] and is immutable
/// thereafter. Any change to the set of roads requires building a fresh
/// index. Being immutable, it may be shared freely between threads.
///
/// Alongside the spatial tree, the index records which roads share an
/// endpoint, so that matchers may reason about network continuity.
pub struct RoadIndex {
    crs: Crs,
    roads: Vec<Road>,

    tree: RTree<RoadEntry>,
    lookup: FxHashMap<RoadId, usize>,
    connectivity: UnGraphMap<usize, Vec<Point>>,
}

impl Debug for RoadIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RoadIndex with Roads: {} [{}]", self.roads.len(), self.crs)
    }
}

impl RoadIndex {
    /// Builds the index over every road of the map.
    ///
    /// ### Errors
    /// Fails with an [`IndexError`] if any road is malformed, such as a
    /// zero-length line, or if an identifier is used twice.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip_all))]
    pub fn build(map: &impl RoadMap) -> Result<Self, IndexError> {
        RoadIndex::from_roads(map.crs(), map.roads().cloned())
    }

    /// Builds the index from roads which must all be expressed in `crs`.
    pub fn from_roads(crs: Crs, roads: impl IntoIterator<Item = Road>) -> Result<Self, IndexError> {
        let start_time = Instant::now();

        let roads = roads.into_iter().collect::<Vec<_>>();
        let mut lookup = FxHashMap::default();

        let entries = roads
            .iter()
            .enumerate()
            .map(|(slot, road)| {
                validate(crs, road)?;

                if lookup.insert(road.id(), slot).is_some() {
                    return Err(IndexError::DuplicateRoad(road.id()));
                }

                RoadEntry::new(road, slot).ok_or(IndexError::TooFewPositions(road.id()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tree = {
            debug_time!("RTree bulk load");
            RTree::bulk_load(entries)
        };

        let connectivity = {
            debug_time!("Connectivity generation");
            connectivity(&roads)
        };

        info!(
            "Finished. Indexed {} roads with {} junctions in {}ms",
            tree.size(),
            connectivity.edge_count(),
            start_time.elapsed().as_millis()
        );

        Ok(RoadIndex {
            crs,
            roads,
            tree,
            lookup,
            connectivity,
        })
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Every indexed road, in the order it was provided.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Looks up the road with the given identifier.
    #[inline]
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.lookup.get(&id).and_then(|slot| self.roads.get(*slot))
    }

    #[inline]
    pub(crate) fn road_at(&self, slot: usize) -> &Road {
        &self.roads[slot]
    }

    /// The underlying tree of road entries.
    pub fn tree(&self) -> &RTree<RoadEntry> {
        &self.tree
    }

    /// Returns the identifiers of every road whose bounding box intersects `rect`.
    ///
    /// The result never omits an intersecting road, but may contain roads
    /// whose geometry does not itself intersect `rect`.
    pub fn query(&self, rect: &Rect) -> BTreeSet<RoadId> {
        let (min, max) = (rect.min(), rect.max());
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);

        self.locate(&envelope).map(|entry| entry.id).collect()
    }

    /// An unsorted iterator of the entries whose bounding box intersects `envelope`.
    #[inline]
    pub fn locate(&self, envelope: &AABB<IndexPoint>) -> impl Iterator<Item = &RoadEntry> {
        self.tree.locate_in_envelope_intersecting(envelope)
    }

    /// An unsorted iterator of [`Road`] references whose bounding box lies
    /// within the square of half-width `distance` centered on `point`.
    ///
    /// ### Note
    /// This function implements a square-scan.
    ///
    /// It bounds the search to be within a square-radius of the origin, so
    /// it may select roads which lie further than `distance` away. Callers
    /// must compute the exact distance of every road yielded.
    #[inline]
    pub fn around(&self, point: &Point, distance: f64) -> impl Iterator<Item = &Road> {
        self.locate_around(point, distance)
            .map(|entry| self.road_at(entry.slot))
    }

    /// The entries scanned by [`RoadIndex::around`].
    #[inline]
    pub fn locate_around(&self, point: &Point, distance: f64) -> impl Iterator<Item = &RoadEntry> {
        let envelope = AABB::from_corners(
            [point.x() - distance, point.y() - distance],
            [point.x() + distance, point.y() + distance],
        );

        self.tree.locate_in_envelope_intersecting(&envelope)
    }

    /// Returns the `k` roads whose bounding boxes are closest to `point`,
    /// nearest first, ties broken by identifier.
    ///
    /// These are candidates only. A farther bounding box may still hold a
    /// nearer geometry, so the exact distance must be computed by the caller.
    pub fn nearest(&self, point: &Point, k: usize) -> Vec<RoadId> {
        self.nearest_entries(point, k)
            .map(|(entry, _)| entry.id)
            .collect()
    }

    pub(crate) fn nearest_entries(
        &self,
        point: &Point,
        k: usize,
    ) -> impl Iterator<Item = (&RoadEntry, f64)> {
        let mut seen = 0;
        let mut bound = f64::NEG_INFINITY;

        // Entries tied with the k-th are kept until sorted, so the lowest ids win.
        self.tree
            .nearest_neighbor_iter_with_distance_2(&[point.x(), point.y()])
            .take_while(move |(_, distance)| {
                if seen < k {
                    seen += 1;
                    if seen == k {
                        bound = *distance;
                    }
                    return true;
                }

                *distance <= bound
            })
            .sorted_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)))
            .take(k)
    }

    /// The road whose geometry lies nearest to `point`, with that distance.
    ///
    /// Entries are visited in order of bounding-box distance, which never
    /// exceeds the distance to the geometry within, so the walk stops once
    /// no remaining box could hold a nearer road. Ties favour the lowest id.
    pub fn closest(&self, point: &Point) -> Option<(RoadId, f64)> {
        let mut best: Option<(RoadId, f64)> = None;

        for (entry, bound) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[point.x(), point.y()])
        {
            if let Some((_, distance)) = best {
                if bound > distance * distance {
                    break;
                }
            }

            let distance = point_to_line(point, self.road_at(entry.slot).geom());
            let closer = match best {
                None => true,
                Some((id, current)) => distance < current || (distance == current && entry.id < id),
            };

            if closer {
                best = Some((entry.id, distance));
            }
        }

        best
    }

    /// If both roads are indexed and share an endpoint.
    pub fn connected(&self, a: RoadId, b: RoadId) -> bool {
        match (self.lookup.get(&a), self.lookup.get(&b)) {
            (Some(a), Some(b)) => self.adjacent(*a, *b),
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn adjacent(&self, a: usize, b: usize) -> bool {
        self.connectivity.contains_edge(a, b)
    }

    /// The positions at which both roads end, empty if they are not connected.
    pub fn junctions(&self, a: RoadId, b: RoadId) -> &[Point] {
        match (self.lookup.get(&a), self.lookup.get(&b)) {
            (Some(a), Some(b)) => self.shared(*a, *b),
            _ => &[],
        }
    }

    #[inline]
    pub(crate) fn shared(&self, a: usize, b: usize) -> &[Point] {
        self.connectivity
            .edge_weight(a, b)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The roads sharing an endpoint with the given road, in identifier order.
    pub fn neighbours(&self, id: RoadId) -> Vec<RoadId> {
        self.lookup
            .get(&id)
            .map(|slot| {
                self.connectivity
                    .neighbors(*slot)
                    .map(|neighbour| self.roads[neighbour].id())
                    .sorted()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn validate(crs: Crs, road: &Road) -> Result<(), IndexError> {
    if road.crs() != crs {
        return Err(IndexError::CrsMismatch {
            road: road.id(),
            expected: crs,
            found: road.crs(),
        });
    }

    let line = road.geom();
    if line.0.len() < 2 {
        return Err(IndexError::TooFewPositions(road.id()));
    }

    if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(IndexError::NonFinite(road.id()));
    }

    if Euclidean.length(line) <= 0.0 {
        return Err(IndexError::ZeroLength(road.id()));
    }

    Ok(())
}

/// Links every pair of roads which share an endpoint, weighted by the
/// positions they share.
fn connectivity(roads: &[Road]) -> UnGraphMap<usize, Vec<Point>> {
    let key = |x: f64, y: f64| {
        (
            (x * ENDPOINT_PRECISION).round() as i64,
            (y * ENDPOINT_PRECISION).round() as i64,
        )
    };

    let mut junctions: FxHashMap<(i64, i64), (Point, Vec<usize>)> = FxHashMap::default();
    roads.iter().enumerate().for_each(|(slot, road)| {
        if let Some((start, end)) = road.endpoints() {
            junctions
                .entry(key(start.x, start.y))
                .or_insert_with(|| (Point::from(start), Vec::new()))
                .1
                .push(slot);

            // A closed loop only joins its junction once.
            if key(start.x, start.y) != key(end.x, end.y) {
                junctions
                    .entry(key(end.x, end.y))
                    .or_insert_with(|| (Point::from(end), Vec::new()))
                    .1
                    .push(slot);
            }
        }
    });

    let mut graph: UnGraphMap<usize, Vec<Point>> = UnGraphMap::with_capacity(roads.len(), junctions.len());
    (0..roads.len()).for_each(|slot| {
        graph.add_node(slot);
    });

    junctions
        .values()
        .flat_map(|(junction, slots)| {
            slots
                .iter()
                .tuple_combinations()
                .map(move |(a, b)| (*a, *b, *junction))
        })
        .for_each(|(a, b, junction)| match graph.edge_weight_mut(a, b) {
            Some(shared) => shared.push(junction),
            None => {
                graph.add_edge(a, b, vec![junction]);
            }
        });

    debug!("Found {} junctions between roads", junctions.len());
    graph
}
