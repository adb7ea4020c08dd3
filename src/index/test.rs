use crate::index::{IndexError, RoadIndex};
use crate::map::InMemoryMap;

use approx::assert_relative_eq;
use geo::{LineString, Point, Rect, coord, wkt};
use itertools::Itertools;
use mapmatch_fixtures::{grid, horizontal_id, parallel_pair, straight_road, vertical_id};
use mapmatch_geo::{Crs, Road, RoadId};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn index(roads: Vec<Road>) -> RoadIndex {
    let map = InMemoryMap::new(Crs::XY, roads).expect("Could not produce map");
    RoadIndex::build(&map).expect("Could not produce index")
}

fn rect(min: (f64, f64), max: (f64, f64)) -> Rect {
    Rect::new(coord! { x: min.0, y: min.1 }, coord! { x: max.0, y: max.1 })
}

#[test_log::test]
fn builds_over_every_road() {
    let index = index(grid(3, 100.0));

    assert_eq!(index.len(), 24);
    assert_eq!(index.tree().size(), 24);
    assert_eq!(index.crs(), Crs::XY);
}

#[test]
fn empty_map_yields_nothing() {
    let index = index(vec![]);

    assert!(index.is_empty());
    assert!(index.query(&rect((-1e9, -1e9), (1e9, 1e9))).is_empty());
    assert!(index.nearest(&Point::new(0.0, 0.0), 4).is_empty());
}

#[test]
fn query_finds_intersecting_boxes() {
    let index = index(parallel_pair(100.0, 5.0));

    let lower = index.query(&rect((10.0, -1.0), (20.0, 1.0)));
    assert_eq!(lower, BTreeSet::from([RoadId(1)]));

    let both = index.query(&rect((10.0, -1.0), (20.0, 6.0)));
    assert_eq!(both, BTreeSet::from([RoadId(1), RoadId(2)]));

    let touching = index.query(&rect((100.0, 5.0), (110.0, 10.0)));
    assert_eq!(touching, BTreeSet::from([RoadId(2)]));

    let neither = index.query(&rect((10.0, 1.0), (20.0, 4.0)));
    assert!(neither.is_empty());
}

#[test]
fn query_returns_false_positives() {
    // The diagonal's box covers the query, even though the line does not.
    let diagonal = Road::new(
        RoadId(3),
        wkt! { LINESTRING(0.0 0.0, 100.0 100.0) },
        Crs::XY,
    );
    let index = index(vec![diagonal]);

    let result = index.query(&rect((80.0, 0.0), (100.0, 20.0)));
    assert_eq!(result, BTreeSet::from([RoadId(3)]));
}

#[test]
fn nearest_orders_by_box_distance() {
    let index = index(vec![
        straight_road(1, (0.0, 10.0), (100.0, 10.0)),
        straight_road(2, (0.0, 3.0), (100.0, 3.0)),
        straight_road(3, (0.0, -50.0), (100.0, -50.0)),
    ]);

    let nearest = index.nearest(&Point::new(50.0, 0.0), 2);
    assert_eq!(nearest, vec![RoadId(2), RoadId(1)]);

    let all = index.nearest(&Point::new(50.0, 0.0), 10);
    assert_eq!(all.len(), 3);
}

#[test]
fn nearest_ties_keep_the_lowest_identifiers() {
    // Every box lies ten meters from the point.
    let index = index(vec![
        straight_road(9, (0.0, 10.0), (100.0, 10.0)),
        straight_road(5, (60.0, -50.0), (60.0, 50.0)),
        straight_road(3, (0.0, -10.0), (100.0, -10.0)),
        straight_road(1, (0.0, 40.0), (100.0, 40.0)),
    ]);

    let point = Point::new(50.0, 0.0);
    assert_eq!(index.nearest(&point, 1), vec![RoadId(3)]);
    assert_eq!(index.nearest(&point, 2), vec![RoadId(3), RoadId(5)]);
    assert_eq!(index.nearest(&point, 4), vec![RoadId(3), RoadId(5), RoadId(9), RoadId(1)]);
    assert!(index.nearest(&point, 0).is_empty());
}

#[test]
fn closest_uses_exact_geometry() {
    let index = index(vec![
        straight_road(1, (0.0, 0.0), (100.0, 100.0)),
        straight_road(2, (0.0, -20.0), (100.0, -20.0)),
    ]);

    // The diagonal's box contains the point, but its line is ~56m away.
    let point = Point::new(90.0, 10.0);
    assert_eq!(index.nearest(&point, 1), vec![RoadId(1)]);
    let (road, distance) = index.closest(&point).expect("Could not find road");
    assert_eq!(road, RoadId(2));
    assert_relative_eq!(distance, 30.0, epsilon = 1e-9);
}

#[test]
fn closest_breaks_ties_by_identifier() {
    let index = index(vec![
        straight_road(7, (0.0, 5.0), (100.0, 5.0)),
        straight_road(4, (0.0, -5.0), (100.0, -5.0)),
    ]);

    let (road, distance) = index.closest(&Point::new(50.0, 0.0)).expect("Could not find road");
    assert_eq!(road, RoadId(4));
    assert_relative_eq!(distance, 5.0, epsilon = 1e-9);
    assert_eq!(self::index(vec![]).closest(&Point::new(0.0, 0.0)), None);
}

#[test]
fn around_is_a_square_scan() {
    let index = index(parallel_pair(100.0, 5.0));
    let point = Point::new(50.0, 1.0);

    let close = index.around(&point, 2.0).map(Road::id).collect::<BTreeSet<_>>();
    assert_eq!(close, BTreeSet::from([RoadId(1)]));

    let wide = index.around(&point, 4.0).map(Road::id).collect::<BTreeSet<_>>();
    assert_eq!(wide, BTreeSet::from([RoadId(1), RoadId(2)]));
}

#[test]
fn connectivity_follows_shared_endpoints() {
    let index = index(grid(2, 100.0));

    let corner = horizontal_id(2, 0, 0);
    assert_eq!(
        index.neighbours(corner),
        vec![horizontal_id(2, 0, 1), vertical_id(2, 0, 0), vertical_id(2, 1, 0)]
    );

    assert!(index.connected(horizontal_id(2, 0, 0), horizontal_id(2, 0, 1)));
    assert!(!index.connected(horizontal_id(2, 0, 0), horizontal_id(2, 1, 0)));
    assert!(!index.connected(horizontal_id(2, 0, 0), RoadId(999)));

    let parallel = self::index(parallel_pair(100.0, 5.0));
    assert!(!parallel.connected(RoadId(1), RoadId(2)));
    assert!(parallel.junctions(RoadId(1), RoadId(2)).is_empty());
}

#[test]
fn junctions_hold_every_shared_endpoint() {
    let index = index(vec![
        straight_road(1, (0.0, 0.0), (100.0, 0.0)),
        Road::new(
            RoadId(2),
            wkt! { LINESTRING(100.0 0.0, 50.0 50.0, 0.0 0.0) },
            Crs::XY,
        ),
        straight_road(3, (100.0, 0.0), (200.0, 0.0)),
    ]);

    let shared = index
        .junctions(RoadId(1), RoadId(2))
        .iter()
        .map(|p| (p.x(), p.y()))
        .sorted_by(|a, b| a.0.total_cmp(&b.0))
        .collect::<Vec<_>>();

    assert_eq!(shared, vec![(0.0, 0.0), (100.0, 0.0)]);
    assert_eq!(index.junctions(RoadId(1), RoadId(3)), &[Point::new(100.0, 0.0)]);
    assert_eq!(index.junctions(RoadId(2), RoadId(3)), &[Point::new(100.0, 0.0)]);
    assert!(index.junctions(RoadId(1), RoadId(999)).is_empty());
}

#[test]
fn rejects_malformed_roads() {
    let point = Road::new(RoadId(1), LineString::new(vec![coord! { x: 0.0, y: 0.0 }]), Crs::XY);
    assert_eq!(
        RoadIndex::from_roads(Crs::XY, [point]).err(),
        Some(IndexError::TooFewPositions(RoadId(1)))
    );

    let collapsed = straight_road(2, (5.0, 5.0), (5.0, 5.0));
    assert_eq!(
        RoadIndex::from_roads(Crs::XY, [collapsed]).err(),
        Some(IndexError::ZeroLength(RoadId(2)))
    );

    let infinite = straight_road(3, (0.0, 0.0), (f64::INFINITY, 0.0));
    assert_eq!(
        RoadIndex::from_roads(Crs::XY, [infinite]).err(),
        Some(IndexError::NonFinite(RoadId(3)))
    );

    let duplicate = vec![
        straight_road(4, (0.0, 0.0), (1.0, 0.0)),
        straight_road(4, (0.0, 1.0), (1.0, 1.0)),
    ];
    assert_eq!(
        RoadIndex::from_roads(Crs::XY, duplicate).err(),
        Some(IndexError::DuplicateRoad(RoadId(4)))
    );

    let geographic = straight_road(5, (0.0, 0.0), (1.0, 0.0));
    assert_eq!(
        RoadIndex::from_roads(Crs::LATLON, [geographic]).err(),
        Some(IndexError::CrsMismatch {
            road: RoadId(5),
            expected: Crs::LATLON,
            found: Crs::XY
        })
    );
}

fn arbitrary_roads() -> impl Strategy<Value = Vec<Road>> {
    prop::collection::vec(
        (
            (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
            (1.0f64..200.0, -200.0f64..200.0),
        ),
        0..60,
    )
    .prop_map(|segments| {
        segments
            .into_iter()
            .enumerate()
            .map(|(n, ((x, y), (dx, dy)))| straight_road(n as u64, (x, y), (x + dx, y + dy)))
            .collect()
    })
}

fn brute_force(roads: &[Road], query: &Rect) -> BTreeSet<RoadId> {
    roads
        .iter()
        .filter(|road| {
            let bounds = road.bounds().expect("Roads must have bounds");
            bounds.min().x <= query.max().x
                && bounds.max().x >= query.min().x
                && bounds.min().y <= query.max().y
                && bounds.max().y >= query.min().y
        })
        .map(Road::id)
        .collect()
}

proptest! {
    #[test]
    fn query_matches_linear_scan(
        roads in arbitrary_roads(),
        origin in (-1_200.0f64..1_200.0, -1_200.0f64..1_200.0),
        size in (0.0f64..400.0, 0.0f64..400.0),
    ) {
        let query = rect(origin, (origin.0 + size.0, origin.1 + size.1));
        let index = RoadIndex::from_roads(Crs::XY, roads.clone()).unwrap();

        prop_assert_eq!(index.query(&query), brute_force(&roads, &query));
    }
}
