use crate::index::RoadIndex;
use crate::map::InMemoryMap;
use crate::matcher::{
    BatchMatch, Deadline, LcssConfig, LcssMatcher, LineSnapMatcher, MatchError, MatchResult,
    Matcher, SnapConfig,
};

use approx::assert_relative_eq;
use mapmatch_fixtures::{
    LOWER, UPPER, along, fork_pair, grid, grid_route, horizontal_id, parallel_pair, vertical_id,
    wobble,
};
use mapmatch_geo::{Crs, Road, RoadId, Trace, WebMercator, distance::point_to_line};
use proptest::prelude::*;
use std::time::Duration;

fn index(roads: Vec<Road>) -> RoadIndex {
    let map = InMemoryMap::new(Crs::XY, roads).expect("Could not produce map");
    RoadIndex::build(&map).expect("Could not produce index")
}

fn snap(index: &RoadIndex, max_distance: f64) -> LineSnapMatcher<'_> {
    LineSnapMatcher::new(index).with_config(SnapConfig::default().with_max_distance(max_distance))
}

fn lcss(index: &RoadIndex, epsilon: f64) -> LcssMatcher<'_> {
    LcssMatcher::new(index).with_config(LcssConfig::default().with_distance_epsilon(epsilon))
}

fn share_of(result: &MatchResult, road: RoadId) -> f64 {
    let on = result.roads().filter(|id| *id == Some(road)).count();
    on as f64 / result.len() as f64
}

#[test_log::test]
fn both_matchers_choose_the_nearer_road() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = Trace::from_xy(
        [(10.0, 0.5), (30.0, 1.0), (50.0, 0.0), (70.0, 1.5), (90.0, 0.8)],
        Crs::XY,
    );

    let matchers: [&dyn Matcher; 2] = [&snap(&index, 3.0), &lcss(&index, 3.0)];
    for matcher in matchers {
        let result = matcher.match_trace(&trace).expect("Could not match trace");

        assert_eq!(result.len(), 5);
        assert!(result.iter().all(|m| m.road == Some(LOWER)));
        assert_eq!(result.path(), vec![LOWER]);
        assert_relative_eq!(result.matched_ratio(), 1.0);
    }
}

#[test]
fn results_carry_the_given_coordinates() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = along(5, 80.0, 1.0);

    let result = lcss(&index, 3.0).match_trace(&trace).unwrap();
    let given = trace.coords().to_vec();
    let returned = result.iter().map(|m| m.coordinate).collect::<Vec<_>>();

    assert_eq!(returned, given);
    for m in result.iter() {
        assert_relative_eq!(m.distance, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn empty_trace_yields_empty_result() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = Trace::empty(Crs::XY);

    let snapped = snap(&index, 3.0).match_trace(&trace).unwrap();
    let aligned = lcss(&index, 3.0).match_trace(&trace).unwrap();

    assert!(snapped.is_empty());
    assert!(aligned.is_empty());
    assert_eq!(snapped.matched_ratio(), 0.0);
}

#[test]
fn unmatchable_point_is_not_an_error() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = Trace::from_xy([(10.0, 0.0), (5_000.0, 5_000.0), (20.0, 0.0)], Crs::XY);

    let matchers: [&dyn Matcher; 2] = [&snap(&index, 3.0), &lcss(&index, 3.0)];
    for matcher in matchers {
        let result = matcher.match_trace(&trace).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.matches[0].road, Some(LOWER));
        assert_eq!(result.matches[2].road, Some(LOWER));

        let far = result.matches[1];
        assert_eq!(far.road, None);
        assert!(far.distance.is_finite());
        assert!(far.distance > 6_000.0);
        assert_eq!(result.unmatched(), 1);
    }
}

#[test]
fn empty_network_leaves_everything_unmatched() {
    let index = index(vec![]);
    let trace = along(4, 30.0, 0.0);

    let matchers: [&dyn Matcher; 2] = [&snap(&index, 3.0), &lcss(&index, 3.0)];
    for matcher in matchers {
        let result = matcher.match_trace(&trace).unwrap();

        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|m| m.road.is_none()));
        assert!(result.iter().all(|m| m.distance == f64::INFINITY));
    }
}

#[test_log::test]
fn lcss_holds_to_one_of_two_parallel_roads() {
    let index = index(parallel_pair(1_000.0, 6.0));
    let trace = wobble(50, 1_000.0, 2.0, 1.5);

    let aligned = lcss(&index, 10.0).match_trace(&trace).unwrap();
    assert!(share_of(&aligned, LOWER) >= 0.9);
    assert_eq!(aligned.path(), vec![LOWER]);

    // Positions straying past the midpoint are snapped independently.
    let snapped = snap(&index, 10.0).match_trace(&trace).unwrap();
    assert_eq!(snapped.unmatched(), 0);
    assert!(snapped.roads().any(|road| road == Some(UPPER)));
    assert!(snapped.path().len() > 1);
}

#[test_log::test]
fn lcss_holds_to_one_of_two_forking_roads() {
    let index = index(fork_pair(1_000.0, 6.0));
    assert!(index.connected(LOWER, UPPER));

    let trace = wobble(50, 1_000.0, 2.0, 1.5);

    // Sharing a node at the start must not make switching free further along.
    let aligned = lcss(&index, 10.0).match_trace(&trace).unwrap();
    assert!(share_of(&aligned, LOWER) >= 0.9);
    assert_eq!(aligned.path(), vec![LOWER]);

    let snapped = snap(&index, 10.0).match_trace(&trace).unwrap();
    assert!(snapped.path().len() > 1);
    assert_ne!(aligned, snapped);
}

#[test_log::test]
fn follows_a_route_through_the_grid() {
    let blocks = 3;
    let index = index(grid(blocks, 100.0));
    let trace = grid_route(blocks, 100.0, 10, 3.0);

    let expected = vec![
        horizontal_id(blocks, 1, 0),
        horizontal_id(blocks, 1, 1),
        horizontal_id(blocks, 1, 2),
        vertical_id(blocks, 3, 1),
        vertical_id(blocks, 3, 2),
    ];

    let aligned = lcss(&index, 20.0).match_trace(&trace).unwrap();
    assert_eq!(aligned.unmatched(), 0);
    assert_eq!(aligned.path(), expected);

    let snapped = snap(&index, 20.0).match_trace(&trace).unwrap();
    assert_eq!(snapped.path(), expected);
}

#[test]
fn geographic_traces_are_projected() {
    let index = index(parallel_pair(100.0, 5.0));
    let projected = Trace::from_xy([(10.0, 0.5), (50.0, 1.0), (90.0, 0.5)], Crs::XY);
    let trace = projected.to_crs(Crs::LATLON, &WebMercator).unwrap();

    let result = lcss(&index, 3.0).match_trace(&trace).unwrap();

    assert_eq!(result.path(), vec![LOWER]);
    assert!(result.iter().all(|m| m.coordinate.crs() == Crs::LATLON));
    assert_relative_eq!(result.matches[1].distance, 1.0, epsilon = 1e-6);
}

#[test]
fn deadline_aborts_matching() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = along(5, 80.0, 1.0);
    let deadline = Deadline::after(Duration::ZERO);

    let matchers: [&dyn Matcher; 2] = [&snap(&index, 3.0), &lcss(&index, 3.0)];
    for matcher in matchers {
        let result = matcher.match_trace_until(&trace, deadline);
        assert_eq!(
            result,
            Err(MatchError::DeadlineExceeded {
                processed: 0,
                total: 5
            })
        );
    }

    let unbounded = Deadline::after(Duration::from_secs(3_600));
    assert!(lcss(&index, 3.0).match_trace_until(&trace, unbounded).is_ok());
}

#[test]
fn invalid_configuration_is_rejected() {
    let index = index(parallel_pair(100.0, 5.0));
    let trace = along(2, 10.0, 0.0);

    let snapped = snap(&index, -1.0).match_trace(&trace);
    assert!(matches!(snapped, Err(MatchError::InvalidConfig(_))));

    let aligned = lcss(&index, 0.0).match_trace(&trace);
    assert!(matches!(aligned, Err(MatchError::InvalidConfig(_))));

    let nan = lcss(&index, f64::NAN).match_trace(&trace);
    assert!(matches!(nan, Err(MatchError::InvalidConfig(_))));
}

#[test_log::test]
fn batches_keep_input_order() {
    let index = index(parallel_pair(100.0, 5.0));
    let traces = vec![
        along(5, 80.0, 1.0),
        Trace::empty(Crs::XY),
        along(3, 80.0, 4.0),
    ];

    let matcher = lcss(&index, 3.0);
    let results = matcher.match_batch(&traces);

    assert_eq!(results.len(), 3);
    let results = results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("Could not match batch");

    assert_eq!(results[0].path(), vec![LOWER]);
    assert!(results[1].is_empty());
    assert_eq!(results[2].path(), vec![UPPER]);
}

#[test]
fn batch_deadlines_fail_each_trace_alone() {
    let index = index(parallel_pair(100.0, 5.0));
    let traces = vec![along(5, 80.0, 1.0), Trace::empty(Crs::XY)];

    let results = snap(&index, 3.0).match_batch_within(&traces, Some(Duration::ZERO));

    assert!(matches!(
        results[0],
        Err(MatchError::DeadlineExceeded { .. })
    ));
    assert_eq!(results[1], Ok(MatchResult::default()));
}

fn arbitrary_positions() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-50.0f64..350.0, -50.0f64..350.0), 1..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn snap_chooses_the_nearest_road(positions in arbitrary_positions()) {
        let roads = grid(3, 100.0);
        let index = index(roads.clone());
        let trace = Trace::from_xy(positions, Crs::XY);

        let matcher = snap(&index, 1e6);
        let first = matcher.match_trace(&trace).unwrap();
        let second = matcher.match_trace(&trace).unwrap();
        prop_assert_eq!(&first, &second);

        for m in first.iter() {
            let nearest = roads
                .iter()
                .map(|road| point_to_line(&m.coordinate.geom(), road.geom()))
                .fold(f64::INFINITY, f64::min);

            prop_assert!(m.road.is_some());
            prop_assert!((m.distance - nearest).abs() < 1e-9);
        }
    }
}
