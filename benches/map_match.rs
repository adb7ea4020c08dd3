use criterion::criterion_main;
use mapmatch::{BatchMatch, InMemoryMap, LcssMatcher, LineSnapMatcher, Matcher, RoadIndex};
use mapmatch_fixtures::{grid, grid_route, horizontal_id};
use mapmatch_geo::{Crs, Trace};

struct MapMatchScenario {
    name: &'static str,
    blocks: usize,
    per_block: usize,
}

const SPACING: f64 = 100.0;
const AMPLITUDE: f64 = 3.0;

const MATCH_CASES: [MapMatchScenario; 2] = [
    MapMatchScenario {
        name: "GRID_10",
        blocks: 10,
        per_block: 10,
    },
    MapMatchScenario {
        name: "GRID_50",
        blocks: 50,
        per_block: 20,
    },
];

fn target_benchmark(c: &mut criterion::Criterion) {
    let mut group = c.benchmark_group("match");
    group.significance_level(0.1).sample_size(30);

    MATCH_CASES.into_iter().for_each(|sc| {
        let map = InMemoryMap::new(Crs::XY, grid(sc.blocks, SPACING)).expect("Map must be created");
        let index = RoadIndex::build(&map).expect("Index must be created");
        let trace = grid_route(sc.blocks, SPACING, sc.per_block, AMPLITUDE);
        let first = horizontal_id(sc.blocks, 1, 0);

        let snap = LineSnapMatcher::new(&index);
        group.bench_function(format!("snap: {}", sc.name), |b| {
            b.iter(|| {
                let result = snap
                    .match_trace(&trace)
                    .expect("Match must complete successfully");

                assert_eq!(result.path().first(), Some(&first));
            })
        });

        let lcss = LcssMatcher::new(&index);
        group.bench_function(format!("lcss: {}", sc.name), |b| {
            b.iter(|| {
                let result = lcss
                    .match_trace(&trace)
                    .expect("Match must complete successfully");

                assert_eq!(result.path().first(), Some(&first));
            })
        });

        let batch = (0..8).map(|_| trace.clone()).collect::<Vec<Trace>>();
        group.bench_function(format!("lcss batch: {}", sc.name), |b| {
            b.iter(|| {
                let results = lcss.match_batch(&batch);
                assert!(results.iter().all(|result| result.is_ok()));
            })
        });
    });

    group.finish();
}

criterion::criterion_group!(targeted_benches, target_benchmark);
criterion_main!(targeted_benches);
