//! Compares the line snap and LCSS matchers on a synthetic city grid.
//!
//! The grid is shadowed along one row by an unconnected service road, six
//! meters away. The trace runs along that row, so the snap drifts onto the
//! service road wherever the noise carries a position past the midpoint.
//!
//! ```bash
//! RUST_LOG=info cargo run --example line_snap_vs_lcss
//! ```

use geo::MultiLineString;
use mapmatch::{
    Crs, Geofence, InMemoryMap, LcssMatcher, LineSnapMatcher, MatchResult, Matcher, RoadIndex,
    RoadId, RoadMap, WebMercator,
};
use mapmatch_fixtures::{grid, grid_route, straight_road};
use wkt::ToWkt;

const BLOCKS: usize = 6;
const SPACING: f64 = 100.0;
const SERVICE_ROAD: RoadId = RoadId(10_000);

fn main() -> mapmatch::Result<()> {
    #[cfg(feature = "tracing")]
    mapmatch::util::trace::initialize_tracer();
    #[cfg(not(feature = "tracing"))]
    env_logger::init();

    let extent = BLOCKS as f64 * SPACING;
    let mut roads = grid(BLOCKS, SPACING);
    roads.push(straight_road(
        SERVICE_ROAD.0,
        (SPACING / 2.0, SPACING + 6.0),
        (extent - SPACING / 2.0, SPACING + 6.0),
    ));

    // Positions arrive as geographic coordinates, as a receiver would report them.
    let map = InMemoryMap::new(Crs::XY, roads)?;
    let trace = grid_route(BLOCKS, SPACING, 10, 3.5).to_crs(Crs::LATLON, &WebMercator)?;

    // Only the surroundings of the trace are relevant to it.
    let geofence = Geofence::from_trace(&trace, 50.0, 16, Crs::LATLON, &WebMercator)?;
    let scoped = map.within(&geofence, &WebMercator)?;
    println!(
        "Geofence of {:.0}m² kept {} of {} roads",
        geofence.to_crs(Crs::XY, &WebMercator)?.area(),
        scoped.len(),
        map.len()
    );

    let index = RoadIndex::build(&scoped)?;

    let snapped = LineSnapMatcher::new(&index).match_trace(&trace)?;
    let aligned = LcssMatcher::new(&index).match_trace(&trace)?;

    report("line snap", &snapped, &index);
    report("lcss", &aligned, &index);

    let disagreements = snapped
        .roads()
        .zip(aligned.roads())
        .filter(|(snap, lcss)| snap != lcss)
        .count();

    println!("Matchers disagree on {disagreements} of {} positions", trace.len());
    Ok(())
}

fn report(name: &str, result: &MatchResult, index: &RoadIndex) {
    let path = result.path();
    let service = result
        .roads()
        .filter(|road| *road == Some(SERVICE_ROAD))
        .count();

    println!(
        "{name}: {:.1}% matched, {} roads travelled, {service} positions on the service road",
        result.matched_ratio() * 100.0,
        path.len(),
    );

    let geometry = path
        .iter()
        .filter_map(|id| index.road(*id))
        .map(|road| road.geom().clone())
        .collect::<MultiLineString>();

    println!("{name}: {}", geometry.wkt_string());
}
