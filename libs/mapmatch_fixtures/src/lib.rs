//! Synthetic road networks and traces, shared by tests and benchmarks.
//!
//! All fixtures are expressed in the projected [`Crs::XY`] system, with
//! positions near the origin, so that distances are in meters.

use geo::{LineString, coord};
use mapmatch_geo::{Crs, Road, RoadId, Trace};

/// The lower of the two [`parallel_pair`] roads, lying on `y = 0`.
pub const LOWER: RoadId = RoadId(1);

/// The upper of the two [`parallel_pair`] roads, lying on `y = spacing`.
pub const UPPER: RoadId = RoadId(2);

/// A two-position road from `start` to `end`.
pub fn straight_road(id: u64, start: (f64, f64), end: (f64, f64)) -> Road {
    let line = LineString::new(vec![
        coord! { x: start.0, y: start.1 },
        coord! { x: end.0, y: end.1 },
    ]);

    Road::new(RoadId(id), line, Crs::XY)
}

/// Two straight, unconnected roads of `length` running east, `spacing` apart.
pub fn parallel_pair(length: f64, spacing: f64) -> Vec<Road> {
    vec![
        straight_road(LOWER.0, (0.0, 0.0), (length, 0.0)),
        straight_road(UPPER.0, (0.0, spacing), (length, spacing)),
    ]
}

/// Two roads like [`parallel_pair`], except that both fork from a shared
/// node midway between them at `x = 0`, diverging over the first ten meters.
pub fn fork_pair(length: f64, spacing: f64) -> Vec<Road> {
    let node = coord! { x: 0.0, y: spacing / 2.0 };
    let road = |id: RoadId, y: f64| {
        let line = LineString::new(vec![
            node,
            coord! { x: 10.0, y: y },
            coord! { x: length, y: y },
        ]);
        Road::new(id, line, Crs::XY)
    };

    vec![road(LOWER, 0.0), road(UPPER, spacing)]
}

/// A square grid of `blocks` by `blocks` city blocks, each `spacing` wide.
///
/// Every block side is an individual road, so neighbouring roads share
/// endpoints. Horizontal roads are numbered first, row by row from the
/// bottom, followed by vertical roads column by column from the left.
pub fn grid(blocks: usize, spacing: f64) -> Vec<Road> {
    let horizontal = (0..=blocks).flat_map(move |row| {
        (0..blocks).map(move |col| {
            let y = row as f64 * spacing;
            straight_road(
                horizontal_id(blocks, row, col).0,
                (col as f64 * spacing, y),
                ((col + 1) as f64 * spacing, y),
            )
        })
    });

    let vertical = (0..=blocks).flat_map(move |col| {
        (0..blocks).map(move |row| {
            let x = col as f64 * spacing;
            straight_road(
                vertical_id(blocks, col, row).0,
                (x, row as f64 * spacing),
                (x, (row + 1) as f64 * spacing),
            )
        })
    });

    horizontal.chain(vertical).collect()
}

/// Identifier of the [`grid`] road along `row`, east of column `col`.
pub fn horizontal_id(blocks: usize, row: usize, col: usize) -> RoadId {
    RoadId((row * blocks + col) as u64)
}

/// Identifier of the [`grid`] road along `col`, north of row `row`.
pub fn vertical_id(blocks: usize, col: usize, row: usize) -> RoadId {
    RoadId(((blocks + 1) * blocks + col * blocks + row) as u64)
}

/// `count` evenly spaced positions along `y = offset`, from `x = 0` to `x = length`.
pub fn along(count: usize, length: f64, offset: f64) -> Trace {
    wobble(count, length, offset, 0.0)
}

/// Like [`along`], but each position is displaced vertically by a
/// deterministic pseudo-noise of up to `amplitude`.
pub fn wobble(count: usize, length: f64, baseline: f64, amplitude: f64) -> Trace {
    let step = match count {
        0 | 1 => 0.0,
        _ => length / (count - 1) as f64,
    };

    Trace::from_xy(
        (0..count).map(|n| (n as f64 * step, baseline + amplitude * noise(n))),
        Crs::XY,
    )
}

/// A trace which heads east along the first row of a [`grid`], then north
/// along its last column, with `per_block` positions in every block.
///
/// Positions are sampled half a step into each interval, so that none lie
/// exactly upon an intersection.
pub fn grid_route(blocks: usize, spacing: f64, per_block: usize, amplitude: f64) -> Trace {
    let extent = blocks as f64 * spacing;
    let samples = blocks * per_block;
    let step = spacing / per_block as f64;

    let east = (0..samples).map(|n| {
        let x = (n as f64 + 0.5) * step;
        (x, spacing + amplitude * noise(n))
    });

    let north = (0..samples)
        .map(|n| {
            let y = spacing + (n as f64 + 0.5) * step;
            (extent + amplitude * noise(n + samples), y)
        })
        .take_while(|(_, y)| *y < extent);

    Trace::from_xy(east.chain(north), Crs::XY)
}

/// Deterministic noise within `[-1, 1]`.
#[inline]
pub fn noise(n: usize) -> f64 {
    (n as f64 * 2.3).sin()
}
