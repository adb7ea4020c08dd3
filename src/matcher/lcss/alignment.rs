use crate::index::RoadIndex;
use crate::matcher::lcss::{Candidate, Layer, LcssConfig};
use crate::matcher::{Deadline, MatchError};

use geo::{Distance, Euclidean, Line, Point};
use log::debug;
use mapmatch_geo::RoadId;
use measure_time::debug_time;
use std::cmp::Ordering;

/// Scores closer than this are considered equal, deferring to the tie-breaks.
const SCORE_TOLERANCE: f64 = 1e-9;

/// A single cell of the alignment table.
///
/// The cell at `(layer, candidate)` holds the best score of any aligned
/// path ending on that candidate, along with the candidate of the
/// previous layer that path passed through.
#[derive(Clone, Copy, Debug)]
struct Cell {
    score: f64,
    distance: f64,
    road: RoadId,
    parent: Option<usize>,
}

impl Cell {
    /// Orders cells so that the preferable one is greater.
    ///
    /// A higher score is preferred, then a lower accumulated distance,
    /// and finally the lower road identifier.
    fn preference(&self, other: &Cell) -> Ordering {
        if (self.score - other.score).abs() > SCORE_TOLERANCE {
            return self.score.total_cmp(&other.score);
        }

        if (self.distance - other.distance).abs() > SCORE_TOLERANCE {
            return other.distance.total_cmp(&self.distance);
        }

        other.road.cmp(&self.road)
    }
}

/// The path selected through the candidate layers of a trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    pub(crate) steps: Vec<Option<Candidate>>,
    pub(crate) similarity: f64,
    pub(crate) distance: f64,
}

impl Alignment {
    /// The candidate chosen for every position, `None` where there was none.
    pub fn steps(&self) -> &[Option<Candidate>] {
        &self.steps
    }

    /// Total similarity of the chosen candidates, less any restart penalties.
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Total distance between the positions and their chosen roads.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The similarity normalised over the length of the trace.
    ///
    /// A trace lying exactly upon one continuous stretch of road scores one,
    /// and an entirely unmatched trace scores zero. Restarts may make the
    /// score negative.
    pub fn score(&self) -> f64 {
        match self.steps.len() {
            0 => 0.0,
            len => self.similarity / len as f64,
        }
    }

    /// The number of positions aligned to a road.
    pub fn matched(&self) -> usize {
        self.steps.iter().flatten().count()
    }
}

/// Aligns the layers against the network by dynamic programming.
///
/// Walking the layers in order, each candidate's cell extends the best cell
/// of the previous layer. Extending along the same road is free, as is
/// crossing onto a connected road where the move between the two positions
/// passes within epsilon of a junction they share. Any other move restarts
/// the run and costs the configured penalty. A layer without candidates
/// breaks the run, so the next layer starts afresh at no cost.
///
/// Each maximal run of non-empty layers is then backtracked from its best
/// final cell.
pub fn align(
    index: &RoadIndex,
    layers: &[Layer],
    config: &LcssConfig,
    deadline: Deadline,
) -> Result<Alignment, MatchError> {
    debug_time!("LCSS alignment");

    let total = layers.len();
    let mut table: Vec<Vec<Cell>> = Vec::with_capacity(total);

    for (position, layer) in layers.iter().enumerate() {
        deadline.check(position, total)?;

        let previous = match position.checked_sub(1) {
            Some(prior) if !layers[prior].is_empty() => Some((&layers[prior], &table[prior])),
            _ => None,
        };

        let row = layer
            .candidates
            .iter()
            .map(|candidate| {
                let start = Cell {
                    score: candidate.similarity,
                    distance: candidate.distance,
                    road: candidate.road,
                    parent: None,
                };

                let Some((prior, cells)) = previous else {
                    return start;
                };

                prior
                    .candidates
                    .iter()
                    .zip(cells.iter())
                    .enumerate()
                    .map(|(parent, (source, cell))| {
                        let step = (prior.origin, layer.origin);
                        let continuous = source.slot == candidate.slot
                            || crosses(index, source, candidate, step, config);

                        let penalty = if continuous { 0.0 } else { config.restart_penalty };

                        Cell {
                            score: cell.score - penalty + candidate.similarity,
                            distance: cell.distance + candidate.distance,
                            road: cell.road,
                            parent: Some(parent),
                        }
                    })
                    .max_by(Cell::preference)
                    .map(|best| Cell {
                        road: candidate.road,
                        ..best
                    })
                    .unwrap_or(start)
            })
            .collect::<Vec<_>>();

        table.push(row);
    }

    let mut steps = vec![None; total];
    let mut similarity = 0.0;
    let mut distance = 0.0;

    // Backtrack every run from its final layer.
    for end in (0..total).filter(|&end| !layers[end].is_empty()) {
        if layers.get(end + 1).is_some_and(|next| !next.is_empty()) {
            continue;
        }

        let Some((mut node, best)) = table[end]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.preference(b))
        else {
            continue;
        };

        similarity += best.score;
        distance += best.distance;

        let mut position = end;
        loop {
            steps[position] = Some(layers[position].candidates[node]);

            match table[position][node].parent {
                Some(parent) => {
                    node = parent;
                    position -= 1;
                }
                None => break,
            }
        }
    }

    let alignment = Alignment {
        steps,
        similarity,
        distance,
    };

    debug!(
        "Aligned {} of {} positions with score {:.4}",
        alignment.matched(),
        total,
        alignment.score()
    );

    Ok(alignment)
}

/// If moving from `source` to `target` over the `step` between their
/// positions passes through a junction joining the two roads.
///
/// Roads sharing only a distant endpoint, such as two parallel roads
/// forking from one node, are not crossed between away from that node.
fn crosses(
    index: &RoadIndex,
    source: &Candidate,
    target: &Candidate,
    (from, to): (Point, Point),
    config: &LcssConfig,
) -> bool {
    let step = Line::new(from, to);

    index
        .shared(source.slot, target.slot)
        .iter()
        .any(|junction| Euclidean.distance(junction, &step) < config.distance_epsilon)
}
