#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fallback movement planners used when normal path seeking stalls.
//!
//! [`emergency_escape`] deterministically steps toward the freshest, safest
//! neighbour. [`RandomEscape`] breaks cycles by picking an unvisited
//! neighbour at random and only falls back to the safest revisit when every
//! neighbour has been seen recently.

use std::cmp::Ordering;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use zooscape_core::{CellCoord, Direction, PositionHistory};
use zooscape_world::{query, Arena};

/// A single escape step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EscapeMove {
    /// Direction to step in.
    pub direction: Direction,
    /// Cell the step lands on.
    pub destination: CellCoord,
    /// Toroidal distance from the destination to the closest zookeeper.
    pub nearest_threat: Option<u32>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    step: EscapeMove,
    revisit: bool,
    nearest: u32,
    mean: f64,
}

impl Candidate {
    fn ranks_before(&self, other: &Self) -> Ordering {
        self.revisit
            .cmp(&other.revisit)
            .then_with(|| other.nearest.cmp(&self.nearest))
            .then_with(|| other.mean.total_cmp(&self.mean))
    }
}

fn candidates(arena: &Arena, bot: CellCoord, history: &PositionHistory) -> Vec<Candidate> {
    let bounds = arena.bounds();
    Direction::SEARCH_ORDER
        .into_iter()
        .filter_map(|direction| {
            let destination = bounds.step(bot, direction);
            if !arena.is_traversable(destination) {
                return None;
            }
            let nearest_threat = query::nearest_zookeeper_distance(arena, destination);
            Some(Candidate {
                step: EscapeMove {
                    direction,
                    destination,
                    nearest_threat,
                },
                revisit: history.contains(destination),
                nearest: nearest_threat.unwrap_or(u32::MAX),
                mean: query::mean_zookeeper_distance(arena, destination).unwrap_or(f64::MAX),
            })
        })
        .collect()
}

/// Deterministic escape for a bot that has stopped moving.
///
/// Ranks the non-wall neighbours by: not recently visited first, then the
/// largest distance to the closest zookeeper, then the largest mean distance
/// to all zookeepers. Remaining ties keep [`Direction::SEARCH_ORDER`].
/// Returns `None` when the bot is walled in.
#[must_use]
pub fn emergency_escape(
    arena: &Arena,
    bot: CellCoord,
    history: &PositionHistory,
) -> Option<EscapeMove> {
    let mut ranked = candidates(arena, bot, history);
    ranked.sort_by(Candidate::ranks_before);

    let best = ranked.first()?.step;
    info!(
        direction = ?best.direction,
        nearest_threat = ?best.nearest_threat,
        "emergency escape"
    );
    Some(best)
}

/// Randomised escape for a bot caught in a short loop.
#[derive(Clone, Debug)]
pub struct RandomEscape {
    rng: ChaCha8Rng,
}

impl RandomEscape {
    /// Creates a planner with a fixed seed so replays are reproducible.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a planner seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Picks an escape step.
    ///
    /// Neighbours absent from `history` are chosen uniformly at random. When
    /// every open neighbour is a revisit, the one farthest from the closest
    /// zookeeper wins, earliest in search order on ties. Returns `None` when
    /// the bot is walled in.
    pub fn plan(
        &mut self,
        arena: &Arena,
        bot: CellCoord,
        history: &PositionHistory,
    ) -> Option<EscapeMove> {
        let open = candidates(arena, bot, history);
        let fresh: Vec<_> = open.iter().filter(|candidate| !candidate.revisit).collect();

        if let Some(chosen) = fresh.choose(&mut self.rng) {
            info!(direction = ?chosen.step.direction, "random escape to break loop");
            return Some(chosen.step);
        }

        let mut safest: Option<&Candidate> = None;
        for candidate in &open {
            if safest.map_or(true, |best| candidate.nearest > best.nearest) {
                safest = Some(candidate);
            }
        }

        let step = safest?.step;
        info!(direction = ?step.direction, "forced escape, every neighbour revisits");
        Some(step)
    }
}

impl Default for RandomEscape {
    fn default() -> Self {
        Self::from_entropy()
    }
}
