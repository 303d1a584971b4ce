#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that plans safe paths and turns them into single steps.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zooscape_core::{CellCoord, Direction, GridBounds, PositionHistory};
use zooscape_system_hazard::HazardField;
use zooscape_world::{query, Arena, PathFinder};

/// Safety margins applied while planning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Closest a planned path may pass to a zookeeper.
    pub safe_distance: u32,
    /// Closest a planned path may pass to a zookeeper while the bot is stalled.
    pub relaxed_safe_distance: u32,
    /// Stuck or oscillation count at which the planner relaxes its rules.
    pub leniency_threshold: u32,
    /// Closest a greedy step may land to a zookeeper.
    pub greedy_min_distance: u32,
    /// Stuck count at which greedy steps ignore zookeeper proximity.
    pub greedy_stuck_override: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            safe_distance: 6,
            relaxed_safe_distance: 3,
            leniency_threshold: 2,
            greedy_min_distance: 5,
            greedy_stuck_override: 3,
        }
    }
}

/// Stall counters the planner needs to pick its rule set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StallState {
    /// Consecutive ticks without movement.
    pub stuck_counter: u32,
    /// Consecutive ticks on which a cycle was found.
    pub oscillation_counter: u32,
}

/// Everything that constrains a path search for one tick.
#[derive(Clone, Copy, Debug)]
pub struct PathConstraints<'a> {
    /// Cells zookeepers threaten this tick.
    pub hazards: &'a HazardField,
    /// Cells the bot stood on most recently.
    pub recent_positions: &'a PositionHistory,
    /// Current stall counters.
    pub stall: StallState,
}

/// Step chosen by the greedy fallback scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreedyStep {
    /// Direction to step in.
    pub direction: Direction,
    /// Whether the step strictly shortens the distance to the target.
    pub improves: bool,
}

/// Path planner that reuses its search buffers between ticks.
#[derive(Debug, Default)]
pub struct Movement {
    tuning: MovementTuning,
    finder: PathFinder,
}

impl Movement {
    /// Creates a planner using the provided tuning.
    #[must_use]
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning,
            finder: PathFinder::new(),
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Shortest safe path from `bot` to `goal`, or an empty vector.
    ///
    /// A cell is never entered when it is hazardous, when it passes closer
    /// to a zookeeper than the safe distance, or when it was visited recently
    /// and the bot is neither stuck nor oscillating. Stalled bots get the
    /// relaxed safe distance and may retrace their steps.
    pub fn plan_path(
        &mut self,
        arena: &Arena,
        bot: CellCoord,
        goal: CellCoord,
        constraints: PathConstraints<'_>,
    ) -> Vec<CellCoord> {
        let lenient = self.is_lenient(constraints.stall);
        let safe_distance = if lenient {
            self.tuning.relaxed_safe_distance
        } else {
            self.tuning.safe_distance
        };

        let path = self.finder.shortest_path_with(arena, bot, goal, |cell| {
            if constraints.hazards.contains(cell) {
                return true;
            }
            if !lenient && constraints.recent_positions.contains(cell) {
                return true;
            }
            query::nearest_zookeeper_distance(arena, cell)
                .is_some_and(|distance| distance < safe_distance)
        });

        debug!(
            path_len = path.len(),
            lenient,
            safe_distance,
            goal = %goal,
            "path search finished"
        );
        path
    }

    /// Direction of the first step along a planned path.
    ///
    /// Returns `None` for paths shorter than two cells.
    #[must_use]
    pub fn first_step(&self, bounds: GridBounds, path: &[CellCoord]) -> Option<Direction> {
        match path {
            [from, to, ..] => Some(direction_between(bounds, *from, *to)),
            _ => None,
        }
    }

    /// Scores the four neighbours when no safe path exists.
    ///
    /// Hazardous cells and walls are skipped, as are cells too close to a
    /// zookeeper unless the bot has been stuck long enough. The first
    /// neighbour that strictly closes in on `target` wins; otherwise the first
    /// acceptable neighbour is returned.
    #[must_use]
    pub fn greedy_step(
        &self,
        arena: &Arena,
        bot: CellCoord,
        target: CellCoord,
        hazards: &HazardField,
        stuck_counter: u32,
    ) -> Option<GreedyStep> {
        let bounds = arena.bounds();
        let mut fallback = None;

        for direction in Direction::SEARCH_ORDER {
            let next = bounds.step(bot, direction);
            if hazards.contains(next) {
                debug!(?direction, "greedy skip: hazard");
                continue;
            }

            let nearest = query::nearest_zookeeper_distance(arena, next);
            let too_close =
                nearest.is_some_and(|distance| distance < self.tuning.greedy_min_distance);
            if too_close && stuck_counter < self.tuning.greedy_stuck_override {
                debug!(?direction, ?nearest, "greedy skip: zookeeper too close");
                continue;
            }

            if !arena.is_traversable(next) {
                continue;
            }

            let current = bounds.toroidal_distance(bot, target);
            let after = bounds.toroidal_distance(next, target);
            if after < current {
                return Some(GreedyStep {
                    direction,
                    improves: true,
                });
            }

            if fallback.is_none() {
                fallback = Some(GreedyStep {
                    direction,
                    improves: false,
                });
            }
        }

        fallback
    }

    fn is_lenient(&self, stall: StallState) -> bool {
        stall.stuck_counter >= self.tuning.leniency_threshold
            || stall.oscillation_counter >= self.tuning.leniency_threshold
    }
}

/// Direction that moves `from` onto `to`, accounting for wraparound.
///
/// Non-adjacent pairs fall back to the dominant axis of the corrected delta.
fn direction_between(bounds: GridBounds, from: CellCoord, to: CellCoord) -> Direction {
    let (dx, dy) = bounds.wrapped_delta(from, to);
    if let Some(direction) = Direction::from_unit_delta(dx, dy) {
        return direction;
    }

    warn!(dx, dy, from = %from, to = %to, "non-unit step delta, using dominant axis");
    if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: GridBounds = GridBounds::new(9, 9);

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            direction_between(BOUNDS, origin, CellCoord::new(3, 2)),
            Direction::Up
        );
        assert_eq!(
            direction_between(BOUNDS, origin, CellCoord::new(4, 3)),
            Direction::Right
        );
        assert_eq!(
            direction_between(BOUNDS, origin, CellCoord::new(3, 4)),
            Direction::Down
        );
        assert_eq!(
            direction_between(BOUNDS, origin, CellCoord::new(2, 3)),
            Direction::Left
        );
    }

    #[test]
    fn direction_between_crosses_the_seam() {
        assert_eq!(
            direction_between(BOUNDS, CellCoord::new(0, 5), CellCoord::new(9, 5)),
            Direction::Left
        );
        assert_eq!(
            direction_between(BOUNDS, CellCoord::new(5, 9), CellCoord::new(5, 0)),
            Direction::Down
        );
    }

    #[test]
    fn direction_between_uses_dominant_axis_for_jumps() {
        assert_eq!(
            direction_between(BOUNDS, CellCoord::new(1, 1), CellCoord::new(4, 2)),
            Direction::Right
        );
        assert_eq!(
            direction_between(BOUNDS, CellCoord::new(1, 4), CellCoord::new(2, 1)),
            Direction::Up
        );
    }

    #[test]
    fn leniency_follows_either_counter() {
        let movement = Movement::default();
        assert!(!movement.is_lenient(StallState::default()));
        assert!(movement.is_lenient(StallState {
            stuck_counter: 2,
            oscillation_counter: 0,
        }));
        assert!(movement.is_lenient(StallState {
            stuck_counter: 0,
            oscillation_counter: 2,
        }));
    }

    #[test]
    fn first_step_needs_two_cells() {
        let movement = Movement::default();
        assert_eq!(movement.first_step(BOUNDS, &[CellCoord::new(1, 1)]), None);
        assert_eq!(
            movement.first_step(BOUNDS, &[CellCoord::new(1, 1), CellCoord::new(1, 0)]),
            Some(Direction::Up)
        );
    }
}
