//! Breadth-first path search over the wrapping grid.

use std::collections::VecDeque;

use zooscape_core::{CellCoord, Direction};

use crate::Arena;

/// Shortest-path search that reuses its scratch buffers between ticks.
///
/// Edges join each cell to its four wrapped neighbours. Walls and cells the
/// snapshot never described are never entered; the caller's predicate can
/// veto further cells. Neighbours are expanded in [`Direction::SEARCH_ORDER`],
/// which decides between equally short routes.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    parents: Vec<Option<CellCoord>>,
    visited: Vec<bool>,
    queue: VecDeque<CellCoord>,
}

impl PathFinder {
    /// Creates a path finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the shortest unblocked route from `start` to `goal`.
    ///
    /// Returns every cell along the way, `start` and `goal` included, or an
    /// empty vector when no route exists. `is_blocked` is consulted for every
    /// cell except `start`, including `goal`.
    pub fn shortest_path_with<F>(
        &mut self,
        arena: &Arena,
        start: CellCoord,
        goal: CellCoord,
        mut is_blocked: F,
    ) -> Vec<CellCoord>
    where
        F: FnMut(CellCoord) -> bool,
    {
        let (Some(start_index), Some(_)) = (arena.index(start), arena.index(goal)) else {
            return Vec::new();
        };

        self.reset(arena.bounds().area());
        self.visited[start_index] = true;
        self.queue.push_back(start);

        let bounds = arena.bounds();
        while let Some(cell) = self.queue.pop_front() {
            if cell == goal {
                return self.trace_back(arena, start, goal);
            }

            for direction in Direction::SEARCH_ORDER {
                let neighbor = bounds.step(cell, direction);
                let Some(neighbor_index) = arena.index(neighbor) else {
                    continue;
                };
                if self.visited[neighbor_index] {
                    continue;
                }
                if !arena.is_traversable(neighbor) || is_blocked(neighbor) {
                    continue;
                }

                self.visited[neighbor_index] = true;
                self.parents[neighbor_index] = Some(cell);
                self.queue.push_back(neighbor);
            }
        }

        Vec::new()
    }

    fn reset(&mut self, cell_count: usize) {
        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
            self.parents = vec![None; cell_count];
        } else {
            self.visited.fill(false);
            self.parents.fill(None);
        }
        self.queue.clear();
    }

    fn trace_back(&self, arena: &Arena, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
        let mut path = vec![goal];
        let mut cursor = goal;
        while cursor != start {
            let Some(parent) = arena
                .index(cursor)
                .and_then(|index| self.parents.get(index).copied().flatten())
            else {
                return Vec::new();
            };
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}
