#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick world view for the Zooscape bot.
//!
//! An [`Arena`] indexes a [`WorldSnapshot`] into a dense, wrap-aware grid so
//! the decision systems can answer "what is at this cell" and "how far is the
//! nearest zookeeper" in constant or linear time. The arena is rebuilt from
//! scratch every tick and never outlives the snapshot it was derived from.

mod navigation;

use thiserror::Error;
use zooscape_core::{Cell, CellContent, CellCoord, GridBounds, WorldSnapshot};

pub use navigation::PathFinder;

/// Largest grid the arena is willing to index.
const MAX_CELLS: usize = 1 << 22;

/// Reasons a snapshot cannot be indexed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The snapshot did not contain any cells.
    #[error("snapshot contains no cells")]
    EmptyGrid,
    /// The derived bounding box is too large to index densely.
    #[error("grid of {width}x{height} cells exceeds the supported size")]
    TooLarge {
        /// Number of columns implied by the snapshot.
        width: u64,
        /// Number of rows implied by the snapshot.
        height: u64,
    },
}

/// Dense, read-only index of a single tick's grid.
#[derive(Clone, Debug)]
pub struct Arena {
    bounds: GridBounds,
    contents: Vec<Option<CellContent>>,
    power_ups: Vec<Cell>,
    pellets: Vec<Cell>,
    zookeepers: Vec<CellCoord>,
}

impl Arena {
    /// Indexes the snapshot.
    ///
    /// Bounds are derived from the largest `x` and `y` found among the cells.
    /// Coordinates that never appear in a sparse snapshot are left empty and
    /// treated as impassable.
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Result<Self, ArenaError> {
        let max_x = snapshot.cells.iter().map(|cell| cell.coord.x()).max();
        let max_y = snapshot.cells.iter().map(|cell| cell.coord.y()).max();
        let (Some(max_x), Some(max_y)) = (max_x, max_y) else {
            return Err(ArenaError::EmptyGrid);
        };

        let width = u64::from(max_x) + 1;
        let height = u64::from(max_y) + 1;
        let area = width.saturating_mul(height);
        if usize::try_from(area).map_or(true, |area| area > MAX_CELLS) {
            return Err(ArenaError::TooLarge { width, height });
        }

        let bounds = GridBounds::new(max_x, max_y);
        let mut contents = vec![None; bounds.area()];
        let mut power_ups = Vec::new();
        let mut pellets = Vec::new();

        for cell in &snapshot.cells {
            if let Some(index) = dense_index(bounds, cell.coord) {
                contents[index] = Some(cell.content);
            }
            if cell.content.is_power_up() {
                power_ups.push(*cell);
            } else if cell.content.is_pellet() {
                pellets.push(*cell);
            }
        }

        Ok(Self {
            bounds,
            contents,
            power_ups,
            pellets,
            zookeepers: snapshot.zookeeper_cells(),
        })
    }

    /// Wrapping bounds of the grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Row-major offset of the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, coord: CellCoord) -> Option<usize> {
        dense_index(self.bounds, coord)
    }

    /// Content of the cell, if the snapshot described it.
    #[must_use]
    pub fn content(&self, coord: CellCoord) -> Option<CellContent> {
        self.index(coord)
            .and_then(|index| self.contents.get(index).copied().flatten())
    }

    /// Reports whether the bot may stand on the cell.
    #[must_use]
    pub fn is_traversable(&self, coord: CellCoord) -> bool {
        self.content(coord).is_some_and(|content| !content.is_wall())
    }

    /// Power-up cells in snapshot order.
    #[must_use]
    pub fn power_ups(&self) -> &[Cell] {
        &self.power_ups
    }

    /// Pellet cells in snapshot order.
    #[must_use]
    pub fn pellets(&self) -> &[Cell] {
        &self.pellets
    }

    /// Zookeeper positions in snapshot order.
    #[must_use]
    pub fn zookeepers(&self) -> &[CellCoord] {
        &self.zookeepers
    }
}

fn dense_index(bounds: GridBounds, coord: CellCoord) -> Option<usize> {
    if !bounds.contains(coord) {
        return None;
    }
    let width = usize::try_from(bounds.width()).ok()?;
    let x = usize::try_from(coord.x()).ok()?;
    let y = usize::try_from(coord.y()).ok()?;
    y.checked_mul(width)?.checked_add(x)
}

/// Read-only queries that combine the arena with zookeeper positions.
pub mod query {
    use zooscape_core::CellCoord;

    use super::Arena;

    /// Toroidal distance from the cell to the closest zookeeper.
    ///
    /// `None` when the snapshot holds no zookeepers.
    #[must_use]
    pub fn nearest_zookeeper_distance(arena: &Arena, cell: CellCoord) -> Option<u32> {
        let bounds = arena.bounds();
        arena
            .zookeepers()
            .iter()
            .map(|&keeper| bounds.toroidal_distance(keeper, cell))
            .min()
    }

    /// Mean toroidal distance from the cell to every zookeeper.
    #[must_use]
    pub fn mean_zookeeper_distance(arena: &Arena, cell: CellCoord) -> Option<f64> {
        let keepers = arena.zookeepers();
        if keepers.is_empty() {
            return None;
        }
        let bounds = arena.bounds();
        let total: u64 = keepers
            .iter()
            .map(|&keeper| u64::from(bounds.toroidal_distance(keeper, cell)))
            .sum();
        Some(total as f64 / keepers.len() as f64)
    }

    /// Number of zookeepers within `range` (inclusive) of the cell.
    #[must_use]
    pub fn zookeepers_within(arena: &Arena, cell: CellCoord, range: u32) -> usize {
        let bounds = arena.bounds();
        arena
            .zookeepers()
            .iter()
            .filter(|&&keeper| bounds.toroidal_distance(keeper, cell) <= range)
            .count()
    }

    /// Reports whether the bot stands within one cell of a grid edge.
    ///
    /// Those are the cells where the wraparound portals come into play.
    #[must_use]
    pub fn near_edge(arena: &Arena, cell: CellCoord) -> bool {
        let bounds = arena.bounds();
        cell.x() <= 1
            || cell.y() <= 1
            || cell.x().saturating_add(1) >= bounds.max_x()
            || cell.y().saturating_add(1) >= bounds.max_y()
    }
}
