#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that marks the cells zookeepers threaten during a tick.
//!
//! Each zookeeper contributes a diamond of radius `danger_radius` around its
//! current cell plus smaller diamonds around the cells it could reach in one
//! or two straight steps. The field is derived from scratch every tick.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zooscape_core::{CellCoord, Direction, GridBounds};
use zooscape_world::{query, Arena};

/// Radii and projection parameters for the hazard field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Danger radius while chasing a power-up or nothing in particular.
    pub power_up_radius: u32,
    /// Danger radius while chasing a plain pellet.
    pub pellet_radius: u32,
    /// A zookeeper this close to the bot counts as an immediate threat.
    pub immediate_threat_range: u32,
    /// Lower bound on the danger radius while an immediate threat exists.
    pub immediate_threat_radius: u32,
    /// How many straight steps ahead each zookeeper is projected.
    pub projection_steps: u32,
    /// Radius reduction applied per projected step.
    pub projection_shrink_per_step: u32,
    /// Smallest radius marked around a projected cell.
    pub projection_min_radius: u32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            power_up_radius: 8,
            pellet_radius: 12,
            immediate_threat_range: 4,
            immediate_threat_radius: 15,
            projection_steps: 2,
            projection_shrink_per_step: 2,
            projection_min_radius: 2,
        }
    }
}

/// What the bot is chasing this tick, as far as hazard sizing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// A plain pellet; the bot keeps a wider berth.
    Pellet,
    /// A power-up, a remembered location, or nothing.
    Other,
}

/// Set of cells deemed unsafe for the current tick.
#[derive(Clone, Debug)]
pub struct HazardField {
    bounds: GridBounds,
    marked: Vec<bool>,
    count: usize,
    danger_radius: u32,
}

impl HazardField {
    fn empty(bounds: GridBounds, danger_radius: u32) -> Self {
        Self {
            bounds,
            marked: vec![false; bounds.area()],
            count: 0,
            danger_radius,
        }
    }

    /// Reports whether the cell is unsafe.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.offset(coord)
            .and_then(|index| self.marked.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of unsafe cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Reports whether no cell is unsafe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Radius used around the zookeepers' current cells.
    #[must_use]
    pub fn danger_radius(&self) -> u32 {
        self.danger_radius
    }

    fn mark_diamond(&mut self, center: CellCoord, radius: u32) {
        let radius = i64::from(radius);
        for dx in -radius..=radius {
            let remaining = radius - dx.abs();
            for dy in -remaining..=remaining {
                let cell = self.bounds.offset(center, dx, dy);
                self.mark(cell);
            }
        }
    }

    fn mark(&mut self, coord: CellCoord) {
        if let Some(slot) = self.offset(coord).and_then(|index| self.marked.get_mut(index)) {
            if !*slot {
                *slot = true;
                self.count += 1;
            }
        }
    }

    fn offset(&self, coord: CellCoord) -> Option<usize> {
        if !self.bounds.contains(coord) {
            return None;
        }
        let width = usize::try_from(self.bounds.width()).ok()?;
        let x = usize::try_from(coord.x()).ok()?;
        let y = usize::try_from(coord.y()).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}

/// Hazard field builder.
#[derive(Clone, Debug, Default)]
pub struct Hazards {
    tuning: HazardTuning,
}

impl Hazards {
    /// Creates a builder using the provided tuning.
    #[must_use]
    pub fn new(tuning: HazardTuning) -> Self {
        Self { tuning }
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &HazardTuning {
        &self.tuning
    }

    /// Radius marked around each zookeeper's current cell.
    ///
    /// Starts from the focus-dependent base and is raised to at least the
    /// immediate-threat radius while any zookeeper is close to the bot.
    #[must_use]
    pub fn danger_radius(&self, arena: &Arena, bot: CellCoord, focus: Focus) -> u32 {
        let base = match focus {
            Focus::Pellet => self.tuning.pellet_radius,
            Focus::Other => self.tuning.power_up_radius,
        };

        let threats = query::zookeepers_within(arena, bot, self.tuning.immediate_threat_range);
        if threats > 0 {
            debug!(threats, "immediate threat near bot");
            base.max(self.tuning.immediate_threat_radius)
        } else {
            base
        }
    }

    /// Builds the hazard field for the tick.
    #[must_use]
    pub fn build(&self, arena: &Arena, bot: CellCoord, focus: Focus) -> HazardField {
        let bounds = arena.bounds();
        let radius = self.danger_radius(arena, bot, focus);
        let mut field = HazardField::empty(bounds, radius);

        for &keeper in arena.zookeepers() {
            field.mark_diamond(keeper, radius);

            for step in 1..=self.tuning.projection_steps {
                let projected_radius = radius
                    .saturating_sub(self.tuning.projection_shrink_per_step.saturating_mul(step))
                    .max(self.tuning.projection_min_radius);

                for direction in Direction::SEARCH_ORDER {
                    let (dx, dy) = direction.offset();
                    let projected =
                        bounds.offset(keeper, dx * i64::from(step), dy * i64::from(step));
                    if !arena.is_traversable(projected) {
                        continue;
                    }
                    field.mark_diamond(projected, projected_radius);
                }
            }
        }

        debug!(
            unsafe_cells = field.len(),
            danger_radius = radius,
            "hazard field built"
        );
        field
    }
}
