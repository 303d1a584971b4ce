#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when to spend a held item and where to go next.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zooscape_core::{Cell, CellContent, CellCoord, GridBounds, HeldItem};
use zooscape_world::{query, Arena};

/// Distances steering item usage and destination ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingTuning {
    /// Power-ups at most this far away win outright.
    pub nearby_power_up_range: u32,
    /// A distant power-up loses only to a pellet more than this many times closer.
    pub pellet_preference_ratio: u32,
    /// A chameleon cloak is worn once a zookeeper is at most this far away.
    pub cloak_trigger_range: u32,
}

impl Default for TargetingTuning {
    fn default() -> Self {
        Self {
            nearby_power_up_range: 10,
            pellet_preference_ratio: 30,
            cloak_trigger_range: 5,
        }
    }
}

/// Category of a selected destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// A plain pellet.
    Pellet,
    /// A power-up cell holding the given content.
    PowerUp(CellContent),
    /// A power-up location remembered from an earlier tick.
    Remembered,
}

/// Destination chosen for the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// Cell to travel to.
    pub coord: CellCoord,
    /// What the bot expects to find there.
    pub kind: TargetKind,
}

impl Target {
    /// Reports whether the target is a plain pellet.
    #[must_use]
    pub const fn is_pellet(&self) -> bool {
        matches!(self.kind, TargetKind::Pellet)
    }
}

/// Item usage policy and destination ranking.
#[derive(Clone, Debug, Default)]
pub struct Targeting {
    tuning: TargetingTuning,
}

impl Targeting {
    /// Creates the system using the provided tuning.
    #[must_use]
    pub fn new(tuning: TargetingTuning) -> Self {
        Self { tuning }
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &TargetingTuning {
        &self.tuning
    }

    /// Decides whether the held item should be activated this tick.
    ///
    /// Every known item except the cloak is spent immediately; the cloak is
    /// saved until a zookeeper closes in. Unrecognised tags are never used.
    #[must_use]
    pub fn should_use_item(&self, arena: &Arena, bot: CellCoord, item: &HeldItem) -> bool {
        match item {
            HeldItem::PowerPellet | HeldItem::Scavenger | HeldItem::BigMooseJuice => true,
            HeldItem::ChameleonCloak => {
                query::zookeepers_within(arena, bot, self.tuning.cloak_trigger_range) > 0
            }
            HeldItem::Unrecognized(tag) => {
                debug!(tag = %tag, "holding an unrecognised item");
                false
            }
        }
    }

    /// Ranks the grid's collectables and picks a destination.
    ///
    /// Falls back to the remembered power-up location when the grid offers
    /// nothing, and to `None` when there is no memory either.
    #[must_use]
    pub fn select(
        &self,
        arena: &Arena,
        bot: CellCoord,
        remembered: Option<CellCoord>,
    ) -> Option<Target> {
        let bounds = arena.bounds();
        let power_up = closest(arena.power_ups(), bounds, bot);
        let pellet = closest(arena.pellets(), bounds, bot);

        let chosen = match (power_up, pellet) {
            (Some((power_up, distance)), _) if distance <= self.tuning.nearby_power_up_range => {
                debug!(coord = %power_up.coord, distance, "targeting nearby power-up");
                Some(power_up)
            }
            (Some((power_up, power_up_distance)), Some((pellet, pellet_distance))) => {
                let scaled = u64::from(pellet_distance)
                    * u64::from(self.tuning.pellet_preference_ratio);
                let choice = if scaled < u64::from(power_up_distance) {
                    pellet
                } else {
                    power_up
                };
                debug!(
                    power_up_distance,
                    pellet_distance,
                    chose = ?choice.content,
                    "weighed distant power-up against pellet"
                );
                Some(choice)
            }
            (Some((power_up, _)), None) => Some(power_up),
            (None, Some((pellet, _))) => Some(pellet),
            (None, None) => None,
        };

        if let Some(cell) = chosen {
            let kind = if cell.content.is_pellet() {
                TargetKind::Pellet
            } else {
                TargetKind::PowerUp(cell.content)
            };
            return Some(Target {
                coord: cell.coord,
                kind,
            });
        }

        remembered.map(|coord| {
            debug!(coord = %coord, "no collectables left, heading to remembered power-up");
            Target {
                coord,
                kind: TargetKind::Remembered,
            }
        })
    }
}

fn closest(cells: &[Cell], bounds: GridBounds, bot: CellCoord) -> Option<(&Cell, u32)> {
    cells
        .iter()
        .map(|cell| (cell, bounds.toroidal_distance(cell.coord, bot)))
        .min_by_key(|&(_, distance)| distance)
}

/// Power-up closest to the bot by plain, non-wrapping Manhattan distance.
#[must_use]
pub fn nearest_power_up(arena: &Arena, bot: CellCoord) -> Option<CellCoord> {
    arena
        .power_ups()
        .iter()
        .map(|cell| cell.coord)
        .min_by_key(|coord| coord.manhattan_distance(bot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zooscape_core::{WorldSnapshot, Zookeeper};

    fn arena(
        width: u32,
        height: u32,
        items: &[(CellCoord, CellContent)],
        keepers: &[CellCoord],
    ) -> Arena {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| CellCoord::new(x, y)))
            .map(|coord| {
                let content = items
                    .iter()
                    .find(|(item, _)| *item == coord)
                    .map_or(CellContent::Empty, |&(_, content)| content);
                Cell::new(coord, content)
            })
            .collect();
        Arena::from_snapshot(&WorldSnapshot {
            tick: 0,
            cells,
            animals: Vec::new(),
            zookeepers: keepers.iter().map(|&coord| Zookeeper { coord }).collect(),
        })
        .expect("arena builds")
    }

    #[test]
    fn nearest_power_up_ignores_wraparound() {
        let arena = arena(
            20,
            1,
            &[
                (CellCoord::new(19, 0), CellContent::Scavenger),
                (CellCoord::new(6, 0), CellContent::PowerPellet),
            ],
            &[],
        );

        assert_eq!(
            nearest_power_up(&arena, CellCoord::new(0, 0)),
            Some(CellCoord::new(6, 0))
        );
    }

    #[test]
    fn ties_resolve_to_snapshot_order() {
        let arena = arena(
            9,
            9,
            &[
                (CellCoord::new(2, 4), CellContent::Pellet),
                (CellCoord::new(6, 4), CellContent::Pellet),
            ],
            &[],
        );
        let target = Targeting::default()
            .select(&arena, CellCoord::new(4, 4), None)
            .expect("pellet available");

        assert_eq!(target.coord, CellCoord::new(2, 4));
    }
}
