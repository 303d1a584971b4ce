#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zooscape bot.
//!
//! This crate defines the vocabulary that connects adapters, the per-tick
//! world view, and the pure decision systems. Adapters decode a
//! [`WorldSnapshot`] once per tick and hand it to the decision engine, which
//! answers with exactly one [`Command`]. Systems only ever read snapshots;
//! the sole mutable state lives in the engine that owns the bot.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod geometry;
mod history;

pub use geometry::GridBounds;
pub use history::PositionHistory;

/// The single action emitted by the bot for a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Step toward decreasing `y`.
    Up,
    /// Step toward increasing `y`.
    Down,
    /// Step toward decreasing `x`.
    Left,
    /// Step toward increasing `x`.
    Right,
    /// Activate the currently held power-up.
    UseItem,
}

impl Command {
    /// Movement direction carried by the command, if it is a movement.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::UseItem => None,
        }
    }

    /// Reports whether the command moves the bot.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        self.direction().is_some()
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::UseItem => "UseItem",
        };
        f.write_str(label)
    }
}

/// Cardinal movement directions available to the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Order in which every planner enumerates moves.
    ///
    /// Breadth-first expansion, greedy scoring and escape ranking all iterate
    /// in this order, so equally good moves resolve to the earliest entry.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)` applied by a single step.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a unit delta back onto a direction.
    #[must_use]
    pub const fn from_unit_delta(dx: i64, dy: i64) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Location of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates, ignoring wraparound.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x().abs_diff(other.x()) + self.y().abs_diff(other.y())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Content tag carried by a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellContent {
    /// Open floor.
    Empty,
    /// Impassable wall.
    Wall,
    /// Regular collectable pellet.
    Pellet,
    /// Power pellet power-up.
    PowerPellet,
    /// Chameleon cloak power-up.
    ChameleonCloak,
    /// Scavenger power-up.
    Scavenger,
    /// Big moose juice power-up.
    BigMooseJuice,
}

impl CellContent {
    /// Reports whether the content belongs to the power-up class.
    #[must_use]
    pub const fn is_power_up(self) -> bool {
        matches!(
            self,
            Self::PowerPellet | Self::ChameleonCloak | Self::Scavenger | Self::BigMooseJuice
        )
    }

    /// Reports whether the content is a plain pellet.
    #[must_use]
    pub const fn is_pellet(self) -> bool {
        matches!(self, Self::Pellet)
    }

    /// Reports whether the content blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// A single grid cell of the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Position of the cell.
    pub coord: CellCoord,
    /// What the cell currently holds.
    pub content: CellContent,
}

impl Cell {
    /// Creates a new cell.
    #[must_use]
    pub const fn new(coord: CellCoord, content: CellContent) -> Self {
        Self { coord, content }
    }
}

/// Power-up tag held by an animal.
///
/// Tags arrive as strings; anything outside the known set is kept verbatim as
/// [`HeldItem::Unrecognized`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HeldItem {
    /// Power pellet.
    PowerPellet,
    /// Chameleon cloak.
    ChameleonCloak,
    /// Scavenger.
    Scavenger,
    /// Big moose juice.
    BigMooseJuice,
    /// A tag the bot does not know how to use.
    Unrecognized(String),
}

impl HeldItem {
    /// Tag as it appears on the wire.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::PowerPellet => "PowerPellet",
            Self::ChameleonCloak => "ChameleonCloak",
            Self::Scavenger => "Scavenger",
            Self::BigMooseJuice => "BigMooseJuice",
            Self::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for HeldItem {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PowerPellet" => Self::PowerPellet,
            "ChameleonCloak" => Self::ChameleonCloak,
            "Scavenger" => Self::Scavenger,
            "BigMooseJuice" => Self::BigMooseJuice,
            _ => Self::Unrecognized(tag),
        }
    }
}

impl From<&str> for HeldItem {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<HeldItem> for String {
    fn from(item: HeldItem) -> Self {
        item.tag().to_owned()
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unique identifier assigned to an animal by the game server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(Uuid);

impl AnimalId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: Uuid) -> Self {
        Self(value)
    }

    /// Retrieves the underlying identifier.
    #[must_use]
    pub const fn get(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An animal competing on the grid, possibly the bot itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    /// Identity assigned by the server.
    pub id: AnimalId,
    /// Current cell.
    pub coord: CellCoord,
    /// Power-up carried by the animal, if any.
    #[serde(default)]
    pub held_item: Option<HeldItem>,
}

/// A roaming adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zookeeper {
    /// Current cell.
    pub coord: CellCoord,
}

/// Immutable view of the world delivered once per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick counter reported by the server.
    pub tick: u64,
    /// Every cell of the grid.
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Every animal, including the controlled bot.
    #[serde(default)]
    pub animals: Vec<Animal>,
    /// Every zookeeper.
    #[serde(default)]
    pub zookeepers: Vec<Zookeeper>,
}

impl WorldSnapshot {
    /// Finds the animal carrying the provided identity.
    #[must_use]
    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.iter().find(|animal| animal.id == id)
    }

    /// Positions of every zookeeper in snapshot order.
    #[must_use]
    pub fn zookeeper_cells(&self) -> Vec<CellCoord> {
        self.zookeepers.iter().map(|keeper| keeper.coord).collect()
    }
}
