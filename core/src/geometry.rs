//! Toroidal grid arithmetic.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Direction};

/// Inclusive upper corner of a wrapping grid.
///
/// The grid spans `[0, max_x] × [0, max_y]` and both axes wrap: stepping past
/// `max_x` re-enters at column zero and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    max_x: u32,
    max_y: u32,
}

impl GridBounds {
    /// Creates bounds from the largest column and row indices.
    #[must_use]
    pub const fn new(max_x: u32, max_y: u32) -> Self {
        Self { max_x, max_y }
    }

    /// Largest column index.
    #[must_use]
    pub const fn max_x(&self) -> u32 {
        self.max_x
    }

    /// Largest row index.
    #[must_use]
    pub const fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x + 1
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y + 1
    }

    /// Total number of cells covered by the bounds.
    #[must_use]
    pub fn area(&self) -> usize {
        let width = usize::try_from(self.width()).unwrap_or(0);
        let height = usize::try_from(self.height()).unwrap_or(0);
        width.saturating_mul(height)
    }

    /// Reports whether the coordinate lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.x() <= self.max_x && coord.y() <= self.max_y
    }

    /// Manhattan distance taking the shorter way round on each axis.
    #[must_use]
    pub fn toroidal_distance(&self, a: CellCoord, b: CellCoord) -> u32 {
        axis_distance(a.x(), b.x(), self.width()) + axis_distance(a.y(), b.y(), self.height())
    }

    /// Shifts a coordinate by an arbitrary offset, wrapping on both axes.
    #[must_use]
    pub fn offset(&self, coord: CellCoord, dx: i64, dy: i64) -> CellCoord {
        CellCoord::new(
            wrap(i64::from(coord.x()) + dx, self.width()),
            wrap(i64::from(coord.y()) + dy, self.height()),
        )
    }

    /// Cell reached by a single step in the provided direction.
    #[must_use]
    pub fn step(&self, coord: CellCoord, direction: Direction) -> CellCoord {
        let (dx, dy) = direction.offset();
        self.offset(coord, dx, dy)
    }

    /// Raw move delta between two cells, corrected for wraparound.
    ///
    /// A component whose magnitude exceeds half the axis size is folded back
    /// by one axis length so that a single step across the seam reads as a
    /// unit move.
    #[must_use]
    pub fn wrapped_delta(&self, from: CellCoord, to: CellCoord) -> (i64, i64) {
        (
            fold(i64::from(to.x()) - i64::from(from.x()), self.width()),
            fold(i64::from(to.y()) - i64::from(from.y()), self.height()),
        )
    }
}

fn axis_distance(a: u32, b: u32, size: u32) -> u32 {
    let direct = a.abs_diff(b);
    direct.min(size.saturating_sub(direct))
}

fn wrap(value: i64, size: u32) -> u32 {
    let size = i64::from(size.max(1));
    u32::try_from(value.rem_euclid(size)).unwrap_or(0)
}

fn fold(delta: i64, size: u32) -> i64 {
    let size = i64::from(size);
    let half = size / 2;
    if delta > half {
        delta - size
    } else if delta < -half {
        delta + size
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: GridBounds = GridBounds::new(4, 4);

    #[test]
    fn distance_prefers_wrapped_route() {
        let origin = CellCoord::new(0, 0);
        let corner = CellCoord::new(4, 4);

        assert_eq!(BOUNDS.toroidal_distance(origin, corner), 2);
        assert_eq!(origin.manhattan_distance(corner), 8);
    }

    #[test]
    fn step_wraps_across_every_edge() {
        let origin = CellCoord::new(0, 0);

        assert_eq!(BOUNDS.step(origin, Direction::Up), CellCoord::new(0, 4));
        assert_eq!(BOUNDS.step(origin, Direction::Left), CellCoord::new(4, 0));
        assert_eq!(
            BOUNDS.step(CellCoord::new(4, 4), Direction::Down),
            CellCoord::new(4, 0)
        );
        assert_eq!(
            BOUNDS.step(CellCoord::new(4, 4), Direction::Right),
            CellCoord::new(0, 4)
        );
    }

    #[test]
    fn wrapped_delta_folds_seam_crossings() {
        assert_eq!(
            BOUNDS.wrapped_delta(CellCoord::new(0, 2), CellCoord::new(4, 2)),
            (-1, 0)
        );
        assert_eq!(
            BOUNDS.wrapped_delta(CellCoord::new(4, 2), CellCoord::new(0, 2)),
            (1, 0)
        );
        assert_eq!(
            BOUNDS.wrapped_delta(CellCoord::new(2, 0), CellCoord::new(2, 4)),
            (0, -1)
        );
        assert_eq!(
            BOUNDS.wrapped_delta(CellCoord::new(2, 2), CellCoord::new(2, 3)),
            (0, 1)
        );
    }

    #[test]
    fn offset_handles_large_negative_shifts() {
        let shifted = BOUNDS.offset(CellCoord::new(1, 1), -16, 23);
        assert_eq!(shifted, CellCoord::new(0, 4));
    }

    fn coord_within(max_x: u32, max_y: u32) -> impl Strategy<Value = CellCoord> {
        (0..=max_x, 0..=max_y).prop_map(|(x, y)| CellCoord::new(x, y))
    }

    fn bounds_and_pair() -> impl Strategy<Value = (GridBounds, CellCoord, CellCoord)> {
        (1u32..40, 1u32..40).prop_flat_map(|(max_x, max_y)| {
            (
                Just(GridBounds::new(max_x, max_y)),
                coord_within(max_x, max_y),
                coord_within(max_x, max_y),
            )
        })
    }

    proptest! {
        #[test]
        fn distance_is_symmetric((bounds, a, b) in bounds_and_pair()) {
            prop_assert_eq!(bounds.toroidal_distance(a, b), bounds.toroidal_distance(b, a));
        }

        #[test]
        fn distance_never_exceeds_direct_route((bounds, a, b) in bounds_and_pair()) {
            prop_assert!(bounds.toroidal_distance(a, b) <= a.manhattan_distance(b));
        }

        #[test]
        fn distance_takes_shorter_route_per_axis((bounds, a, b) in bounds_and_pair()) {
            let dx = a.x().abs_diff(b.x());
            let dy = a.y().abs_diff(b.y());
            let expected = dx.min(bounds.width() - dx) + dy.min(bounds.height() - dy);
            prop_assert_eq!(bounds.toroidal_distance(a, b), expected);
        }

        #[test]
        fn offsets_stay_inside_bounds(
            (bounds, a, _b) in bounds_and_pair(),
            dx in -100i64..100,
            dy in -100i64..100,
        ) {
            prop_assert!(bounds.contains(bounds.offset(a, dx, dy)));
        }
    }
}
