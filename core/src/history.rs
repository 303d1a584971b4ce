//! Bounded FIFO of recently occupied cells.

use std::collections::VecDeque;

use crate::CellCoord;

/// Fixed-capacity sequence of positions, newest at the back.
///
/// Pushing onto a full history evicts the oldest entry, so the length never
/// exceeds the capacity chosen at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionHistory {
    capacity: usize,
    entries: VecDeque<CellCoord>,
}

impl PositionHistory {
    /// Creates an empty history holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a position, evicting the oldest one when full.
    pub fn push(&mut self, coord: CellCoord) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(coord);
    }

    /// Position recorded `back` entries before the newest one.
    ///
    /// `recent(0)` is the newest entry.
    #[must_use]
    pub fn recent(&self, back: usize) -> Option<CellCoord> {
        let len = self.entries.len();
        let index = len.checked_sub(back.checked_add(1)?)?;
        self.entries.get(index).copied()
    }

    /// Reports whether the position was recorded.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.entries.contains(&coord)
    }

    /// Forgets every recorded position.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained positions.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut history = PositionHistory::with_capacity(3);
        for x in 0..5 {
            history.push(CellCoord::new(x, 0));
        }

        assert_eq!(history.len(), 3);
        assert!(!history.contains(CellCoord::new(1, 0)));
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec![
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
                CellCoord::new(4, 0)
            ]
        );
    }

    #[test]
    fn recent_counts_back_from_newest() {
        let mut history = PositionHistory::with_capacity(6);
        history.push(CellCoord::new(1, 1));
        history.push(CellCoord::new(2, 2));

        assert_eq!(history.recent(0), Some(CellCoord::new(2, 2)));
        assert_eq!(history.recent(1), Some(CellCoord::new(1, 1)));
        assert_eq!(history.recent(2), None);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = PositionHistory::with_capacity(0);
        history.push(CellCoord::new(0, 0));
        assert!(history.is_empty());
    }
}
