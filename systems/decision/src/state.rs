use zooscape_core::{CellCoord, PositionHistory};
use zooscape_system_stall_detection::StallDetector;

use crate::Tuning;

/// Memory the engine carries from one tick to the next.
#[derive(Clone, Debug)]
pub struct EngineState {
    pub(crate) stall: StallDetector,
    pub(crate) recent_positions: PositionHistory,
    pub(crate) last_known_power_up: Option<CellCoord>,
    pub(crate) power_ups_used: u64,
    pub(crate) last_tick: Option<u64>,
}

impl EngineState {
    pub(crate) fn new(tuning: &Tuning) -> Self {
        Self {
            stall: StallDetector::new(tuning.stall.clone()),
            recent_positions: PositionHistory::with_capacity(tuning.recent_positions_capacity),
            last_known_power_up: None,
            power_ups_used: 0,
            last_tick: None,
        }
    }

    /// Stuck and oscillation tracking.
    #[must_use]
    pub fn stall(&self) -> &StallDetector {
        &self.stall
    }

    /// Cells the bot left most recently, newest last.
    #[must_use]
    pub fn recent_positions(&self) -> &PositionHistory {
        &self.recent_positions
    }

    /// Closest power-up seen on the last movement tick.
    #[must_use]
    pub fn last_known_power_up(&self) -> Option<CellCoord> {
        self.last_known_power_up
    }

    /// Number of times the engine has emitted `UseItem`.
    #[must_use]
    pub fn power_ups_used(&self) -> u64 {
        self.power_ups_used
    }

    /// Tick number of the last snapshot the bot was found in.
    #[must_use]
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }
}
