#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateful detector that notices when the bot stops making progress.
//!
//! Two conditions are tracked across ticks: standing on the same cell
//! ("stuck") and bouncing between two or three cells ("oscillating"). The
//! detector only counts; deciding what to do about it is left to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zooscape_core::{CellCoord, PositionHistory};

/// Capacities and thresholds for the detector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StallTuning {
    /// Number of positions kept for cycle matching.
    pub history_capacity: usize,
    /// Consecutive cycle detections that demand a random escape.
    pub oscillation_trigger: u32,
    /// Consecutive motionless ticks that demand an emergency escape.
    pub stuck_trigger: u32,
}

impl Default for StallTuning {
    fn default() -> Self {
        Self {
            history_capacity: 6,
            oscillation_trigger: 3,
            stuck_trigger: 3,
        }
    }
}

/// Revisit pattern found at the tail of the position history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopPattern {
    /// `A, B, A, B`.
    TwoCycle,
    /// `A, B, C, A, B, C`.
    ThreeCycle,
}

/// Escape the detector asks for after observing a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallTrigger {
    /// The bot keeps cycling; a randomised move should break the loop.
    Oscillating,
    /// The bot has not moved; a deterministic move away from threats is due.
    Stuck,
}

/// Outcome of observing one tick's position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StallReport {
    /// Consecutive ticks without movement.
    pub stuck_counter: u32,
    /// Consecutive ticks on which a cycle was found.
    pub oscillation_counter: u32,
    /// Cycle found this tick, if any.
    pub pattern: Option<LoopPattern>,
}

/// Stuck and oscillation counters plus the history they are derived from.
#[derive(Clone, Debug)]
pub struct StallDetector {
    tuning: StallTuning,
    last_position: Option<CellCoord>,
    stuck_counter: u32,
    history: PositionHistory,
    oscillation_counter: u32,
    last_pattern: Option<LoopPattern>,
}

impl Default for StallDetector {
    fn default() -> Self {
        Self::new(StallTuning::default())
    }
}

impl StallDetector {
    /// Creates a detector with empty history.
    #[must_use]
    pub fn new(tuning: StallTuning) -> Self {
        let history = PositionHistory::with_capacity(tuning.history_capacity);
        Self {
            tuning,
            last_position: None,
            stuck_counter: 0,
            history,
            oscillation_counter: 0,
            last_pattern: None,
        }
    }

    /// Records the bot's position for the tick and updates both counters.
    pub fn observe(&mut self, position: CellCoord) -> StallReport {
        if self.last_position == Some(position) {
            self.stuck_counter = self.stuck_counter.saturating_add(1);
            debug!(stuck_counter = self.stuck_counter, "bot did not move");
        } else {
            self.stuck_counter = 0;
            self.last_position = Some(position);
        }

        self.history.push(position);

        let mut pattern = None;
        if self.history.len() >= 4 {
            pattern = detect_loop(&self.history);
            if let Some(found) = pattern {
                self.oscillation_counter = self.oscillation_counter.saturating_add(1);
                debug!(
                    oscillation_counter = self.oscillation_counter,
                    pattern = ?found,
                    "oscillation detected"
                );
            } else {
                self.oscillation_counter = 0;
            }
        }
        self.last_pattern = pattern;

        StallReport {
            stuck_counter: self.stuck_counter,
            oscillation_counter: self.oscillation_counter,
            pattern,
        }
    }

    /// Escapes that are due, in the order they should be attempted.
    ///
    /// The oscillation escape is only due on a tick that itself completed a
    /// cycle, so a counter left over from before a history reset stays quiet.
    #[must_use]
    pub fn pending_triggers(&self) -> Vec<StallTrigger> {
        let mut triggers = Vec::with_capacity(2);
        if self.last_pattern.is_some()
            && self.oscillation_counter >= self.tuning.oscillation_trigger
        {
            triggers.push(StallTrigger::Oscillating);
        }
        if self.stuck_counter >= self.tuning.stuck_trigger {
            triggers.push(StallTrigger::Stuck);
        }
        triggers
    }

    /// Clears the state behind a trigger after its escape move was committed.
    pub fn acknowledge(&mut self, trigger: StallTrigger) {
        match trigger {
            StallTrigger::Oscillating => self.oscillation_counter = 0,
            StallTrigger::Stuck => self.stuck_counter = 0,
        }
        self.history.clear();
        self.last_pattern = None;
    }

    /// Consecutive ticks without movement.
    #[must_use]
    pub fn stuck_counter(&self) -> u32 {
        self.stuck_counter
    }

    /// Consecutive ticks on which a cycle was found.
    #[must_use]
    pub fn oscillation_counter(&self) -> u32 {
        self.oscillation_counter
    }

    /// Recently observed positions, newest last.
    #[must_use]
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Position recorded when the bot last moved.
    #[must_use]
    pub fn last_position(&self) -> Option<CellCoord> {
        self.last_position
    }
}

fn detect_loop(history: &PositionHistory) -> Option<LoopPattern> {
    let at = |back: usize| history.recent(back);

    let two_cycle = history.len() >= 4 && at(0) == at(2) && at(1) == at(3);
    if two_cycle {
        return Some(LoopPattern::TwoCycle);
    }

    let three_cycle = history.len() >= 6 && at(0) == at(3) && at(1) == at(4) && at(2) == at(5);
    three_cycle.then_some(LoopPattern::ThreeCycle)
}
