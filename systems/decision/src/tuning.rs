use serde::{Deserialize, Serialize};
use zooscape_system_hazard::HazardTuning;
use zooscape_system_movement::MovementTuning;
use zooscape_system_stall_detection::StallTuning;
use zooscape_system_targeting::TargetingTuning;

/// Every tunable constant the engine consults, grouped by system.
///
/// Missing tables and fields fall back to their defaults when deserialised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Hazard field radii and projection.
    pub hazard: HazardTuning,
    /// Item usage and destination ranking.
    pub targeting: TargetingTuning,
    /// Path safety margins and greedy fallback limits.
    pub movement: MovementTuning,
    /// Stuck and oscillation detection.
    pub stall: StallTuning,
    /// Number of recently visited cells the path search avoids.
    pub recent_positions_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hazard: HazardTuning::default(),
            targeting: TargetingTuning::default(),
            movement: MovementTuning::default(),
            stall: StallTuning::default(),
            recent_positions_capacity: 5,
        }
    }
}
