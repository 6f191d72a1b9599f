//! Tuning constants shared across generation, status aggregation and behaviors.

use serde::{Deserialize, Serialize};

/// Stability cutoffs used by status aggregation, mission evaluation and metrics.
///
/// There is exactly one instance of these per simulation so that the
/// aggregator and the mission verdict can never disagree on a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityThresholds {
    /// Power must exceed this for mission success.
    pub power: f32,
    /// Atmosphere must exceed this for mission success.
    pub atmosphere: f32,
    /// Contamination must stay below this for mission success.
    pub contamination: f32,
    /// Power or atmosphere below this is an unrecoverable failure.
    pub failure_floor: f32,
    /// Communications hub integrity must exceed this to be online.
    pub communications: f32,
    /// Walls and equipment below this integrity count as damaged.
    pub structure: f32,
}

pub const STABILITY_THRESHOLDS: StabilityThresholds = StabilityThresholds {
    power: 70.0,
    atmosphere: 70.0,
    contamination: 10.0,
    failure_floor: 10.0,
    communications: 50.0,
    structure: 80.0,
};

impl Default for StabilityThresholds {
    fn default() -> Self {
        STABILITY_THRESHOLDS
    }
}

/// Severity weights for the per-tick atmosphere decrement.
pub mod atmosphere {
    /// Interior wall damage: `sum / (100 * damaged_count * WALL_DAMAGE_WEIGHT)`.
    pub const WALL_DAMAGE_WEIGHT: f32 = 8.0;
    /// Fire: `sum_of_intensities / FIRE_DIVISOR`.
    pub const FIRE_DIVISOR: f32 = 800.0;
    /// Contamination: `total_damage / (100 * CONTAMINATION_WEIGHT)`.
    pub const CONTAMINATION_WEIGHT: f32 = 6.0;
}

/// Starting state of the crew.
pub mod crew {
    /// Share of the crew that starts lightly injured.
    pub const INJURED_SHARE: f64 = 0.7;
    pub const INJURED_HEALTH: f32 = 85.0;
    pub const WOUNDED_HEALTH: f32 = 65.0;
    pub const INITIAL_HEALTH: f32 = 100.0;
    /// Humans with `0 < health < CRITICAL_HEALTH` are critical.
    pub const CRITICAL_HEALTH: f32 = 30.0;
    pub const BASE_INJURE_RATE: f32 = 1.0;
    pub const BASE_HEALING_RATE: f32 = 2.0;
}

/// Initial equipment integrity rolls.
pub mod equipment {
    pub const COMMUNICATIONS_INTEGRITY: f32 = 25.0;
    pub const DISTRIBUTION_HUB_RANGE: (u32, u32) = (75, 90);
    pub const BATTERY_RANGE: (u32, u32) = (60, 85);
    pub const HAZMAT_RANGE: (u32, u32) = (65, 80);
    /// Chance a battery starts nearly drained at [`BATTERY_FAILED_INTEGRITY`].
    pub const BATTERY_FAILURE_CHANCE: f64 = 0.2;
    pub const BATTERY_FAILED_INTEGRITY: f32 = 29.0;
}

/// Structural decay and fire dynamics.
pub mod structure {
    pub const EQUIPMENT_DAMAGE_CHANCE: f64 = 0.05;
    pub const BASE_DETERIORATION_RATE: f32 = 1.0;
    pub const BASE_FIX_RATE: f32 = 5.0;
    pub const IGNITION_INTEGRITY: f32 = 30.0;
    pub const FIRE_IGNITION_CHANCE: f64 = 0.02;
    pub const IGNITION_INTENSITY: f32 = 10.0;
    pub const MAX_FIRE_INTENSITY: f32 = 100.0;
    pub const FIRE_INTENSITY_INCREASE_RATE: f32 = 2.0;
    pub const FIRE_SUPPRESSION_RATE: f32 = 15.0;
    pub const FIRE_DAMAGE_FACTOR: f32 = 0.05;
    pub const FIRE_SPREAD_INTENSITY: f32 = 50.0;
    pub const FIRE_SPREAD_RADIUS: i32 = 3;
}

/// Robot energy and networking.
pub mod robot {
    pub const INITIAL_ENERGY: f32 = 100.0;
    pub const ENERGY_DRAIN_RATE: f32 = 1.0;
    pub const LOW_ENERGY: f32 = 20.0;
    pub const RECHARGE_RATE: f32 = 10.0;
    pub const DEFAULT_COMMUNICATION_RANGE: i32 = 10;
    /// How far a robot cut off from the hub can still spot work on its own.
    pub const DETECTION_RADIUS: i32 = 5;
}
