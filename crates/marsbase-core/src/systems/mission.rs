//! Mission verdict from global status and crew survival

use std::fmt;

use hecs::World;
use serde::{Deserialize, Serialize};

use super::status::GlobalStatus;
use crate::components::{Health, Human};
use crate::constants::StabilityThresholds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    #[default]
    Ongoing,
    Success,
    Failure,
}

impl MissionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MissionStatus::Ongoing)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissionStatus::Ongoing => "ONGOING",
            MissionStatus::Success => "SUCCESS",
            MissionStatus::Failure => "FAILURE",
        })
    }
}

/// Pure verdict over status and survivor count; first match wins
pub fn judge(
    status: &GlobalStatus,
    alive_humans: usize,
    thresholds: &StabilityThresholds,
) -> MissionStatus {
    let stable = status.power_level > thresholds.power
        && status.atmospheric_condition > thresholds.atmosphere
        && status.contamination_level < thresholds.contamination
        && status.communications_online;
    if stable {
        return MissionStatus::Success;
    }

    if status.power_level < thresholds.failure_floor
        || status.atmospheric_condition < thresholds.failure_floor
    {
        return MissionStatus::Failure;
    }

    if alive_humans == 0 {
        return MissionStatus::Failure;
    }

    MissionStatus::Ongoing
}

pub fn alive_humans(world: &World) -> usize {
    world
        .query::<(&Human, &Health)>()
        .iter()
        .filter(|(_, (_, health))| health.is_alive())
        .count()
}

/// Evaluate the mission against the live population
pub fn evaluate(
    world: &World,
    status: &GlobalStatus,
    thresholds: &StabilityThresholds,
) -> MissionStatus {
    judge(status, alive_humans(world), thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GridPos;

    fn status(power: f32, atmosphere: f32, contamination: f32, comms: bool) -> GlobalStatus {
        GlobalStatus {
            power_level: power,
            atmospheric_condition: atmosphere,
            contamination_level: contamination,
            communications_online: comms,
            fire_alarm_on: false,
        }
    }

    #[test]
    fn test_success_requires_every_condition() {
        let t = StabilityThresholds::default();
        assert_eq!(judge(&status(71.0, 71.0, 9.0, true), 1, &t), MissionStatus::Success);
        assert_eq!(judge(&status(70.0, 71.0, 9.0, true), 1, &t), MissionStatus::Ongoing);
        assert_eq!(judge(&status(71.0, 70.0, 9.0, true), 1, &t), MissionStatus::Ongoing);
        assert_eq!(judge(&status(71.0, 71.0, 10.0, true), 1, &t), MissionStatus::Ongoing);
        assert_eq!(judge(&status(71.0, 71.0, 9.0, false), 1, &t), MissionStatus::Ongoing);
    }

    #[test]
    fn test_failure_floor() {
        let t = StabilityThresholds::default();
        assert_eq!(judge(&status(9.9, 90.0, 0.0, true), 1, &t), MissionStatus::Failure);
        assert_eq!(judge(&status(50.0, 9.9, 0.0, true), 1, &t), MissionStatus::Failure);
        assert_eq!(judge(&status(10.0, 10.0, 0.0, true), 1, &t), MissionStatus::Ongoing);
        // unclamped atmosphere below zero is still a failure
        assert_eq!(judge(&status(50.0, -3.0, 0.0, true), 1, &t), MissionStatus::Failure);
    }

    #[test]
    fn test_success_wins_over_no_survivors() {
        let t = StabilityThresholds::default();
        assert_eq!(judge(&status(90.0, 90.0, 0.0, true), 0, &t), MissionStatus::Success);
    }

    #[test]
    fn test_no_survivors_with_middling_metrics() {
        let t = StabilityThresholds::default();
        assert_eq!(judge(&status(60.0, 90.0, 0.0, true), 0, &t), MissionStatus::Failure);
    }

    #[test]
    fn test_evaluate_counts_living_humans() {
        let t = StabilityThresholds::default();
        let mut world = World::new();
        world.spawn((GridPos::new(0, 0), Human, Health(0.0)));
        assert_eq!(alive_humans(&world), 0);
        assert_eq!(evaluate(&world, &status(50.0, 90.0, 0.0, false), &t), MissionStatus::Failure);

        world.spawn((GridPos::new(0, 0), Human, Health(1.0)));
        assert_eq!(alive_humans(&world), 1);
        assert_eq!(evaluate(&world, &status(50.0, 90.0, 0.0, false), &t), MissionStatus::Ongoing);
    }

    #[test]
    fn test_display() {
        assert_eq!(MissionStatus::Failure.to_string(), "FAILURE");
        assert!(!MissionStatus::Ongoing.is_terminal());
        assert!(MissionStatus::Success.is_terminal());
    }
}
