//! Per-tick metrics collection

use hecs::World;
use serde::{Deserialize, Serialize};

use super::status::GlobalStatus;
use crate::components::{
    Equipment, Fire, Health, Human, Integrity, NetworkLink, Robot, RobotState, Wall, WallKind,
};
use crate::constants::{crew, StabilityThresholds};

/// One row of the metrics table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    pub step: u64,
    pub atmospheric_condition: f32,
    pub power_level: f32,
    pub alive_humans: usize,
    pub dead_humans: usize,
    pub critical_humans: usize,
    pub contamination_level: f32,
    /// Interior and exterior habitat walls below the structure threshold
    pub damaged_walls: usize,
    pub damaged_power_walls: usize,
    pub damaged_equipment: usize,
    pub active_fires: usize,
    pub recharging_robots: usize,
    pub working_robots: usize,
    pub idle_robots: usize,
    pub searching_robots: usize,
}

/// What a robot is doing, as reported in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotActivity {
    Recharging,
    Working,
    Idle,
    /// Idle but cut off from the communications hub
    Searching,
}

pub fn robot_activity(state: &RobotState, link: Option<&NetworkLink>) -> RobotActivity {
    if state.is_recharging {
        RobotActivity::Recharging
    } else if state.has_task() {
        RobotActivity::Working
    } else if link.is_some_and(|l| !l.connected) {
        RobotActivity::Searching
    } else {
        RobotActivity::Idle
    }
}

/// Snapshot the population into a metrics row
pub fn collect_metrics(
    world: &World,
    status: &GlobalStatus,
    thresholds: &StabilityThresholds,
    step: u64,
) -> TickMetrics {
    let mut row = TickMetrics {
        step,
        atmospheric_condition: status.atmospheric_condition,
        power_level: status.power_level,
        contamination_level: status.contamination_level,
        ..Default::default()
    };

    for (_, (_, health)) in world.query::<(&Human, &Health)>().iter() {
        if health.is_alive() {
            row.alive_humans += 1;
        } else {
            row.dead_humans += 1;
        }
        if health.is_critical(crew::CRITICAL_HEALTH) {
            row.critical_humans += 1;
        }
    }

    for (_, (wall, integrity)) in world.query::<(&Wall, &Integrity)>().iter() {
        if integrity.0 < thresholds.structure {
            match wall.kind {
                WallKind::Interior | WallKind::Exterior => row.damaged_walls += 1,
                WallKind::Power => row.damaged_power_walls += 1,
            }
        }
    }

    row.damaged_equipment = world
        .query::<(&Equipment, &Integrity)>()
        .iter()
        .filter(|(_, (_, integrity))| integrity.0 < thresholds.structure)
        .count();

    row.active_fires = world
        .query::<&Fire>()
        .iter()
        .filter(|(_, fire)| fire.is_burning())
        .count();

    for (_, (_, state, link)) in world
        .query::<(&Robot, &RobotState, Option<&NetworkLink>)>()
        .iter()
    {
        match robot_activity(state, link) {
            RobotActivity::Recharging => row.recharging_robots += 1,
            RobotActivity::Working => row.working_robots += 1,
            RobotActivity::Idle => row.idle_robots += 1,
            RobotActivity::Searching => row.searching_robots += 1,
        }
    }

    row
}

/// Keeps every metrics row of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsRecorder {
    rows: Vec<TickMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: TickMetrics) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[TickMetrics] {
        &self.rows
    }

    pub fn last(&self) -> Option<&TickMetrics> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}
