//! Agent components: structures, crew and robots.
//!
//! Capabilities are resolved when an agent is spawned. A wall gets
//! `(GridPos, Wall, Integrity, Fire)`, a human `(GridPos, Human, Health)`,
//! and so on. Systems query for exactly the capabilities they read.

use std::fmt;
use std::str::FromStr;

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::zones::ZoneCode;
use crate::constants::robot::{DEFAULT_COMMUNICATION_RANGE, INITIAL_ENERGY};
use crate::error::BuildError;

/// Structural or functional health, 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Integrity(pub f32);

impl Integrity {
    pub fn damage(&mut self, amount: f32) {
        self.0 = (self.0 - amount).max(0.0);
    }

    pub fn repair(&mut self, amount: f32) {
        self.0 = (self.0 + amount).min(100.0);
    }
}

/// Fire state of a structure; `intensity == 0` means not burning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fire {
    pub intensity: f32,
}

impl Fire {
    pub fn is_burning(&self) -> bool {
        self.intensity > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Habitat wall, interior face
    Interior,
    /// Habitat wall, exterior face
    Exterior,
    Power,
}

/// Wall marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub kind: WallKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    CommunicationsHub,
    PowerDistributionHub,
    BatteryPack,
    HazmatStorage,
}

impl EquipmentKind {
    pub fn name(&self) -> &'static str {
        match self {
            EquipmentKind::CommunicationsHub => "CentralCommunicationsSystem",
            EquipmentKind::PowerDistributionHub => "PowerDistributionHub",
            EquipmentKind::BatteryPack => "BatteryPack",
            EquipmentKind::HazmatStorage => "HazardousMaterialsStorage",
        }
    }

    /// Grid layout digit for this equipment
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "1" => Some(EquipmentKind::CommunicationsHub),
            "2" => Some(EquipmentKind::PowerDistributionHub),
            "3" => Some(EquipmentKind::BatteryPack),
            "4" => Some(EquipmentKind::HazmatStorage),
            _ => None,
        }
    }
}

impl FromStr for EquipmentKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EquipmentKind::CommunicationsHub,
            EquipmentKind::PowerDistributionHub,
            EquipmentKind::BatteryPack,
            EquipmentKind::HazmatStorage,
        ]
        .into_iter()
        .find(|kind| kind.name() == s)
        .ok_or_else(|| BuildError::UnknownEquipmentType(s.to_string()))
    }
}

/// Fixed equipment marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub kind: EquipmentKind,
}

/// Marker component identifying an entity as a crew member
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Human;

/// Crew health, 0 (dead) to 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health(pub f32);

impl Health {
    pub fn is_alive(&self) -> bool {
        self.0 > 0.0
    }

    /// Alive but below `critical`
    pub fn is_critical(&self, critical: f32) -> bool {
        self.0 > 0.0 && self.0 < critical
    }
}

/// What a robot is able to work on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    FirstAid,
    Hazard,
    WallInterior,
    WallExterior,
    Power,
    Control,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RobotRole {
    BioLabRobot,
    MaintenanceRobot,
    ConstructionRobot,
    EVASpecialistRobot,
    LogisticsRobot,
}

impl RobotRole {
    pub const ALL: [RobotRole; 5] = [
        RobotRole::BioLabRobot,
        RobotRole::MaintenanceRobot,
        RobotRole::ConstructionRobot,
        RobotRole::EVASpecialistRobot,
        RobotRole::LogisticsRobot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RobotRole::BioLabRobot => "BioLabRobot",
            RobotRole::MaintenanceRobot => "MaintenanceRobot",
            RobotRole::ConstructionRobot => "ConstructionRobot",
            RobotRole::EVASpecialistRobot => "EVASpecialistRobot",
            RobotRole::LogisticsRobot => "LogisticsRobot",
        }
    }

    /// Zones the role starts in and patrols, in placement preference order
    pub fn operational_zones(&self) -> &'static [ZoneCode] {
        match self {
            RobotRole::BioLabRobot => &[ZoneCode::MedicalBay, ZoneCode::Lab],
            RobotRole::MaintenanceRobot => &[
                ZoneCode::ControlModule,
                ZoneCode::Habitat,
                ZoneCode::PowerDistribution,
            ],
            RobotRole::ConstructionRobot => &[ZoneCode::Outdoors, ZoneCode::Deposit],
            RobotRole::EVASpecialistRobot => &[ZoneCode::Airlock, ZoneCode::Deposit],
            RobotRole::LogisticsRobot => &[ZoneCode::Outdoors, ZoneCode::Deposit],
        }
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            RobotRole::BioLabRobot => &[Capability::FirstAid, Capability::Hazard],
            RobotRole::MaintenanceRobot => &[
                Capability::WallInterior,
                Capability::Power,
                Capability::Control,
                Capability::Fire,
            ],
            RobotRole::ConstructionRobot => &[Capability::WallExterior, Capability::Power],
            RobotRole::EVASpecialistRobot => &[Capability::WallExterior, Capability::Fire],
            RobotRole::LogisticsRobot => &[Capability::Hazard, Capability::Fire],
        }
    }
}

impl fmt::Display for RobotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RobotRole {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RobotRole::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| BuildError::UnknownRobotRole(s.to_string()))
    }
}

/// Robot marker with its role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub role: RobotRole,
}

/// Work a robot has claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub target: Entity,
    pub capability: Capability,
}

/// Mutable robot state
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    pub energy: f32,
    pub current_task: Option<Task>,
    pub is_recharging: bool,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            energy: INITIAL_ENERGY,
            current_task: None,
            is_recharging: false,
        }
    }
}

impl RobotState {
    pub fn has_task(&self) -> bool {
        self.current_task.is_some()
    }
}

/// Connectivity to the communications hub
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub range: i32,
    pub connected: bool,
}

impl Default for NetworkLink {
    fn default() -> Self {
        Self {
            range: DEFAULT_COMMUNICATION_RANGE,
            connected: false,
        }
    }
}
