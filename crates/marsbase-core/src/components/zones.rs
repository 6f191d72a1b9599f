//! Facility zones: codes, operating environments and the zone table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::common::{CellBounds, GridPos};
use crate::error::BuildError;

/// Functional code of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneCode {
    Outdoors,
    Airlock,
    Habitat,
    MedicalBay,
    Lab,
    ControlModule,
    PowerDistribution,
    PowerStation,
    Deposit,
    Corridor,
    HabitatWall,
    PowerWall,
}

impl ZoneCode {
    pub const ALL: [ZoneCode; 12] = [
        ZoneCode::Outdoors,
        ZoneCode::Airlock,
        ZoneCode::Habitat,
        ZoneCode::MedicalBay,
        ZoneCode::Lab,
        ZoneCode::ControlModule,
        ZoneCode::PowerDistribution,
        ZoneCode::PowerStation,
        ZoneCode::Deposit,
        ZoneCode::Corridor,
        ZoneCode::HabitatWall,
        ZoneCode::PowerWall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneCode::Outdoors => "outdoors",
            ZoneCode::Airlock => "airlock",
            ZoneCode::Habitat => "habitat",
            ZoneCode::MedicalBay => "medical_bay",
            ZoneCode::Lab => "lab",
            ZoneCode::ControlModule => "control_module",
            ZoneCode::PowerDistribution => "power_distribution",
            ZoneCode::PowerStation => "power_station",
            ZoneCode::Deposit => "deposit",
            ZoneCode::Corridor => "corridor",
            ZoneCode::HabitatWall => "habitat_wall",
            ZoneCode::PowerWall => "power_wall",
        }
    }

    /// Fixed zone → operating environment table
    pub fn environment(&self) -> OperatingEnvironment {
        match self {
            ZoneCode::Outdoors => OperatingEnvironment::External,
            ZoneCode::Airlock | ZoneCode::Deposit => OperatingEnvironment::Mixed,
            ZoneCode::Habitat
            | ZoneCode::MedicalBay
            | ZoneCode::Lab
            | ZoneCode::ControlModule
            | ZoneCode::PowerDistribution
            | ZoneCode::PowerStation
            | ZoneCode::Corridor => OperatingEnvironment::Internal,
            ZoneCode::HabitatWall | ZoneCode::PowerWall => OperatingEnvironment::None,
        }
    }

    /// Wall-only cells host structures but never a placement position
    pub fn is_wall(&self) -> bool {
        matches!(self, ZoneCode::HabitatWall | ZoneCode::PowerWall)
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneCode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| BuildError::UnknownZoneCode(s.to_string()))
    }
}

/// Who may operate in a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingEnvironment {
    Internal,
    External,
    Mixed,
    /// Not traversable or placeable
    None,
}

impl OperatingEnvironment {
    /// Can an operator rated for `self` work in a zone of `zone_env`?
    pub fn can_access(&self, zone_env: OperatingEnvironment) -> bool {
        match self {
            OperatingEnvironment::Mixed => true,
            OperatingEnvironment::Internal => matches!(
                zone_env,
                OperatingEnvironment::Internal | OperatingEnvironment::Mixed
            ),
            OperatingEnvironment::External => matches!(
                zone_env,
                OperatingEnvironment::External | OperatingEnvironment::Mixed
            ),
            OperatingEnvironment::None => false,
        }
    }
}

/// A named region of the facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub code: ZoneCode,
    pub environment: OperatingEnvironment,
    pub bounds: CellBounds,
    /// Placement candidates in row-major order; empty for wall zones
    pub positions: Vec<GridPos>,
}

impl Zone {
    pub fn new(code: ZoneCode, first: GridPos) -> Self {
        Self {
            code,
            environment: code.environment(),
            bounds: CellBounds::at(first),
            positions: Vec::new(),
        }
    }
}

/// All zones of a facility, in first-seen (row-major) order.
///
/// Only facility construction writes to the table; afterwards it is
/// read-only:
///
/// ```compile_fail
/// use marsbase_core::components::{GridPos, Zone, ZoneCode, ZoneTable};
///
/// let mut table = ZoneTable::new();
/// table.insert(Zone::new(ZoneCode::Lab, GridPos::new(0, 0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: Vec<Zone>,
    index: HashMap<ZoneCode, usize>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: ZoneCode) -> Option<&Zone> {
        self.index.get(&code).map(|&i| &self.zones[i])
    }

    pub(crate) fn get_mut(&mut self, code: ZoneCode) -> Option<&mut Zone> {
        match self.index.get(&code) {
            Some(&i) => Some(&mut self.zones[i]),
            None => None,
        }
    }

    pub fn contains(&self, code: ZoneCode) -> bool {
        self.index.contains_key(&code)
    }

    /// Insert a zone; an existing zone with the same code is replaced in place
    pub(crate) fn insert(&mut self, zone: Zone) {
        match self.index.get(&zone.code) {
            Some(&i) => self.zones[i] = zone,
            None => {
                self.index.insert(zone.code, self.zones.len());
                self.zones.push(zone);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zone> {
        self.zones.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone codes an operator rated for `environment` may work in
    pub fn accessible_from(&self, environment: OperatingEnvironment) -> Vec<ZoneCode> {
        self.zones
            .iter()
            .filter(|z| environment.can_access(z.environment))
            .map(|z| z.code)
            .collect()
    }

    /// Which zone does `pos` belong to?
    ///
    /// Bounds of different zones may overlap, so this checks membership
    /// through positions first and falls back to wall-zone bounds.
    pub fn zone_at(&self, pos: GridPos) -> Option<ZoneCode> {
        self.zones
            .iter()
            .find(|z| z.positions.contains(&pos))
            .or_else(|| {
                self.zones
                    .iter()
                    .find(|z| z.code.is_wall() && z.bounds.contains(pos))
            })
            .map(|z| z.code)
    }
}
