//! Grid layout loading.
//!
//! A layout is a semicolon-delimited table of single-character symbols,
//! one row per line. Letters map to zone codes, digits place equipment on an
//! implicit corridor cell, and an empty cell is outdoors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::{EquipmentKind, GridPos, ZoneCode};
use crate::error::ConfigError;

/// Equipment requested by the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPlacement {
    pub kind: EquipmentKind,
    pub pos: GridPos,
    /// Fixed starting integrity; rolled at population time when `None`
    pub integrity: Option<f32>,
}

impl EquipmentPlacement {
    pub fn new(kind: EquipmentKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            pos: GridPos::new(x, y),
            integrity: None,
        }
    }

    pub fn with_integrity(mut self, integrity: f32) -> Self {
        self.integrity = Some(integrity);
        self
    }
}

/// Parsed facility layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    /// Zone code per cell, indexed `[y][x]`
    pub zones: Vec<Vec<ZoneCode>>,
    pub equipment: Vec<EquipmentPlacement>,
}

impl GridLayout {
    pub fn width(&self) -> usize {
        self.zones.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.zones.len()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut layout = GridLayout::default();

        let rows = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty());

        for (y, line) in rows.enumerate() {
            let mut row = Vec::new();
            for (x, cell) in line.split(';').enumerate() {
                let symbol = cell.trim();
                let code = if let Some(kind) = EquipmentKind::from_symbol(symbol) {
                    layout
                        .equipment
                        .push(EquipmentPlacement::new(kind, x as i32, y as i32));
                    ZoneCode::Corridor
                } else {
                    zone_for_symbol(symbol).ok_or_else(|| ConfigError::UnsupportedSymbol {
                        row: y,
                        col: x,
                        symbol: symbol.to_string(),
                    })?
                };
                row.push(code);
            }

            if let Some(first) = layout.zones.first() {
                if first.len() != row.len() {
                    return Err(ConfigError::RaggedGrid {
                        row: y,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            layout.zones.push(row);
        }

        if layout.zones.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(layout)
    }
}

fn zone_for_symbol(symbol: &str) -> Option<ZoneCode> {
    let code = match symbol {
        "A" => ZoneCode::Airlock,
        "H" => ZoneCode::Habitat,
        "M" => ZoneCode::MedicalBay,
        "L" => ZoneCode::Lab,
        "R" => ZoneCode::ControlModule,
        "C" => ZoneCode::Corridor,
        "P" => ZoneCode::PowerStation,
        "D" => ZoneCode::PowerDistribution,
        "T" => ZoneCode::Deposit,
        "W" => ZoneCode::HabitatWall,
        "X" => ZoneCode::PowerWall,
        "" | "O" => ZoneCode::Outdoors,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_LAYOUT: &str = ";;;;;T;T;T
;A;H;H;M;M;T;T
;A;H;H;M;C;T;T
;C;C;1;C;C;C;C
;L;L;C;R;D;D;
;L;L;2;R;D;C;
;;;;;3;D;";

    #[test]
    fn test_parse_reference_layout() {
        let layout = GridLayout::parse(TEST_LAYOUT).unwrap();

        assert_eq!(layout.height(), 7);
        assert_eq!(layout.width(), 8);
        assert_eq!(layout.zones[0][0], ZoneCode::Outdoors);
        assert_eq!(layout.zones[1][1], ZoneCode::Airlock);
        assert_eq!(layout.zones[1][2], ZoneCode::Habitat);
        assert_eq!(layout.zones[1][4], ZoneCode::MedicalBay);
        assert_eq!(layout.zones[4][4], ZoneCode::ControlModule);
        assert_eq!(layout.zones[4][5], ZoneCode::PowerDistribution);

        assert_eq!(layout.equipment.len(), 3);
        assert_eq!(layout.zones[3][3], ZoneCode::Corridor);
        assert_eq!(layout.zones[5][3], ZoneCode::Corridor);
        assert_eq!(layout.zones[6][5], ZoneCode::Corridor);

        assert_eq!(
            layout.equipment[0],
            EquipmentPlacement::new(EquipmentKind::CommunicationsHub, 3, 3)
        );
        assert_eq!(layout.equipment[1].kind, EquipmentKind::PowerDistributionHub);
        assert_eq!(layout.equipment[2].kind, EquipmentKind::BatteryPack);
        assert_eq!(layout.equipment[2].pos, GridPos::new(5, 6));
    }

    #[test]
    fn test_symbols_are_trimmed_and_blank_lines_skipped() {
        let layout = GridLayout::parse(" W ; X ;O\r\n\nH;4; \n").unwrap();
        assert_eq!(
            layout.zones,
            vec![
                vec![ZoneCode::HabitatWall, ZoneCode::PowerWall, ZoneCode::Outdoors],
                vec![ZoneCode::Habitat, ZoneCode::Corridor, ZoneCode::Outdoors],
            ]
        );
        assert_eq!(layout.equipment[0].kind, EquipmentKind::HazmatStorage);
    }

    #[test]
    fn test_unsupported_symbol() {
        let err = GridLayout::parse("H;Z").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedSymbol { row: 0, col: 1, ref symbol } if symbol == "Z"
        ));
    }

    #[test]
    fn test_ragged_and_empty() {
        assert!(matches!(
            GridLayout::parse("H;H\nH"),
            Err(ConfigError::RaggedGrid { row: 1, expected: 2, found: 1 })
        ));
        assert!(matches!(GridLayout::parse("\n\n"), Err(ConfigError::EmptyGrid)));
    }
}
