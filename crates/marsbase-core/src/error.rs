//! Error types for facility construction and configuration loading.
//!
//! Every error here describes a static defect in the scenario definition
//! (bad config file, bad grid, impossible placement). Nothing is retried;
//! errors propagate to the caller and abort construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::components::{RobotRole, ZoneCode};

/// Problems reading or validating configuration and layout input.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported zone symbol {symbol:?} at row {row}, column {col}")]
    UnsupportedSymbol { row: usize, col: usize, symbol: String },

    #[error("grid layout is empty")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CREW_SIZE must be positive")]
    InvalidCrewSize,
}

/// No coordinate could be chosen for a new agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("zone '{0}' not found")]
    ZoneNotFound(ZoneCode),

    #[error("no valid positions available in zone '{0}'")]
    NoPositionsInZone(ZoneCode),

    #[error("no valid zones available for {0} placement")]
    NoValidZone(RobotRole),

    #[error("no preferred zones available for human placement")]
    NoPreferredZone,
}

/// Failures while building the facility and its population.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("unknown zone code '{0}'")]
    UnknownZoneCode(String),

    #[error("unknown equipment type '{0}'")]
    UnknownEquipmentType(String),

    #[error("unknown robot role '{0}'")]
    UnknownRobotRole(String),

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    PositionOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, BuildError>;
