//! MarsBase Core - Mars Habitat Crisis Simulation Engine
//!
//! A turn-based simulation of a damaged Mars habitat. Walls, equipment, crew
//! and robots live on a multi-occupancy grid partitioned into zones; every
//! tick the facility's power, atmosphere, contamination and communications
//! are re-aggregated and the mission is judged a success, a failure, or still
//! ongoing.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Walls, equipment, humans, robots
//! - **Components**: Capabilities resolved at spawn (GridPos, Integrity, Fire, Health, ...)
//! - **Systems**: Behaviors, status aggregation, mission evaluation, metrics
//!
//! All randomness flows from one seeded `ChaCha8Rng` owned by the engine, so
//! the same seed and inputs replay the same trajectory.
//!
//! # Example
//!
//! ```rust,no_run
//! use marsbase_core::prelude::*;
//!
//! let layout = GridLayout::load("config/grid_layout.csv").unwrap();
//! let config = SimConfig::load("config/params.json").unwrap();
//! let mut engine = SimulationEngine::build(&layout, &config).unwrap();
//!
//! let verdict = engine.run(Some(500));
//! println!("{verdict} after {} steps", engine.steps());
//! ```

pub mod components;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod facility;
pub mod generation;
pub mod layout;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::constants::StabilityThresholds;
    pub use crate::engine::SimulationEngine;
    pub use crate::error::{BuildError, ConfigError, PlacementError};
    pub use crate::facility::{Facility, OccupancyGrid};
    pub use crate::layout::{EquipmentPlacement, GridLayout};
    pub use crate::systems::{BehaviorModel, GlobalStatus, MetricsRecorder, MissionStatus, TickMetrics};
}
