//! Scenario configuration loaded from `params.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::RobotRole;
use crate::error::{BuildError, ConfigError};

/// Scenario parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SimConfig {
    pub crew_size: u32,
    /// Robot role name → count. Kept as names so unknown roles surface as
    /// a build error rather than a parse error.
    pub robot_counts: BTreeMap<String, u32>,
    /// Seed for the shared random stream
    #[serde(default)]
    pub seed: Option<u64>,
    /// Stop after this many steps even if the mission is still ongoing
    #[serde(default)]
    pub max_steps: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            crew_size: 1,
            robot_counts: BTreeMap::new(),
            seed: None,
            max_steps: None,
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crew_size == 0 {
            return Err(ConfigError::InvalidCrewSize);
        }
        Ok(())
    }

    pub fn with_robots(mut self, role: RobotRole, count: u32) -> Self {
        self.robot_counts.insert(role.name().to_string(), count);
        self
    }

    /// Robot counts with roles resolved, in role-name order
    pub fn robot_roster(&self) -> Result<Vec<(RobotRole, u32)>, BuildError> {
        self.robot_counts
            .iter()
            .map(|(name, &count)| Ok((name.parse::<RobotRole>()?, count)))
            .collect()
    }
}
