//! Scenario files: run settings plus the agent groups to spawn.

use std::path::Path;

use serde::Deserialize;

use cm_activity::VenueSource;
use cm_core::SimConfig;
use cm_day::DaySettings;

use crate::{SimError, SimResult};

/// A whole scenario, usually read from TOML.
///
/// ```toml
/// [sim]
/// tick_duration_secs = 10
/// total_ticks = 8640
/// seed = 42
///
/// [[groups]]
/// kind = "students"
/// count = 40
///
/// [[groups]]
/// kind = "stationary"
/// venues = { map_nodes = { count = 6 } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub sim:    SimConfig,
    pub groups: Vec<GroupConfig>,
}

/// One agent template and how many agents to spawn from it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum GroupConfig {
    /// Agents that live a full day of activities.
    Students {
        count: usize,
        #[serde(default)]
        day:   DaySettings,
    },
    /// One pinned agent per venue.  `count` defaults to the number of
    /// venues and may not exceed it.
    Stationary {
        count:  Option<usize>,
        venues: VenueSource,
    },
}

impl GroupConfig {
    pub fn kind_name(&self) -> &'static str {
        match self {
            GroupConfig::Students { .. }   => "students",
            GroupConfig::Stationary { .. } => "stationary",
        }
    }
}

impl ScenarioConfig {
    pub fn parse(text: &str) -> SimResult<Self> {
        let config: ScenarioConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SimError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Checks everything that does not need the map.
    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        if self.groups.is_empty() {
            return Err(SimError::Config("scenario has no agent groups".into()));
        }
        for (i, group) in self.groups.iter().enumerate() {
            match group {
                GroupConfig::Students { count, day } => {
                    if *count == 0 {
                        return Err(SimError::Config(format!("group {i} (students): count must be at least 1")));
                    }
                    day.validate()?;
                }
                GroupConfig::Stationary { count: Some(0), .. } => {
                    return Err(SimError::Config(format!("group {i} (stationary): count must be at least 1")));
                }
                GroupConfig::Stationary { .. } => {}
            }
        }
        Ok(())
    }
}
