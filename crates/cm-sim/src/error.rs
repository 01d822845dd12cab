use std::path::PathBuf;

use thiserror::Error;

use cm_activity::ActivityError;
use cm_core::CoreError;
use cm_day::DayError;
use cm_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what}: {got} agents requested but only {expected} available")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Day(#[from] DayError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("invalid scenario file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("snapshot output: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
