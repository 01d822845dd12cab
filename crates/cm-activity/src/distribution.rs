//! Random draws configured per activity: durations, speeds, day offsets.
//!
//! Each draw takes the agent's own [`AgentRng`], so the numbers an agent
//! sees depend only on the seed and its id.

use serde::Deserialize;

use cm_core::error::{check_non_negative, check_range};
use cm_core::AgentRng;

use crate::{ActivityError, ActivityResult};

// ── DurationDistribution ──────────────────────────────────────────────────────

/// How long an engagement (or a post-activity pause) lasts, in seconds.
///
/// ```toml
/// duration = { kind = "uniform", min = 3600, max = 5400 }
/// duration = { kind = "bounded_pareto", shape = 0.5, min = 600, max = 10800 }
/// duration = { kind = "gaussian_clamped", mean = 300, std = 60, min = 120, max = 600 }
/// duration = { kind = "fixed_quanta", unit = 2700, min_units = 1, max_units = 2 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum DurationDistribution {
    /// Uniform in `[min, max)`.
    Uniform { min: f64, max: f64 },
    /// Pareto with shape `shape`, truncated to `[min, max]`.  Most draws are
    /// short with a long tail.
    BoundedPareto { shape: f64, min: f64, max: f64 },
    /// Normal around `mean`, clamped to `[min, max]`.
    GaussianClamped { mean: f64, std: f64, min: f64, max: f64 },
    /// `unit × n` for a uniform integer `n` in `min_units..=max_units`
    /// (back-to-back lecture slots, for instance).
    FixedQuanta { unit: f64, min_units: u32, max_units: u32 },
}

impl DurationDistribution {
    pub const fn uniform(min: f64, max: f64) -> Self {
        DurationDistribution::Uniform { min, max }
    }

    pub fn validate(&self, what: &'static str) -> ActivityResult<()> {
        match *self {
            DurationDistribution::Uniform { min, max } => {
                check_non_negative(what, min)?;
                check_range(min, max)?;
            }
            DurationDistribution::BoundedPareto { shape, min, max } => {
                if !(shape.is_finite() && shape > 0.0) {
                    return Err(ActivityError::config(what, format!("pareto shape {shape} must be positive")));
                }
                if min.is_nan() || min <= 0.0 {
                    return Err(ActivityError::config(what, format!("pareto minimum {min} must be positive")));
                }
                check_range(min, max)?;
            }
            DurationDistribution::GaussianClamped { mean, std, min, max } => {
                check_non_negative(what, std)?;
                check_non_negative(what, min)?;
                check_range(min, max)?;
                if !mean.is_finite() {
                    return Err(ActivityError::config(what, "gaussian mean must be finite"));
                }
            }
            DurationDistribution::FixedQuanta { unit, min_units, max_units } => {
                check_non_negative(what, unit)?;
                if min_units > max_units {
                    return Err(ActivityError::config(
                        what,
                        format!("min_units {min_units} is greater than max_units {max_units}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// One draw, in seconds.
    pub fn sample(&self, rng: &mut AgentRng) -> f64 {
        match *self {
            DurationDistribution::Uniform { min, max } => rng.between(min, max),
            DurationDistribution::BoundedPareto { shape, min, max } => {
                // Inverse CDF of the Pareto distribution truncated to [min, max].
                let u = rng.unit();
                let ha = max.powf(shape);
                let la = min.powf(shape);
                let x = (-(u * ha - u * la - ha) / (ha * la)).powf(-1.0 / shape);
                x.clamp(min, max)
            }
            DurationDistribution::GaussianClamped { mean, std, min, max } => {
                (mean + std * rng.gaussian()).clamp(min, max)
            }
            DurationDistribution::FixedQuanta { unit, min_units, max_units } => {
                unit * rng.gen_range(min_units..=max_units) as f64
            }
        }
    }
}

// ── SpeedRange ────────────────────────────────────────────────────────────────

/// Walking speed in m/s, drawn afresh for every path.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl SpeedRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, what: &'static str) -> ActivityResult<()> {
        check_range(self.min, self.max)?;
        if self.min <= 0.0 {
            return Err(ActivityError::config(what, format!("speed {} must be positive", self.min)));
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut AgentRng) -> f64 {
        rng.between(self.min, self.max)
    }
}

impl Default for SpeedRange {
    fn default() -> Self {
        SpeedRange::new(0.5, 1.5)
    }
}

// ── DayOffset ─────────────────────────────────────────────────────────────────

/// Per-agent shift of the personal day boundary, in seconds.
///
/// Drawn once per agent and clamped to half a day either way.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum DayOffset {
    /// Everyone's day ends at the same moment.
    #[default]
    None,
    /// Uniform over the whole day.
    Uniform,
    /// Normal around zero with standard deviation `std_secs`.
    Gaussian { std_secs: f64 },
}

impl DayOffset {
    pub fn validate(&self) -> ActivityResult<()> {
        if let DayOffset::Gaussian { std_secs } = *self {
            check_non_negative("commute.offset.std_secs", std_secs)?;
        }
        Ok(())
    }

    pub fn sample(&self, day_len: f64, rng: &mut AgentRng) -> f64 {
        let half = day_len / 2.0;
        match *self {
            DayOffset::None => 0.0,
            DayOffset::Uniform => rng.between(0.0, day_len) - half,
            DayOffset::Gaussian { std_secs } => (rng.gaussian() * std_secs).clamp(-half, half),
        }
    }
}
