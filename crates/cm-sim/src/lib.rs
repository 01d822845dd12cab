//! `cm-sim`: scenario loading and the tick loop for campus_mobility.
//!
//! # Tick loop
//!
//! ```text
//! build:  spawn every group's agents (dense AgentIds, group order);
//!         students are placed at their commute station;
//!         every agent is due at tick 0.
//! for tick in 0..config.total_ticks:
//!   ① Wake   drain agents due this tick from the WakeQueue (ascending id).
//!   ② Step   DayOrchestrator::advance / StationaryModel for each agent.
//!   ③ Queue  re-queue at now + ceil((travel + wait) / tick), min one tick;
//!            an infinite wait retires the agent.
//!   ④ Report on_step / on_stuck per agent, on_snapshot every N ticks.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cm_sim::{NoopObserver, ScenarioConfig, SimBuilder};
//!
//! let scenario = ScenarioConfig::from_file("campus.toml".as_ref())?;
//! let mut sim = SimBuilder::new(scenario, map).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod sim;
pub mod wake_queue;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::{GroupConfig, ScenarioConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use output::CsvSnapshotObserver;
pub use sim::{AgentStep, Mover, RunSummary, Sim};
pub use wake_queue::WakeQueue;
