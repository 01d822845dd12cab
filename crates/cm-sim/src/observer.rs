//! Simulation observer trait for progress reporting and data collection.

use cm_core::{AgentId, Coord, Tick};

use crate::sim::AgentStep;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: stuck counter
///
/// ```rust,ignore
/// struct StuckCounter(usize);
///
/// impl SimObserver for StuckCounter {
///     fn on_stuck(&mut self, _tick: Tick, _agent: AgentId, _at: Coord) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any agent is stepped.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per woken agent, after its step.
    fn on_step(&mut self, _tick: Tick, _step: &AgentStep) {}

    /// Called when an agent needed a route and none exists.  The agent is
    /// retried later; this is not an error.
    fn on_stuck(&mut self, _tick: Tick, _agent: AgentId, _at: Coord) {}

    /// Called at the end of each tick with the number of agents stepped.
    fn on_tick_end(&mut self, _tick: Tick, _woken: usize) {}

    /// Called every `snapshot_interval_ticks` ticks with every agent's
    /// position, indexed by `AgentId`.
    fn on_snapshot(&mut self, _tick: Tick, _positions: &[Coord]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
