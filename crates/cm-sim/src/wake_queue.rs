//! `WakeQueue`: sparse per-tick agent activation queue.
//!
//! Agents spend most ticks walking or engaged.  Rather than polling every
//! agent every tick, each step registers the tick at which the agent next
//! needs attention, and each tick drains only the agents due then.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of
//! distinct wake ticks currently queued.

use std::collections::BTreeMap;

use cm_core::{AgentId, Tick};

/// Maps simulation ticks to the agents that must wake at that tick.
#[derive(Default, Debug)]
pub struct WakeQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue agents `0..count` at `tick`.
    pub fn with_all(count: usize, tick: Tick) -> Self {
        let mut queue = Self::new();
        for i in 0..count {
            queue.push(tick, AgentId::from_index(i));
        }
        queue
    }

    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return the agents due at exactly `tick`, in ascending id
    /// order with duplicates removed.
    ///
    /// `None` when nobody is due (the common case; no allocation).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<AgentId>> {
        let mut agents = self.inner.remove(&tick)?;
        self.total -= agents.len();
        agents.sort_unstable();
        agents.dedup();
        Some(agents)
    }

    /// The earliest tick with at least one queued agent.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks with at least one queued agent.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
