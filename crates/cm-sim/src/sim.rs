//! The `Sim` struct and its tick loop.

use tracing::info;

use cm_activity::{ActivityModel, MoveContext, StationaryModel};
use cm_core::{AgentId, AgentRng, Coord, Path, SimClock, SimConfig, Tick};
use cm_day::{DayOrchestrator, DayState};
use cm_rendezvous::RendezvousRegistry;
use cm_spatial::{DijkstraPathFinder, MapGraph, PathFinder};

use crate::{SimObserver, SimResult, WakeQueue};

// ── Mover ─────────────────────────────────────────────────────────────────────

/// What drives one agent.
pub enum Mover {
    Day(DayOrchestrator),
    Stationary(StationaryModel),
}

impl Mover {
    pub fn last_location(&self) -> Coord {
        match self {
            Mover::Day(orch)       => orch.last_location(),
            Mover::Stationary(m)   => m.last_location(),
        }
    }

    fn step(&mut self, agent: AgentId, group: usize, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> AgentStep {
        match self {
            Mover::Day(orch) => {
                let step = orch.advance(ctx, rng);
                AgentStep {
                    agent,
                    group,
                    path:      step.path,
                    wait_secs: step.wait_secs,
                    state:     Some(step.state),
                    stuck:     step.stuck,
                    next_wake: None,
                }
            }
            Mover::Stationary(m) => {
                let path = m.next_path(ctx, rng);
                let wait_secs = m.generate_wait_time(ctx, rng);
                AgentStep { agent, group, path, wait_secs, state: None, stuck: false, next_wake: None }
            }
        }
    }
}

/// One agent's step, as reported to [`SimObserver::on_step`].
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStep {
    pub agent:     AgentId,
    /// Index of the scenario group the agent was spawned from.
    pub group:     usize,
    pub path:      Option<Path>,
    pub wait_secs: f64,
    /// Day state after the step; `None` for stationary agents.
    pub state:     Option<DayState>,
    pub stuck:     bool,
    /// When the agent is stepped next.  `None` means never.
    pub next_wake: Option<Tick>,
}

/// Totals over a run, logged when it ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub steps:      u64,
    pub paths:      u64,
    pub stuck:      u64,
    pub distance_m: f64,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Each tick drains the agents due from the [`WakeQueue`] and steps them in
/// ascending `AgentId` order, so a seeded run is reproducible even though
/// agents interact through shared rendezvous slots.  After a step the agent
/// is re-queued at `now + ceil((travel + wait) / tick)`, at least one tick
/// ahead; an infinite wait retires it.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PathFinder = DijkstraPathFinder> {
    pub config:      SimConfig,
    pub clock:       SimClock,
    pub map:         MapGraph,
    pub path_finder: P,
    /// Keeps the rendezvous systems of all groups reachable for inspection.
    pub registry:    RendezvousRegistry,
    /// Indexed by `AgentId`.
    pub movers:      Vec<Mover>,
    pub groups:      Vec<usize>,
    pub rngs:        Vec<AgentRng>,
    /// Where each agent is, or is headed on its current path.
    pub positions:   Vec<Coord>,
    pub wake_queue:  WakeQueue,
    pub summary:     RunSummary,
}

impl<P: PathFinder> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn agent_count(&self) -> usize {
        self.movers.len()
    }

    pub fn mover(&self, agent: AgentId) -> Option<&Mover> {
        self.movers.get(agent.index())
    }

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.agent_count(),
            ticks = self.config.total_ticks,
            tick_secs = self.config.tick_duration_secs,
            seed = self.config.seed,
            "simulation start"
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.run_one(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(
            at = %self.clock,
            steps = self.summary.steps,
            paths = self.summary.paths,
            stuck = self.summary.stuck,
            distance_km = self.summary.distance_m / 1_000.0,
            "simulation finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.run_one(observer);
        }
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn run_one<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let woken = self.process_tick(now, observer);
        observer.on_tick_end(now, woken);
        if self.config.snapshot_interval_ticks > 0 && now.0 % self.config.snapshot_interval_ticks == 0 {
            observer.on_snapshot(now, &self.positions);
        }
        self.clock.advance();
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> usize {
        let Some(woken) = self.wake_queue.drain_tick(now) else {
            return 0;
        };

        // Explicit field borrows so the borrow checker sees disjoint access.
        let ctx = MoveContext::new(&self.clock, &self.map, &self.path_finder);
        for &agent in &woken {
            let i = agent.index();
            let mover = &mut self.movers[i];
            let mut step = mover.step(agent, self.groups[i], &ctx, &mut self.rngs[i]);

            let travel = step.path.as_ref().map_or(0.0, Path::travel_secs);
            // A wake past u64::MAX ticks is the same as never.
            step.next_wake = self
                .clock
                .ticks_for_secs(travel + step.wait_secs)
                .and_then(|t| now.checked_offset(t.max(1)));
            if let Some(wake) = step.next_wake {
                self.wake_queue.push(wake, agent);
            }

            if let Some(end) = step.path.as_ref().and_then(Path::last) {
                self.positions[i] = end;
            }
            self.summary.steps += 1;
            if let Some(path) = &step.path {
                self.summary.paths += 1;
                self.summary.distance_m += path.length_m();
            }
            if step.stuck {
                self.summary.stuck += 1;
                observer.on_stuck(now, agent, mover.last_location());
            }
            observer.on_step(now, &step);
        }
        woken.len()
    }
}
