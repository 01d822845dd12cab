//! Fluent builder for constructing a [`Sim`].

use tracing::debug;

use cm_activity::{ActivityModel, StationaryModel};
use cm_core::{AgentId, AgentRng, SystemId, Tick};
use cm_day::DayOrchestrator;
use cm_rendezvous::{GroupSize, RendezvousRegistry};
use cm_spatial::{DijkstraPathFinder, MapGraph, PathFinder, SpatialError};

use crate::config::{GroupConfig, ScenarioConfig};
use crate::sim::{Mover, RunSummary};
use crate::{Sim, SimError, SimResult, WakeQueue};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`]: run settings and agent groups
/// - [`MapGraph`]: the walkable network
///
/// # Optional inputs
///
/// | Method              | Default                |
/// |---------------------|------------------------|
/// | `.path_finder(p)`   | `DijkstraPathFinder`   |
///
/// # Example
///
/// ```rust,ignore
/// let scenario = ScenarioConfig::from_file("campus.toml".as_ref())?;
/// let mut sim = SimBuilder::new(scenario, map).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathFinder = DijkstraPathFinder> {
    scenario:    ScenarioConfig,
    map:         MapGraph,
    path_finder: P,
}

impl SimBuilder<DijkstraPathFinder> {
    pub fn new(scenario: ScenarioConfig, map: MapGraph) -> Self {
        Self { scenario, map, path_finder: DijkstraPathFinder }
    }
}

impl<P: PathFinder> SimBuilder<P> {
    /// Route with `path_finder` instead of Dijkstra.
    pub fn path_finder<Q: PathFinder>(self, path_finder: Q) -> SimBuilder<Q> {
        SimBuilder { scenario: self.scenario, map: self.map, path_finder }
    }

    /// Validate inputs, spawn every group's agents, and return a
    /// ready-to-run [`Sim`] with all agents due at tick 0.
    ///
    /// Agent ids are dense and assigned in group order.  Each agent's RNG is
    /// seeded from the master seed and its id, so spawning is reproducible.
    pub fn build(self) -> SimResult<Sim<P>> {
        self.scenario.validate()?;
        if self.map.is_empty() {
            return Err(SpatialError::EmptyMap.into());
        }
        let ScenarioConfig { sim: config, groups: group_configs } = self.scenario;
        let map = self.map;
        let seed = config.seed;

        let mut registry = RendezvousRegistry::new();
        let mut movers = Vec::new();
        let mut groups = Vec::new();
        let mut rngs = Vec::new();
        let mut positions = Vec::new();
        // Students per group, with the rendezvous system and group bounds they use.
        let mut cohorts: Vec<(SystemId, GroupSize, std::ops::Range<usize>)> = Vec::new();

        for (g, group) in group_configs.into_iter().enumerate() {
            let first = movers.len();
            match group {
                GroupConfig::Students { count, day } => {
                    let system = SystemId(day.social_break.system);
                    let sizes = day.social_break.group;
                    let template = DayOrchestrator::new(day, &map, &mut registry)?;
                    for _ in 0..count {
                        let id = AgentId::from_index(movers.len());
                        let mut rng = AgentRng::new(seed, id);
                        let mut orch = template.clone_for_new_agent(id, &mut rng);
                        positions.push(orch.initial_location());
                        movers.push(Mover::Day(orch));
                        groups.push(g);
                        rngs.push(rng);
                    }
                    cohorts.push((system, sizes, first..movers.len()));
                }
                GroupConfig::Stationary { count, venues } => {
                    let template = StationaryModel::new(&venues, &map)?;
                    let available = template.venue_count();
                    let count = count.unwrap_or(available);
                    if count > available {
                        return Err(SimError::AgentCountMismatch {
                            expected: available,
                            got:      count,
                            what:     "stationary venues",
                        });
                    }
                    for k in 0..count {
                        let id = AgentId::from_index(movers.len());
                        let model = template.clone_for_index(k)?;
                        positions.push(model.last_location());
                        movers.push(Mover::Stationary(model));
                        groups.push(g);
                        rngs.push(AgentRng::new(seed, id));
                    }
                }
            }
            debug!(group = g, first, count = movers.len() - first, "spawned group");
        }

        check_rendezvous_pools(&registry, &cohorts)?;

        let wake_queue = WakeQueue::with_all(movers.len(), Tick::ZERO);
        Ok(Sim {
            clock: config.make_clock(),
            config,
            map,
            path_finder: self.path_finder,
            registry,
            movers,
            groups,
            rngs,
            positions,
            wake_queue,
            summary: RunSummary::default(),
        })
    }
}

/// Every table must have at least `group.min` students bound to it, or the
/// trips opened there could never fill.
///
/// Students of every group naming the same system count towards one pool.
fn check_rendezvous_pools(
    registry: &RendezvousRegistry,
    cohorts:  &[(SystemId, GroupSize, std::ops::Range<usize>)],
) -> SimResult<()> {
    for (id, sizes, agents) in cohorts {
        let Some(system) = registry.get(*id) else { continue };
        let mut pool = vec![0usize; system.venue_count()];
        for (_, _, members) in cohorts.iter().filter(|(other, _, _)| other == id) {
            for i in members.clone() {
                pool[system.venue_index(AgentId::from_index(i))] += 1;
            }
        }
        for i in agents.clone() {
            let venue = system.venue_index(AgentId::from_index(i));
            if pool[venue] < sizes.min {
                return Err(SimError::Config(format!(
                    "{id} table {venue} has {} student(s) but social-break groups need at least {}",
                    pool[venue], sizes.min,
                )));
            }
        }
    }
    Ok(())
}
