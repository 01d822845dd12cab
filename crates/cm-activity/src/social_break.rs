//! Social break: meet a group at a table, then wander off together.
//!
//! The agent asks its [`RendezvousSystem`] for a trip before it sets out
//! ([`SocialBreak::begin_activity_and_get_location`]), walks to the trip's
//! table, and waits there until the group is full and every member has
//! reached the table.  The first member to see the gathered group generates
//! the shared leg: a random walk from the table plus a pause at its end.
//! Every member then walks that identical leg, leaving at its next poll.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use cm_core::{AgentId, AgentRng, Coord, Path, SystemId};
use cm_core::error::check_non_negative;
use cm_rendezvous::{GroupSize, RendezvousRegistry, RendezvousSystem, SharedLeg, Trip};
use cm_spatial::{MapGraph, random_walk};

use crate::distribution::{DurationDistribution, SpeedRange};
use crate::phase::{Phase, TwoPhase};
use crate::venue::{VenueSource, settle};
use crate::{ActivityError, ActivityModel, ActivityResult, MoveContext};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialBreakSettings {
    /// Templates naming the same system share tables and pending groups.
    pub system:           u32,
    pub tables:           VenueSource,
    pub group:            GroupSize,
    /// Bounds on the number of map nodes in the group's walk.
    pub min_walk_nodes:   usize,
    pub max_walk_nodes:   usize,
    /// Pause at the end of the group walk.
    pub after_break_wait: DurationDistribution,
    /// How often a waiting member checks whether its group is full.
    pub poll_secs:        f64,
    pub settle_radius:    f64,
    pub speed:            SpeedRange,
}

impl Default for SocialBreakSettings {
    fn default() -> Self {
        Self {
            system:           0,
            tables:           VenueSource::MapNodes { count: 5 },
            group:            GroupSize::default(),
            min_walk_nodes:   10,
            max_walk_nodes:   100,
            after_break_wait: DurationDistribution::uniform(60.0, 600.0),
            poll_secs:        10.0,
            settle_radius:    0.0,
            speed:            SpeedRange::default(),
        }
    }
}

impl SocialBreakSettings {
    pub fn validate(&self) -> ActivityResult<()> {
        self.group.validate()?;
        if self.min_walk_nodes == 0 || self.min_walk_nodes > self.max_walk_nodes {
            return Err(ActivityError::config(
                "social_break.min_walk_nodes",
                format!("need 1 <= min ({}) <= max ({})", self.min_walk_nodes, self.max_walk_nodes),
            ));
        }
        self.after_break_wait.validate("social_break.after_break_wait")?;
        if !(self.poll_secs.is_finite() && self.poll_secs > 0.0) {
            return Err(ActivityError::config("social_break.poll_secs", "must be positive"));
        }
        check_non_negative("social_break.settle_radius", self.settle_radius)?;
        self.speed.validate("social_break.speed")
    }
}

/// Social-break model for one agent.
pub struct SocialBreak {
    settings:  Arc<SocialBreakSettings>,
    system:    Arc<RendezvousSystem>,
    member_id: AgentId,
    trip:      Option<Arc<Trip>>,
    /// Pause owed after the shared leg, once it has been issued.
    leg_wait:  Option<f64>,
    /// Counted in the trip's arrivals.
    arrived:   bool,
    /// At the table, group not yet gathered.
    waiting:   bool,
    state:     TwoPhase,
}

impl SocialBreak {
    /// Resolve the tables and register (or join) the rendezvous system.
    pub fn new(settings: SocialBreakSettings, map: &MapGraph, registry: &mut RendezvousRegistry) -> ActivityResult<Self> {
        settings.validate()?;
        let tables = settings.tables.resolve("social_break.tables", map)?;
        let system = registry.get_or_create(SystemId(settings.system), tables)?;
        let home = system.venues()[0];
        Ok(Self {
            settings:  Arc::new(settings),
            system,
            member_id: AgentId(0),
            trip:      None,
            leg_wait:  None,
            arrived:   false,
            waiting:   false,
            state:     TwoPhase::new(home),
        })
    }

    pub fn clone_for_new_agent(&self, agent: AgentId, _rng: &mut AgentRng) -> Self {
        let table = self.system.venue_for(agent);
        Self {
            settings:  Arc::clone(&self.settings),
            system:    Arc::clone(&self.system),
            member_id: agent,
            trip:      None,
            leg_wait:  None,
            arrived:   false,
            waiting:   false,
            state:     TwoPhase::new(table),
        }
    }

    /// The trip this agent is heading to or waiting in.  Cleared once the
    /// group leaves the table.
    pub fn trip(&self) -> Option<&Arc<Trip>> {
        self.trip.as_ref()
    }

    /// Join (or open) a group at this agent's table and return the table.
    ///
    /// Call before sending the agent on its way; the location returned is
    /// the travel target.
    pub fn begin_activity_and_get_location(&mut self, rng: &mut AgentRng) -> Coord {
        let trip = self.system.get_instructions(self.member_id, self.settings.group, rng);
        let at = trip.location();
        self.trip = Some(trip);
        self.leg_wait = None;
        self.arrived = false;
        at
    }

    fn make_leg(&self, from: Coord, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> SharedLeg {
        let s = &self.settings;
        let speed = s.speed.sample(rng);
        let nodes = match ctx.map.node_by_coordinate(from) {
            Some(start) => random_walk(ctx.map, start, s.min_walk_nodes, s.max_walk_nodes, rng),
            None => Vec::new(),
        };
        let waypoints: Vec<Coord> = if nodes.is_empty() {
            vec![from]
        } else {
            nodes.iter().map(|&n| ctx.map.node_pos(n)).collect()
        };
        let destination = waypoints.last().copied().unwrap_or(from);
        SharedLeg {
            path: Path::with_waypoints(waypoints, speed),
            destination,
            wait_secs: s.after_break_wait.sample(rng),
        }
    }
}

impl ActivityModel for SocialBreak {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        match self.state.phase() {
            Phase::Traveling => {
                let table = match self.trip.as_ref().map(|t| t.location()) {
                    Some(at) => at,
                    None => self.begin_activity_and_get_location(rng),
                };
                let s = &self.settings;
                let mut path = ctx.route(self.state.last_location(), table, s.speed.sample(rng))?;
                if s.settle_radius > 0.0 {
                    path.add_waypoint(settle(table, s.settle_radius, ctx.bounds(), rng));
                }
                self.state.arrive(table);
                Some(path)
            }
            Phase::Engaged => {
                if self.state.is_ready() {
                    return Some(Path::stationary(self.state.last_location()));
                }
                let trip = Arc::clone(self.trip.as_ref()?);
                if !self.arrived {
                    let here = trip.mark_arrived();
                    debug!(agent = %self.member_id, here, capacity = trip.capacity(), "reached table");
                    self.arrived = true;
                }
                if !trip.is_gathered() {
                    self.waiting = true;
                    return None;
                }
                let table = trip.location();
                let leg = trip.leg_or_init(|| {
                    debug!(agent = %self.member_id, members = trip.member_count(), "group leaves table");
                    self.make_leg(table, ctx, rng)
                });
                let path = leg.path.clone();
                self.state.relocate(leg.destination);
                self.leg_wait = Some(leg.wait_secs);
                self.waiting = false;
                self.arrived = false;
                self.trip = None;
                self.state.finish();
                Some(path)
            }
        }
    }

    fn generate_wait_time(&mut self, _ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> f64 {
        match self.leg_wait.take() {
            Some(wait) => wait,
            None if self.waiting => self.settings.poll_secs,
            None => 0.0,
        }
    }

    fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    fn last_location(&self) -> Coord {
        self.state.last_location()
    }

    /// Keeps a trip requested through
    /// [`begin_activity_and_get_location`](SocialBreak::begin_activity_and_get_location).
    fn set_location(&mut self, at: Coord) {
        self.leg_wait = None;
        self.arrived = false;
        self.waiting = false;
        self.state.reset(at);
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn activity_location(&self) -> Coord {
        match &self.trip {
            Some(trip) => trip.location(),
            None => self.system.venue_for(self.member_id),
        }
    }
}
