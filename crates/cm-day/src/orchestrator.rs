//! `DayOrchestrator`: one agent's day as a state machine over activities.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use cm_activity::{
    Activity, ActivityKind, ActivityModel, Class, Commute, MoveContext, Phase, SmokeBreak, SocialBreak,
    TransitModel,
};
use cm_core::{AgentId, AgentRng, Coord, Path};
use cm_rendezvous::RendezvousRegistry;
use cm_spatial::MapGraph;

use crate::settings::DaySettings;
use crate::transition::TransitionTable;
use crate::DayResult;

// ── DayState ──────────────────────────────────────────────────────────────────

/// Where an agent is in its day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DayState {
    /// Not placed yet.
    Initial,
    /// Performing (or walking the last metres to) an activity.
    In(ActivityKind),
    /// In transit to an activity.
    To(ActivityKind),
}

impl fmt::Display for DayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayState::Initial => f.write_str("initial"),
            DayState::In(k)   => write!(f, "in {k}"),
            DayState::To(k)   => write!(f, "to {k}"),
        }
    }
}

/// Result of one [`DayOrchestrator::advance`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Movement to perform now.  `None` means stay put.
    pub path:      Option<Path>,
    /// Pause after `path` before the next `advance`.  May be infinite.
    pub wait_secs: f64,
    /// State after this step.
    pub state:     DayState,
    /// The active model needed a route and none exists.  `wait_secs` is then
    /// the retry delay.
    pub stuck:     bool,
}

// ── DayOrchestrator ───────────────────────────────────────────────────────────

/// Sequences one agent through its activities.
///
/// While an activity runs, `advance` forwards to it.  Once it reports
/// ready, the transition table picks the next activity, the transit model
/// carries the agent from the finished activity's last location to the next
/// one's location, and the next activity starts where transit left off.
pub struct DayOrchestrator {
    agent:            AgentId,
    /// Indexed by [`ActivityKind::index`].
    activities:       Vec<Activity>,
    transit:          TransitModel,
    transitions:      Arc<TransitionTable>,
    state:            DayState,
    stuck_retry_secs: f64,
}

impl DayOrchestrator {
    /// Build the template for an agent group.  Social-break systems are
    /// registered in (or joined from) `registry`.
    pub fn new(settings: DaySettings, map: &MapGraph, registry: &mut RendezvousRegistry) -> DayResult<Self> {
        settings.validate()?;
        let DaySettings { commute, class, social_break, smoke_break, transit, transitions, stuck_retry_secs } =
            settings;
        let activities = vec![
            Activity::Commute(Commute::new(commute, map)?),
            Activity::Class(Class::new(class, map)?),
            Activity::SocialBreak(SocialBreak::new(social_break, map, registry)?),
            Activity::SmokeBreak(SmokeBreak::new(smoke_break, map)?),
        ];
        debug_assert!(activities.iter().zip(ActivityKind::ALL).all(|(a, k)| a.kind() == k));
        Ok(Self {
            agent: AgentId(0),
            activities,
            transit: TransitModel::new(transit)?,
            transitions: Arc::new(transitions),
            state: DayState::Initial,
            stuck_retry_secs,
        })
    }

    pub fn clone_for_new_agent(&self, agent: AgentId, rng: &mut AgentRng) -> Self {
        Self {
            agent,
            activities:       self.activities.iter().map(|a| a.clone_for_new_agent(agent, rng)).collect(),
            transit:          self.transit.clone_for_new_agent(agent, rng),
            transitions:      Arc::clone(&self.transitions),
            state:            DayState::Initial,
            stuck_retry_secs: self.stuck_retry_secs,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn state(&self) -> DayState {
        self.state
    }

    pub fn activity(&self, kind: ActivityKind) -> &Activity {
        &self.activities[kind.index()]
    }

    pub fn transit(&self) -> &TransitModel {
        &self.transit
    }

    /// Place the agent at its commute station and start the day there.
    pub fn initial_location(&mut self) -> Coord {
        let commute = &mut self.activities[ActivityKind::Commute.index()];
        let at = commute.activity_location();
        commute.set_location(at);
        self.state = DayState::In(ActivityKind::Commute);
        at
    }

    /// Where the agent is headed (or is) right now.
    pub fn last_location(&self) -> Coord {
        self.active().last_location()
    }

    /// One step: switch models if the active one is done, then ask the
    /// active model for its next path and wait.
    pub fn advance(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Step {
        match self.state {
            DayState::Initial => {
                self.initial_location();
            }
            DayState::In(kind) if self.activities[kind.index()].is_ready() => {
                self.start_transit(kind, rng);
            }
            DayState::To(kind) if self.transit.is_ready() => {
                let at = self.transit.last_location();
                self.activities[kind.index()].set_location(at);
                self.state = DayState::In(kind);
            }
            _ => {}
        }

        let agent = self.agent;
        let state = self.state;
        let retry = self.stuck_retry_secs;
        let active = self.active_mut();
        let was_traveling = active.phase() == Phase::Traveling;
        let path = active.next_path(ctx, rng);
        if path.is_none() && was_traveling && active.phase() == Phase::Traveling {
            warn!(%agent, %state, from = %active.last_location(), "no route, agent stuck");
            return Step { path, wait_secs: retry, state, stuck: true };
        }
        let wait_secs = active.generate_wait_time(ctx, rng);
        Step { path, wait_secs, state, stuck: false }
    }

    fn start_transit(&mut self, from: ActivityKind, rng: &mut AgentRng) {
        let next = self.transitions.choose(from, rng);
        let origin = self.activities[from.index()].last_location();
        let target = self.activities[next.index()].prepare_target(rng);
        self.transit.set_next_route(origin, target);
        debug!(agent = %self.agent, %from, to = %next, %origin, %target, "activity finished");
        self.state = DayState::To(next);
    }

    fn active(&self) -> &dyn ActivityModel {
        match self.state {
            DayState::To(_)    => &self.transit,
            DayState::In(kind) => &self.activities[kind.index()],
            DayState::Initial  => &self.activities[ActivityKind::Commute.index()],
        }
    }

    fn active_mut(&mut self) -> &mut dyn ActivityModel {
        match self.state {
            DayState::To(_)    => &mut self.transit,
            DayState::In(kind) => &mut self.activities[kind.index()],
            DayState::Initial  => &mut self.activities[ActivityKind::Commute.index()],
        }
    }
}
