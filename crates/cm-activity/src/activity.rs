//! The closed set of day activities, dispatched through one enum.

use std::fmt;

use serde::Deserialize;

use cm_core::{AgentId, AgentRng, Coord, Path};

use crate::class::Class;
use crate::commute::Commute;
use crate::phase::Phase;
use crate::smoke_break::SmokeBreak;
use crate::social_break::SocialBreak;
use crate::{ActivityModel, MoveContext};

/// Which activity.  Also the key of transition rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commute,
    Class,
    SocialBreak,
    SmokeBreak,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Commute,
        ActivityKind::Class,
        ActivityKind::SocialBreak,
        ActivityKind::SmokeBreak,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityKind::Commute     => "commute",
            ActivityKind::Class       => "class",
            ActivityKind::SocialBreak => "social_break",
            ActivityKind::SmokeBreak  => "smoke_break",
        })
    }
}

/// One activity model of any kind.
pub enum Activity {
    Commute(Commute),
    Class(Class),
    SocialBreak(SocialBreak),
    SmokeBreak(SmokeBreak),
}

macro_rules! each_activity {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Activity::Commute($m)     => $body,
            Activity::Class($m)       => $body,
            Activity::SocialBreak($m) => $body,
            Activity::SmokeBreak($m)  => $body,
        }
    };
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Commute(_)     => ActivityKind::Commute,
            Activity::Class(_)       => ActivityKind::Class,
            Activity::SocialBreak(_) => ActivityKind::SocialBreak,
            Activity::SmokeBreak(_)  => ActivityKind::SmokeBreak,
        }
    }

    pub fn clone_for_new_agent(&self, agent: AgentId, rng: &mut AgentRng) -> Activity {
        match self {
            Activity::Commute(m)     => Activity::Commute(m.clone_for_new_agent(agent, rng)),
            Activity::Class(m)       => Activity::Class(m.clone_for_new_agent(agent, rng)),
            Activity::SocialBreak(m) => Activity::SocialBreak(m.clone_for_new_agent(agent, rng)),
            Activity::SmokeBreak(m)  => Activity::SmokeBreak(m.clone_for_new_agent(agent, rng)),
        }
    }

    /// Where an agent switching to this activity should head.
    ///
    /// For a social break this joins a rendezvous group first and returns
    /// the group's table.
    pub fn prepare_target(&mut self, rng: &mut AgentRng) -> Coord {
        match self {
            Activity::SocialBreak(m) => m.begin_activity_and_get_location(rng),
            other => other.activity_location(),
        }
    }
}

impl ActivityModel for Activity {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        each_activity!(self, m => m.next_path(ctx, rng))
    }

    fn generate_wait_time(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> f64 {
        each_activity!(self, m => m.generate_wait_time(ctx, rng))
    }

    fn is_ready(&self) -> bool {
        each_activity!(self, m => m.is_ready())
    }

    fn last_location(&self) -> Coord {
        each_activity!(self, m => m.last_location())
    }

    fn set_location(&mut self, at: Coord) {
        each_activity!(self, m => m.set_location(at))
    }

    fn phase(&self) -> Phase {
        each_activity!(self, m => m.phase())
    }

    fn activity_location(&self) -> Coord {
        each_activity!(self, m => m.activity_location())
    }
}
