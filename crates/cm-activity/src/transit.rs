//! Transit: the single hop between two activities.

use serde::Deserialize;

use cm_core::{AgentId, AgentRng, Coord, Path};

use crate::distribution::SpeedRange;
use crate::phase::Phase;
use crate::{ActivityModel, ActivityResult, MoveContext};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitSettings {
    pub speed: SpeedRange,
}

impl TransitSettings {
    pub fn validate(&self) -> ActivityResult<()> {
        self.speed.validate("transit.speed")
    }
}

/// Moves an agent from one activity's location to the next one's.
///
/// Armed with [`set_next_route`](Self::set_next_route); issues one shortest
/// path and is then ready.  Until armed it is ready and idle.
#[derive(Clone, Debug)]
pub struct TransitModel {
    speed: SpeedRange,
    from:  Coord,
    to:    Coord,
    last:  Coord,
    armed: bool,
}

impl TransitModel {
    pub fn new(settings: TransitSettings) -> ActivityResult<Self> {
        settings.validate()?;
        Ok(Self {
            speed: settings.speed,
            from:  Coord::ORIGIN,
            to:    Coord::ORIGIN,
            last:  Coord::ORIGIN,
            armed: false,
        })
    }

    pub fn clone_for_new_agent(&self, _agent: AgentId, _rng: &mut AgentRng) -> Self {
        self.clone()
    }

    /// Travel from `from` to `to` on the next `next_path` call.
    pub fn set_next_route(&mut self, from: Coord, to: Coord) {
        self.from = from;
        self.to = to;
        self.last = from;
        self.armed = true;
    }
}

impl ActivityModel for TransitModel {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        if !self.armed {
            return None;
        }
        let path = ctx.route(self.from, self.to, self.speed.sample(rng))?;
        self.last = self.to;
        self.armed = false;
        Some(path)
    }

    fn generate_wait_time(&mut self, _ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> f64 {
        0.0
    }

    fn is_ready(&self) -> bool {
        !self.armed
    }

    fn last_location(&self) -> Coord {
        self.last
    }

    fn set_location(&mut self, at: Coord) {
        self.last = at;
        self.from = at;
    }

    fn phase(&self) -> Phase {
        if self.armed { Phase::Traveling } else { Phase::Engaged }
    }

    fn activity_location(&self) -> Coord {
        self.to
    }
}
