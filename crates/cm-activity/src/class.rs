//! Class: walk to a classroom, sit at a desk for the length of the class.

use std::sync::Arc;

use serde::Deserialize;

use cm_core::{AgentId, AgentRng, Coord, Path};
use cm_core::error::check_non_negative;
use cm_spatial::MapGraph;

use crate::distribution::{DurationDistribution, SpeedRange};
use crate::phase::{Phase, TwoPhase};
use crate::venue::{VenueSource, settle};
use crate::{ActivityError, ActivityModel, ActivityResult, MoveContext};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassSettings {
    /// Classrooms.  Each agent attends one, chosen uniformly at random.
    pub venues:      VenueSource,
    pub duration:    DurationDistribution,
    /// Desks and seats lie within this many metres of the room's centre.
    pub seat_radius: f64,
    /// When set, agents move between their desk and a random seat every
    /// `fidget_secs` while the class runs.
    pub fidget_secs: Option<f64>,
    pub speed:       SpeedRange,
}

impl Default for ClassSettings {
    fn default() -> Self {
        Self {
            venues:      VenueSource::MapNodes { count: 30 },
            duration:    DurationDistribution::uniform(2_700.0, 5_400.0),
            seat_radius: 20.0,
            fidget_secs: None,
            speed:       SpeedRange::default(),
        }
    }
}

impl ClassSettings {
    pub fn validate(&self) -> ActivityResult<()> {
        self.duration.validate("class.duration")?;
        check_non_negative("class.seat_radius", self.seat_radius)?;
        if let Some(f) = self.fidget_secs {
            if !(f.is_finite() && f > 0.0) {
                return Err(ActivityError::config("class.fidget_secs", "must be positive"));
            }
        }
        self.speed.validate("class.speed")
    }
}

struct Shared {
    settings: ClassSettings,
    rooms:    Vec<Coord>,
    bounds:   Coord,
}

/// Class model for one agent.
pub struct Class {
    shared:   Arc<Shared>,
    room:     Coord,
    desk:     Coord,
    /// Where the agent physically is inside the room.
    seat:     Coord,
    at_desk:  bool,
    state:    TwoPhase,
}

impl Class {
    pub fn new(settings: ClassSettings, map: &MapGraph) -> ActivityResult<Self> {
        settings.validate()?;
        let rooms = settings.venues.resolve("class.venues", map)?;
        let room = rooms[0];
        Ok(Self {
            shared:  Arc::new(Shared { settings, rooms, bounds: map.bounds() }),
            room,
            desk:    room,
            seat:    room,
            at_desk: false,
            state:   TwoPhase::new(room),
        })
    }

    /// Fresh per-agent state: a random classroom and a desk inside it.
    pub fn clone_for_new_agent(&self, _agent: AgentId, rng: &mut AgentRng) -> Self {
        let shared = Arc::clone(&self.shared);
        let room = *rng.choose(&shared.rooms).unwrap_or(&self.room);
        let desk = settle(room, shared.settings.seat_radius, shared.bounds, rng);
        Self { shared, room, desk, seat: desk, at_desk: false, state: TwoPhase::new(room) }
    }

    pub fn room(&self) -> Coord {
        self.room
    }

    pub fn desk(&self) -> Coord {
        self.desk
    }

    /// Alternate between the desk and a random seat in the room.
    fn next_seat(&mut self, rng: &mut AgentRng) -> Coord {
        let seat = if self.at_desk {
            settle(self.room, self.shared.settings.seat_radius, self.shared.bounds, rng)
        } else {
            self.desk
        };
        self.at_desk = !self.at_desk;
        self.seat = seat;
        seat
    }
}

impl ActivityModel for Class {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        match self.state.phase() {
            Phase::Traveling => {
                let speed = self.shared.settings.speed.sample(rng);
                let mut path = ctx.route(self.state.last_location(), self.room, speed)?;
                path.add_waypoint(self.next_seat(rng));
                self.state.arrive(self.room);
                Some(path)
            }
            Phase::Engaged => {
                let shared = Arc::clone(&self.shared);
                if self.state.engage(ctx.now_secs(), |_| shared.settings.duration.sample(rng)) {
                    return Some(Path::stationary(self.state.last_location()));
                }
                if shared.settings.fidget_secs.is_none() {
                    return None;
                }
                let from = self.seat;
                let to = self.next_seat(rng);
                Some(Path::with_waypoints(vec![from, to], shared.settings.speed.sample(rng)))
            }
        }
    }

    fn generate_wait_time(&mut self, ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> f64 {
        let remaining = self.state.remaining(ctx.now_secs());
        match self.shared.settings.fidget_secs {
            Some(f) => remaining.min(f),
            None => remaining,
        }
    }

    fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    fn last_location(&self) -> Coord {
        self.state.last_location()
    }

    fn set_location(&mut self, at: Coord) {
        self.state.reset(at);
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn activity_location(&self) -> Coord {
        self.room
    }
}
