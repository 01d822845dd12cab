//! Commute: walk to the agent's station and stay until its day ends.

use std::sync::Arc;

use serde::Deserialize;

use cm_core::{AgentId, AgentRng, Coord, Path};
use cm_core::error::check_non_negative;
use cm_spatial::MapGraph;

use crate::distribution::{DayOffset, SpeedRange};
use crate::phase::{Phase, TwoPhase};
use crate::venue::{VenueSource, settle};
use crate::{ActivityError, ActivityModel, ActivityResult, MoveContext};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommuteSettings {
    /// Stations.  Each agent is assigned one uniformly at random.
    pub stations:        VenueSource,
    /// Length of a day in seconds.
    pub day_length_secs: f64,
    /// Shift of each agent's personal day boundary.
    pub offset:          DayOffset,
    /// Agents spread out this far (metres) around the station.
    pub settle_radius:   f64,
    pub speed:           SpeedRange,
}

impl Default for CommuteSettings {
    fn default() -> Self {
        Self {
            stations:        VenueSource::MapNodes { count: 1 },
            day_length_secs: 86_400.0,
            offset:          DayOffset::None,
            settle_radius:   100.0,
            speed:           SpeedRange::default(),
        }
    }
}

impl CommuteSettings {
    pub fn validate(&self) -> ActivityResult<()> {
        if !(self.day_length_secs.is_finite() && self.day_length_secs > 0.0) {
            return Err(ActivityError::config("commute.day_length_secs", "must be positive"));
        }
        check_non_negative("commute.settle_radius", self.settle_radius)?;
        self.offset.validate()?;
        self.speed.validate("commute.speed")
    }
}

struct Shared {
    settings: CommuteSettings,
    stations: Vec<Coord>,
}

/// Commute model for one agent.
///
/// The engagement ends at the agent's next personal day boundary:
/// `day - ((now + day + offset) mod day)` seconds after arrival.
pub struct Commute {
    shared:  Arc<Shared>,
    station: Coord,
    offset:  f64,
    state:   TwoPhase,
}

impl Commute {
    /// Build a prototype.  Use [`clone_for_new_agent`](Self::clone_for_new_agent)
    /// for each agent.
    pub fn new(settings: CommuteSettings, map: &MapGraph) -> ActivityResult<Self> {
        settings.validate()?;
        let stations = settings.stations.resolve("commute.stations", map)?;
        let station = stations[0];
        Ok(Self {
            shared:  Arc::new(Shared { settings, stations }),
            station,
            offset:  0.0,
            state:   TwoPhase::new(station),
        })
    }

    pub fn clone_for_new_agent(&self, _agent: AgentId, rng: &mut AgentRng) -> Self {
        let shared = Arc::clone(&self.shared);
        let station = *rng.choose(&shared.stations).unwrap_or(&self.station);
        let offset = shared.settings.offset.sample(shared.settings.day_length_secs, rng);
        Self { shared, station, offset, state: TwoPhase::new(station) }
    }

    pub fn station(&self) -> Coord {
        self.station
    }

    /// This agent's day-boundary shift in seconds.
    pub fn day_offset(&self) -> f64 {
        self.offset
    }

    /// Seconds from `now` to this agent's next day boundary, in `(0, day]`.
    pub fn until_day_end(&self, now: f64) -> f64 {
        let day = self.shared.settings.day_length_secs;
        day - (now + day + self.offset).rem_euclid(day)
    }
}

impl ActivityModel for Commute {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        match self.state.phase() {
            Phase::Traveling => {
                let s = &self.shared.settings;
                let mut path = ctx.route(self.state.last_location(), self.station, s.speed.sample(rng))?;
                if s.settle_radius > 0.0 {
                    path.add_waypoint(settle(self.station, s.settle_radius, ctx.bounds(), rng));
                }
                self.state.arrive(self.station);
                Some(path)
            }
            Phase::Engaged => {
                let now = ctx.now_secs();
                let until = self.until_day_end(now);
                if self.state.engage(now, |_| until) {
                    Some(Path::stationary(self.state.last_location()))
                } else {
                    None
                }
            }
        }
    }

    fn generate_wait_time(&mut self, ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> f64 {
        self.state.remaining(ctx.now_secs())
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
        self.station
    }
}
