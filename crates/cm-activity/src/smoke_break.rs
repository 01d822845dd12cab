//! Smoke break: walk to a smoking spot, stand there, come back.

use std::sync::Arc;

use serde::Deserialize;

use cm_core::{AgentId, AgentRng, Coord, Path};
use cm_core::error::check_non_negative;
use cm_spatial::MapGraph;

use crate::distribution::{DurationDistribution, SpeedRange};
use crate::phase::{Phase, TwoPhase};
use crate::venue::{VenueSource, settle};
use crate::{ActivityModel, ActivityResult, MoveContext};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmokeBreakSettings {
    pub spots:       VenueSource,
    pub duration:    DurationDistribution,
    /// Smokers stand within this many metres of the spot.
    pub spot_radius: f64,
    pub speed:       SpeedRange,
}

impl Default for SmokeBreakSettings {
    fn default() -> Self {
        Self {
            spots:       VenueSource::MapNodes { count: 2 },
            duration:    DurationDistribution::uniform(300.0, 600.0),
            spot_radius: 5.0,
            speed:       SpeedRange::default(),
        }
    }
}

impl SmokeBreakSettings {
    pub fn validate(&self) -> ActivityResult<()> {
        self.duration.validate("smoke_break.duration")?;
        check_non_negative("smoke_break.spot_radius", self.spot_radius)?;
        self.speed.validate("smoke_break.speed")
    }
}

struct Shared {
    settings: SmokeBreakSettings,
    spots:    Vec<Coord>,
}

pub struct SmokeBreak {
    shared: Arc<Shared>,
    spot:   Coord,
    state:  TwoPhase,
}

impl SmokeBreak {
    pub fn new(settings: SmokeBreakSettings, map: &MapGraph) -> ActivityResult<Self> {
        settings.validate()?;
        let spots = settings.spots.resolve("smoke_break.spots", map)?;
        let spot = spots[0];
        Ok(Self {
            shared: Arc::new(Shared { settings, spots }),
            spot,
            state:  TwoPhase::new(spot),
        })
    }

    pub fn clone_for_new_agent(&self, _agent: AgentId, rng: &mut AgentRng) -> Self {
        let shared = Arc::clone(&self.shared);
        let spot = *rng.choose(&shared.spots).unwrap_or(&self.spot);
        Self { shared, spot, state: TwoPhase::new(spot) }
    }

    pub fn spot(&self) -> Coord {
        self.spot
    }
}

impl ActivityModel for SmokeBreak {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path> {
        let s = &self.shared.settings;
        match self.state.phase() {
            Phase::Traveling => {
                let mut path = ctx.route(self.state.last_location(), self.spot, s.speed.sample(rng))?;
                path.add_waypoint(settle(self.spot, s.spot_radius, ctx.bounds(), rng));
                self.state.arrive(self.spot);
                Some(path)
            }
            Phase::Engaged => {
                if self.state.engage(ctx.now_secs(), |_| s.duration.sample(rng)) {
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
        self.spot
    }
}
