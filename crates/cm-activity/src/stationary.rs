//! Agents that never move (fixed equipment in a classroom, say).

use std::sync::Arc;

use cm_core::{AgentRng, Coord, Path};
use cm_spatial::MapGraph;

use crate::phase::Phase;
use crate::venue::VenueSource;
use crate::{ActivityError, ActivityModel, ActivityResult, MoveContext};

/// Pins the `i`-th agent of its group at `venues[i]`.
///
/// Its only path is a single point, after which it asks never to be woken
/// again.
#[derive(Clone, Debug)]
pub struct StationaryModel {
    venues: Arc<Vec<Coord>>,
    at:     Coord,
}

impl StationaryModel {
    pub fn new(source: &VenueSource, map: &MapGraph) -> ActivityResult<Self> {
        let venues = source.resolve("stationary.venues", map)?;
        let at = venues[0];
        Ok(Self { venues: Arc::new(venues), at })
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    /// The model for the `index`-th member of the group.
    pub fn clone_for_index(&self, index: usize) -> ActivityResult<Self> {
        let at = *self.venues.get(index).ok_or_else(|| {
            ActivityError::config(
                "stationary.count",
                format!("member {index} has no venue ({} venues)", self.venues.len()),
            )
        })?;
        Ok(Self { venues: Arc::clone(&self.venues), at })
    }
}

impl ActivityModel for StationaryModel {
    fn next_path(&mut self, _ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> Option<Path> {
        Some(Path::stationary(self.at))
    }

    fn generate_wait_time(&mut self, _ctx: &MoveContext<'_>, _rng: &mut AgentRng) -> f64 {
        f64::INFINITY
    }

    fn is_ready(&self) -> bool {
        false
    }

    fn last_location(&self) -> Coord {
        self.at
    }

    fn set_location(&mut self, at: Coord) {
        self.at = at;
    }

    fn phase(&self) -> Phase {
        Phase::Engaged
    }

    fn activity_location(&self) -> Coord {
        self.at
    }
}
