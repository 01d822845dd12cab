//! Per-venue rendezvous barrier.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use cm_core::{AgentId, AgentRng, Coord, SystemId};

use crate::trip::{GroupSize, Trip};
use crate::{RendezvousError, RendezvousResult};

/// A set of venues, each holding at most one trip that is still filling.
///
/// Agents are bound to a venue by `agent_id mod venue_count`, so a given
/// agent always meets at the same place within one system.
#[derive(Debug)]
pub struct RendezvousSystem {
    id:     SystemId,
    venues: Vec<Coord>,
    slots:  Vec<Mutex<Option<Arc<Trip>>>>,
}

impl RendezvousSystem {
    /// Fails if `venues` is empty.
    pub fn new(id: SystemId, venues: Vec<Coord>) -> RendezvousResult<Self> {
        if venues.is_empty() {
            return Err(RendezvousError::NoVenues(id));
        }
        let slots = venues.iter().map(|_| Mutex::new(None)).collect();
        Ok(Self { id, venues, slots })
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn venues(&self) -> &[Coord] {
        &self.venues
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    /// Venue slot that `agent` is bound to.
    #[inline]
    pub fn venue_index(&self, agent: AgentId) -> usize {
        agent.index() % self.venues.len()
    }

    /// The venue `agent` meets at.  Does not touch the slots.
    pub fn venue_for(&self, agent: AgentId) -> Coord {
        self.venues[self.venue_index(agent)]
    }

    /// Join (or open) the trip at `agent`'s venue.
    ///
    /// If the venue has no pending trip, a new one is opened with a capacity
    /// drawn from `group` using the arriving agent's RNG.  The agent is then
    /// added.  If that fills the trip, it is detached from the venue before
    /// being returned, so the next arrival opens a fresh trip.  Earlier members
    /// keep their own `Arc` to the same trip and see it become full.
    ///
    /// The whole sequence runs under the venue's lock.
    pub fn get_instructions(&self, agent: AgentId, group: GroupSize, rng: &mut AgentRng) -> Arc<Trip> {
        let index = self.venue_index(agent);
        let mut slot = self.slots[index].lock().unwrap_or_else(PoisonError::into_inner);

        let trip = match slot.as_ref() {
            Some(trip) => Arc::clone(trip),
            None => {
                let capacity = group.draw(rng).max(1);
                let trip = Arc::new(Trip::new(capacity, self.venues[index]));
                debug!(system = %self.id, venue = index, capacity, "opened trip");
                *slot = Some(Arc::clone(&trip));
                trip
            }
        };

        if trip.add_member(agent) {
            *slot = None;
            debug!(system = %self.id, venue = index, members = ?trip.members(), "trip sealed");
        }
        trip
    }

    /// The trip still filling at `venue_index`, if any.
    pub fn pending(&self, venue_index: usize) -> Option<Arc<Trip>> {
        self.slots
            .get(venue_index)?
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
