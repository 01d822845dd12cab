//! A group of agents that meet at one venue and then move on together.

use std::sync::{Mutex, OnceLock, PoisonError};

use cm_core::{AgentId, AgentRng, Coord, Path};

use crate::{RendezvousError, RendezvousResult};

// ── GroupSize ─────────────────────────────────────────────────────────────────

/// Inclusive bounds on the number of agents in one trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSize {
    pub min: usize,
    pub max: usize,
}

impl GroupSize {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Every agent meets alone.
    pub const SOLO: GroupSize = GroupSize { min: 1, max: 1 };

    pub fn validate(&self) -> RendezvousResult<()> {
        if self.min == 0 || self.min > self.max {
            return Err(RendezvousError::GroupSize { min: self.min, max: self.max });
        }
        Ok(())
    }

    /// Uniform draw from `min..=max`.
    pub fn draw(&self, rng: &mut AgentRng) -> usize {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        GroupSize::new(2, 5)
    }
}

// ── SharedLeg ─────────────────────────────────────────────────────────────────

/// The onward movement every member of a full trip performs.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedLeg {
    pub path:        Path,
    /// Where the leg ends.  Equal to the path's last waypoint.
    pub destination: Coord,
    /// Pause at `destination` once the leg is walked.
    pub wait_secs:   f64,
}

// ── Trip ──────────────────────────────────────────────────────────────────────

/// Who has joined a trip and how many of them are already at the venue.
#[derive(Debug, Default)]
struct Roster {
    joined:  Vec<AgentId>,
    arrived: usize,
}

/// One rendezvous group.
///
/// Shared between its members as `Arc<Trip>`.  Membership only grows, and
/// only through [`RendezvousSystem::get_instructions`](crate::RendezvousSystem::get_instructions),
/// which serializes joins per venue.  Members join while setting out, so a
/// full trip is not yet a gathered one: the group may leave only once every
/// member has also [arrived](Self::mark_arrived).
#[derive(Debug)]
pub struct Trip {
    capacity: usize,
    location: Coord,
    roster:   Mutex<Roster>,
    leg:      OnceLock<SharedLeg>,
}

impl Trip {
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, location: Coord) -> Self {
        assert!(capacity >= 1, "trip capacity must be at least 1");
        Self {
            capacity,
            location,
            roster:   Mutex::new(Roster { joined: Vec::with_capacity(capacity), arrived: 0 }),
            leg:      OnceLock::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The venue where the group gathers.
    pub fn location(&self) -> Coord {
        self.location
    }

    /// Members in arrival order.
    pub fn members(&self) -> Vec<AgentId> {
        self.lock_roster().joined.clone()
    }

    pub fn member_count(&self) -> usize {
        self.lock_roster().joined.len()
    }

    /// Members already standing at the venue.
    pub fn arrived_count(&self) -> usize {
        self.lock_roster().arrived
    }

    /// Every slot is taken.  Members may still be on their way.
    pub fn is_full(&self) -> bool {
        self.member_count() >= self.capacity
    }

    /// Append `agent` and report whether the trip is now full.
    ///
    /// # Panics
    /// Panics if the trip is already full.
    pub fn add_member(&self, agent: AgentId) -> bool {
        let mut roster = self.lock_roster();
        assert!(
            roster.joined.len() < self.capacity,
            "{agent} joined a full trip (capacity {})",
            self.capacity,
        );
        roster.joined.push(agent);
        roster.joined.len() == self.capacity
    }

    /// Record that one member has reached the venue; returns the number of
    /// members there now.  Each member calls this once per trip.
    ///
    /// # Panics
    /// Panics if more members arrive than have joined.
    pub fn mark_arrived(&self) -> usize {
        let mut roster = self.lock_roster();
        assert!(
            roster.arrived < roster.joined.len(),
            "more arrivals than members ({}) at trip",
            roster.joined.len(),
        );
        roster.arrived += 1;
        roster.arrived
    }

    /// Full, and every member is at the venue.
    pub fn is_gathered(&self) -> bool {
        let roster = self.lock_roster();
        roster.joined.len() == self.capacity && roster.arrived == self.capacity
    }

    /// The shared leg, once some member has set it.
    pub fn leg(&self) -> Option<&SharedLeg> {
        self.leg.get()
    }

    /// Set the shared leg unless one is already set.  `true` if this call won.
    pub fn set_leg(&self, leg: SharedLeg) -> bool {
        self.leg.set(leg).is_ok()
    }

    /// The shared leg, generating it with `make` if this is the first request.
    ///
    /// `make` runs at most once per trip; every caller sees the same leg.
    pub fn leg_or_init(&self, make: impl FnOnce() -> SharedLeg) -> &SharedLeg {
        self.leg.get_or_init(make)
    }

    fn lock_roster(&self) -> std::sync::MutexGuard<'_, Roster> {
        // A panicking joiner cannot leave the roster half-written.
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
