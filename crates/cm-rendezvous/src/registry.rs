//! Rendezvous systems keyed by id.
//!
//! Agent templates that name the same `SystemId` share one system, and so
//! share venues and pending trips.  The registry lives inside one simulation
//! run; two runs never see each other's trips.

use std::collections::BTreeMap;
use std::sync::Arc;

use cm_core::{Coord, SystemId};

use crate::system::RendezvousSystem;
use crate::{RendezvousError, RendezvousResult};

#[derive(Debug, Default)]
pub struct RendezvousRegistry {
    systems: BTreeMap<SystemId, Arc<RendezvousSystem>>,
}

impl RendezvousRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The system registered under `id`, creating it with `venues` if absent.
    ///
    /// Registering an existing id again with a different venue list is an
    /// error rather than a silent override.
    pub fn get_or_create(&mut self, id: SystemId, venues: Vec<Coord>) -> RendezvousResult<Arc<RendezvousSystem>> {
        if let Some(existing) = self.systems.get(&id) {
            if existing.venues() != venues.as_slice() {
                return Err(RendezvousError::VenueMismatch(id));
            }
            return Ok(Arc::clone(existing));
        }
        let system = Arc::new(RendezvousSystem::new(id, venues)?);
        self.systems.insert(id, Arc::clone(&system));
        Ok(system)
    }

    pub fn get(&self, id: SystemId) -> Option<Arc<RendezvousSystem>> {
        self.systems.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
