//! `cm-rendezvous`: group rendezvous barrier for campus_mobility.
//!
//! Independent agents heading to the same kind of place (a break table, a
//! meeting point) are gathered into a [`Trip`].  Each [`RendezvousSystem`]
//! owns one pending trip per venue; an agent's venue is
//! `agent_id mod venue_count`.  The first arrival at an empty venue opens a
//! trip with a randomly drawn capacity, later arrivals join it, and the
//! arrival that fills it detaches it from the venue so the next arrival opens
//! a fresh one.  Once full, the first member that needs the group's onward
//! leg sets it; every member then reads the identical path and timing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`trip`]     | `Trip`, `SharedLeg`, `GroupSize`                         |
//! | [`system`]   | `RendezvousSystem`: venues plus one locked slot each     |
//! | [`registry`] | `RendezvousRegistry`: systems keyed by `SystemId`        |
//! | [`error`]    | `RendezvousError`, `RendezvousResult<T>`                 |
//!
//! # Thread safety
//!
//! Systems and trips are `Send + Sync`.  The check-pending, create-or-join,
//! check-full, detach sequence for one venue runs under that venue's lock.
//! A trip's shared leg is a `OnceLock`, so concurrent writers cannot
//! produce two different legs.

pub mod error;
pub mod registry;
pub mod system;
pub mod trip;

#[cfg(test)]
mod tests;

pub use error::{RendezvousError, RendezvousResult};
pub use registry::RendezvousRegistry;
pub use system::RendezvousSystem;
pub use trip::{GroupSize, SharedLeg, Trip};
