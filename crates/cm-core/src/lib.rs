//! `cm-core`: foundational types for the `campus_mobility` simulator.
//!
//! This crate is a dependency of every other `cm-*` crate.  It has no `cm-*`
//! dependencies and only a few external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `SystemId`             |
//! | [`geo`]         | `Coord`, planar distance, bounds clamping             |
//! | [`path`]        | `Path`: one uninterrupted movement segment            |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod path;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{AgentId, EdgeId, NodeId, SystemId};
pub use path::Path;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
