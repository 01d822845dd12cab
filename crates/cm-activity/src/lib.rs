//! `cm-activity`: per-activity movement models.
//!
//! Every activity is a two-phase state machine: **travel** to the activity's
//! location along a shortest path, then **engage** there until a drawn
//! duration has passed.  The day orchestrator (`cm-day`) chains them.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                 |
//! |-------------------|----------------------------------------------------------|
//! | [`model`]         | `ActivityModel` trait                                    |
//! | [`phase`]         | `Phase`, `TwoPhase` travel/engage bookkeeping            |
//! | [`context`]       | `MoveContext<'a>`: clock, map, path finder               |
//! | [`commute`]       | `Commute`: station until the agent's day ends            |
//! | [`class`]         | `Class`: classroom desk for a drawn duration             |
//! | [`social_break`]  | `SocialBreak`: rendezvous group, shared walk             |
//! | [`smoke_break`]   | `SmokeBreak`: smoking spot for a drawn duration          |
//! | [`transit`]       | `TransitModel`: one hop between two activities           |
//! | [`stationary`]    | `StationaryModel`: pinned agents                         |
//! | [`activity`]      | `Activity` enum, `ActivityKind`                          |
//! | [`distribution`]  | `DurationDistribution`, `SpeedRange`, `DayOffset`        |
//! | [`venue`]         | `VenueSource`, settling offsets                          |
//! | [`error`]         | `ActivityError`, `ActivityResult<T>`                     |
//!
//! # Per-agent instances
//!
//! Each model type is first built once per agent template (`new`), which
//! validates settings and resolves venues against the map.  Agents then get
//! their own instance from `clone_for_new_agent`, which shares the settings
//! by `Arc` and draws the per-agent parts (assigned venue, desk, day offset)
//! from the agent's RNG.

pub mod activity;
pub mod class;
pub mod commute;
pub mod context;
pub mod distribution;
pub mod error;
pub mod model;
pub mod phase;
pub mod smoke_break;
pub mod social_break;
pub mod stationary;
pub mod transit;
pub mod venue;


pub use activity::{Activity, ActivityKind};
pub use class::{Class, ClassSettings};
pub use commute::{Commute, CommuteSettings};
pub use context::MoveContext;
pub use distribution::{DayOffset, DurationDistribution, SpeedRange};
pub use error::{ActivityError, ActivityResult};
pub use model::ActivityModel;
pub use phase::{Phase, TwoPhase};
pub use smoke_break::{SmokeBreak, SmokeBreakSettings};
pub use social_break::{SocialBreak, SocialBreakSettings};
pub use stationary::StationaryModel;
pub use transit::{TransitModel, TransitSettings};
pub use venue::VenueSource;
