//! `cm-day`: the per-agent day orchestrator.
//!
//! A student's day is a walk through four activities (commute, class,
//! social break, smoke break) joined by transit hops.  [`DayOrchestrator`]
//! owns one instance of each activity model plus a [`TransitModel`] and
//! decides, whenever the active model reports ready, where the agent goes
//! next.
//!
//! | Module           | Contents                                        |
//! |------------------|-------------------------------------------------|
//! | [`orchestrator`] | `DayOrchestrator`, `DayState`, `Step`           |
//! | [`transition`]   | `TransitionTable`, `Transition`                 |
//! | [`settings`]     | `DaySettings` (TOML-loadable)                   |
//! | [`error`]        | `DayError`, `DayResult<T>`                      |
//!
//! [`TransitModel`]: cm_activity::TransitModel

pub mod error;
pub mod orchestrator;
pub mod settings;
pub mod transition;


pub use error::{DayError, DayResult};
pub use orchestrator::{DayOrchestrator, DayState, Step};
pub use settings::DaySettings;
pub use transition::{Transition, TransitionTable};
