//! The `ActivityModel` trait, the seam between activities and the day
//! orchestrator.

use cm_core::{AgentRng, Coord, Path};

use crate::MoveContext;
use crate::phase::Phase;

/// One agent's movement while performing (or travelling to) an activity.
///
/// The caller drives a model by alternating two calls:
///
/// 1. [`next_path`](Self::next_path): the movement to perform now, or
///    `None` if the agent should stay put.
/// 2. [`generate_wait_time`](Self::generate_wait_time): how long to pause
///    after that movement before calling `next_path` again.
///
/// Nothing blocks.  A model that is waiting on something (a group to fill,
/// an engagement to end) returns `None` and a wait, and is polled again.
pub trait ActivityModel: Send {
    fn next_path(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> Option<Path>;

    /// Seconds to wait after the path last returned by `next_path`.
    /// `f64::INFINITY` means "never poll again".
    fn generate_wait_time(&mut self, ctx: &MoveContext<'_>, rng: &mut AgentRng) -> f64;

    /// `true` once the activity is complete and control may move on.
    fn is_ready(&self) -> bool;

    /// Where the agent will be once its current movement ends.
    fn last_location(&self) -> Coord;

    /// Place the agent at `at` and restart the activity: back to
    /// [`Phase::Traveling`], not ready.
    fn set_location(&mut self, at: Coord);

    fn phase(&self) -> Phase;

    /// Where this activity takes place for this agent.
    fn activity_location(&self) -> Coord;
}
