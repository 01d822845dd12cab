//! Travel → engage bookkeeping shared by the activity models.

use cm_core::Coord;

/// Which half of an activity the agent is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Heading for the activity location.
    Traveling,
    /// At the activity location until its engagement ends.
    Engaged,
}

/// State of one two-phase activity.
///
/// ```text
///            arrive()                 engage() past deadline
/// Traveling ─────────► Engaged ──────────────────────────► Engaged + ready
///     ▲                                                          │
///     └──────────────────────── reset(at) ───────────────────────┘
/// ```
///
/// The engagement clock starts on the first `engage` call after arrival, not
/// at departure, so time spent walking does not eat into the activity.
#[derive(Clone, Debug)]
pub struct TwoPhase {
    phase:      Phase,
    last:       Coord,
    started_at: Option<f64>,
    deadline:   f64,
    ready:      bool,
}

impl TwoPhase {
    pub fn new(at: Coord) -> Self {
        Self {
            phase:      Phase::Traveling,
            last:       at,
            started_at: None,
            deadline:   0.0,
            ready:      false,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn last_location(&self) -> Coord {
        self.last
    }

    /// Travel leg issued: the agent will end up at `at`.
    pub fn arrive(&mut self, at: Coord) {
        self.last = at;
        self.phase = Phase::Engaged;
        self.started_at = None;
    }

    /// Record the engagement start on the first call, drawing its length from
    /// `duration`; then report whether the engagement is over (and mark the
    /// activity ready if so).
    pub fn engage(&mut self, now: f64, duration: impl FnOnce(f64) -> f64) -> bool {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.deadline = now + duration(now).max(0.0);
        }
        if now >= self.deadline {
            self.ready = true;
        }
        self.ready
    }

    /// Mark the activity complete without a deadline.
    pub fn finish(&mut self) {
        self.phase = Phase::Engaged;
        self.ready = true;
    }

    /// Seconds until the engagement ends; zero if not engaged or already over.
    pub fn remaining(&self, now: f64) -> f64 {
        match (self.phase, self.started_at) {
            (Phase::Engaged, Some(_)) if !self.ready => (self.deadline - now).max(0.0),
            _ => 0.0,
        }
    }

    /// Move the agent to `at` without changing phase (a group leg, a jitter).
    pub fn relocate(&mut self, at: Coord) {
        self.last = at;
    }

    /// Restart the activity from `at`.
    pub fn reset(&mut self, at: Coord) {
        *self = TwoPhase::new(at);
    }
}
