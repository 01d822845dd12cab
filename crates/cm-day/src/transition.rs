//! Which activity follows which.

use serde::Deserialize;

use cm_activity::ActivityKind;
use cm_core::AgentRng;

use crate::{DayError, DayResult};

/// One candidate successor and the probability threshold it fires with.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transition {
    pub to: ActivityKind,
    pub p:  f64,
}

impl Transition {
    pub const fn new(to: ActivityKind, p: f64) -> Self {
        Self { to, p }
    }
}

/// Transition rows, one per activity, in priority order.
///
/// [`choose`](Self::choose) walks the row of the finished activity and
/// takes the first candidate whose own uniform draw falls below `p`.  When
/// none fires the agent goes to `fallback`.
///
/// ```toml
/// [transitions]
/// class    = [{ to = "social_break", p = 0.4 }, { to = "commute", p = 0.3 }]
/// fallback = "commute"
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionTable {
    pub commute:      Vec<Transition>,
    pub class:        Vec<Transition>,
    pub social_break: Vec<Transition>,
    pub smoke_break:  Vec<Transition>,
    pub fallback:     ActivityKind,
}

impl Default for TransitionTable {
    fn default() -> Self {
        use ActivityKind::*;
        Self {
            commute:      vec![Transition::new(Class, 0.8), Transition::new(SocialBreak, 0.5)],
            class:        vec![
                Transition::new(SocialBreak, 0.4),
                Transition::new(SmokeBreak, 0.2),
                Transition::new(Commute, 0.3),
            ],
            social_break: vec![
                Transition::new(Class, 0.6),
                Transition::new(SmokeBreak, 0.2),
                Transition::new(Commute, 0.5),
            ],
            smoke_break:  vec![
                Transition::new(Class, 0.6),
                Transition::new(SocialBreak, 0.3),
                Transition::new(Commute, 0.5),
            ],
            fallback:     Commute,
        }
    }
}

impl TransitionTable {
    /// A table where every row is empty: every activity is followed by
    /// `fallback`.
    pub fn always(fallback: ActivityKind) -> Self {
        Self {
            commute: Vec::new(),
            class: Vec::new(),
            social_break: Vec::new(),
            smoke_break: Vec::new(),
            fallback,
        }
    }

    pub fn row(&self, from: ActivityKind) -> &[Transition] {
        match from {
            ActivityKind::Commute     => &self.commute,
            ActivityKind::Class       => &self.class,
            ActivityKind::SocialBreak => &self.social_break,
            ActivityKind::SmokeBreak  => &self.smoke_break,
        }
    }

    pub fn choose(&self, from: ActivityKind, rng: &mut AgentRng) -> ActivityKind {
        self.row(from)
            .iter()
            .find(|t| rng.fires(t.p))
            .map_or(self.fallback, |t| t.to)
    }

    pub fn validate(&self) -> DayResult<()> {
        for kind in ActivityKind::ALL {
            for t in self.row(kind) {
                if !(0.0..=1.0).contains(&t.p) {
                    return Err(DayError::Config {
                        what: "transitions",
                        msg:  format!("{kind} -> {}: probability {} is outside [0, 1]", t.to, t.p),
                    });
                }
            }
        }
        Ok(())
    }
}
