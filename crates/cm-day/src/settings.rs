use serde::Deserialize;

use cm_activity::{ClassSettings, CommuteSettings, SmokeBreakSettings, SocialBreakSettings, TransitSettings};

use crate::transition::TransitionTable;
use crate::{DayError, DayResult};

/// Everything one agent template's day needs.
///
/// Every field has a default, so `[groups.day]` may be left almost empty in
/// a scenario file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaySettings {
    pub commute:          CommuteSettings,
    pub class:            ClassSettings,
    pub social_break:     SocialBreakSettings,
    pub smoke_break:      SmokeBreakSettings,
    pub transit:          TransitSettings,
    pub transitions:      TransitionTable,
    /// Retry delay for an agent whose route could not be found.
    pub stuck_retry_secs: f64,
}

impl Default for DaySettings {
    fn default() -> Self {
        Self {
            commute:          CommuteSettings::default(),
            class:            ClassSettings::default(),
            social_break:     SocialBreakSettings::default(),
            smoke_break:      SmokeBreakSettings::default(),
            transit:          TransitSettings::default(),
            transitions:      TransitionTable::default(),
            stuck_retry_secs: 60.0,
        }
    }
}

impl DaySettings {
    /// Checks that need no map.  Venue sources are checked when the
    /// orchestrator is built.
    pub fn validate(&self) -> DayResult<()> {
        self.commute.validate()?;
        self.class.validate()?;
        self.social_break.validate()?;
        self.smoke_break.validate()?;
        self.transit.validate()?;
        self.transitions.validate()?;
        if !(self.stuck_retry_secs.is_finite() && self.stuck_retry_secs > 0.0) {
            return Err(DayError::Config {
                what: "stuck_retry_secs",
                msg:  format!("{} must be positive", self.stuck_retry_secs),
            });
        }
        Ok(())
    }
}
