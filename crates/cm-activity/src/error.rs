use thiserror::Error;

use cm_core::CoreError;
use cm_rendezvous::RendezvousError;
use cm_spatial::SpatialError;

/// Errors raised while building activity models.  Stepping a built model
/// never fails; a missing route is reported as "no path" instead.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("{what}: {msg}")]
    Config { what: &'static str, msg: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Rendezvous(#[from] RendezvousError),
}

impl ActivityError {
    pub(crate) fn config(what: &'static str, msg: impl Into<String>) -> Self {
        ActivityError::Config { what, msg: msg.into() }
    }
}

pub type ActivityResult<T> = Result<T, ActivityError>;
