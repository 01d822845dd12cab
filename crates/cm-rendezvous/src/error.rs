use thiserror::Error;

use cm_core::SystemId;

#[derive(Debug, Error, PartialEq)]
pub enum RendezvousError {
    #[error("{0} has no venues")]
    NoVenues(SystemId),

    #[error("invalid group size {min}..={max} (need 1 <= min <= max)")]
    GroupSize { min: usize, max: usize },

    #[error("{0} is already registered with a different venue list")]
    VenueMismatch(SystemId),
}

pub type RendezvousResult<T> = Result<T, RendezvousError>;
