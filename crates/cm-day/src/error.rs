use thiserror::Error;

use cm_activity::ActivityError;

#[derive(Debug, Error)]
pub enum DayError {
    #[error("{what}: {msg}")]
    Config { what: &'static str, msg: String },

    #[error(transparent)]
    Activity(#[from] ActivityError),
}

pub type DayResult<T> = Result<T, DayError>;
