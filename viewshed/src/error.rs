use crate::JobState;
use opentopo::FetchError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewshedError {
    #[error("missing or invalid parameter '{0}'")]
    Builder(&'static str),

    #[error("{0}")]
    Input(String),

    #[error("calculation timed out after {0:?}")]
    Timeout(Duration),

    #[error("calculation cancelled")]
    Cancelled,

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("job cannot move from {from:?} to {to:?}")]
    Transition { from: JobState, to: JobState },
}
