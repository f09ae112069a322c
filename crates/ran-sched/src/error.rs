use ran_core::SimTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("invalid delay {0}: must be finite and >= 0")]
    InvalidDelay(f64),

    #[error("cannot schedule at {at}: clock is already at {now}")]
    InThePast { at: SimTime, now: SimTime },
}

pub type SchedResult<T> = Result<T, SchedError>;
