use ran_core::{DeviceId, FlowId};
use ran_sched::SchedError;
use ran_topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("source {0} has no active bearer")]
    NoBearer(DeviceId),

    #[error("unknown traffic flow {0}")]
    UnknownFlow(FlowId),

    #[error("invalid on/off duration: {0}s")]
    InvalidDelay(f64),

    #[error("empty uniform range: min {min}s exceeds max {max}s")]
    InvalidRange { min: f64, max: f64 },

    #[error("on + off period rounds to zero nanoseconds")]
    EmptyPeriod,

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Sched(#[from] SchedError),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
