use ran_core::{DeviceId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("device {0} not found")]
    UnknownDevice(DeviceId),

    #[error("node {0} not found")]
    UnknownNode(NodeId),

    #[error("device {device} is already associated with {current}")]
    AlreadyAssociated {
        device:  DeviceId,
        current: DeviceId,
    },
}

pub type TopologyResult<T> = Result<T, TopologyError>;
