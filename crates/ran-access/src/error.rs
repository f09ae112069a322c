use ran_core::{DeviceId, DeviceRole};
use ran_topology::TopologyError;
use thiserror::Error;

use crate::AttachState;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("device {device} is a {actual}, expected a {expected}")]
    RoleMismatch {
        device:   DeviceId,
        expected: DeviceRole,
        actual:   DeviceRole,
    },

    #[error("{operation} is invalid for {terminal} in state {state}")]
    InvalidState {
        terminal:  DeviceId,
        state:     AttachState,
        operation: &'static str,
    },

    #[error("terminal {0} is not connected")]
    NotConnected(DeviceId),

    #[error("terminal {0} already has the maximum number of bearers")]
    TooManyBearers(DeviceId),
}

pub type AccessResult<T> = Result<T, AccessError>;
