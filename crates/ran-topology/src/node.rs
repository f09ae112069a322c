//! Plain entity records stored by the [`Topology`][crate::Topology].

use ran_core::{DeviceId, DeviceRole, LinkAddress, NodeId};

/// A simulated host.  Owns an ordered list of devices.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    /// Devices in creation order.
    pub(crate) devices: Vec<DeviceId>,
}

impl Node {
    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }
}

/// A network interface attached to exactly one node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetDevice {
    pub id:      DeviceId,
    pub node:    NodeId,
    pub role:    DeviceRole,
    pub address: LinkAddress,
    /// Weak association to a peer device.  Only the attach state machine
    /// sets or clears it.
    pub(crate) peer: Option<DeviceId>,
}

impl NetDevice {
    #[inline]
    pub fn peer(&self) -> Option<DeviceId> {
        self.peer
    }

    #[inline]
    pub fn is_associated(&self) -> bool {
        self.peer.is_some()
    }
}
