//! The `Topology` registry.

use ran_core::{DeviceId, DeviceRole, LinkAddress, NodeId};

use crate::{NetDevice, Node, TopologyError, TopologyResult};

/// Owns every [`Node`] and [`NetDevice`] of a run.
///
/// Ids are dense indices handed out in creation order, so every lookup is an
/// O(1) `Vec` index.  Creation happens during setup; during the run only
/// associations change.
#[derive(Default, Debug)]
pub struct Topology {
    nodes:   Vec<Node>,
    devices: Vec<NetDevice>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Create an empty node.
    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, devices: Vec::new() });
        id
    }

    /// Create a device owned by `owner`.
    ///
    /// Link addresses are allocated sequentially from `00:00:00:00:00:01`.
    pub fn create_device(&mut self, owner: NodeId, role: DeviceRole) -> TopologyResult<DeviceId> {
        let id = DeviceId(self.devices.len() as u32);
        let node = self
            .nodes
            .get_mut(owner.index())
            .ok_or(TopologyError::UnknownNode(owner))?;
        node.devices.push(id);
        self.devices.push(NetDevice {
            id,
            node: owner,
            role,
            address: LinkAddress::from_index(id.0 as u64 + 1),
            peer: None,
        });
        Ok(id)
    }

    // ── Associations ──────────────────────────────────────────────────────

    /// Point `a`'s association at `b`.
    ///
    /// Re-associating with the current peer is a no-op.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::UnknownDevice`] if either id is invalid.
    /// - [`TopologyError::AlreadyAssociated`] if `a` has a different peer.
    pub fn associate(&mut self, a: DeviceId, b: DeviceId) -> TopologyResult<()> {
        self.device(b)?;
        let dev = self.device_mut(a)?;
        match dev.peer {
            Some(current) if current != b => Err(TopologyError::AlreadyAssociated {
                device: a,
                current,
            }),
            _ => {
                dev.peer = Some(b);
                Ok(())
            }
        }
    }

    /// Clear `a`'s association, returning the previous peer (if any).
    pub fn disassociate(&mut self, a: DeviceId) -> TopologyResult<Option<DeviceId>> {
        Ok(self.device_mut(a)?.peer.take())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> TopologyResult<&Node> {
        self.nodes.get(id.index()).ok_or(TopologyError::UnknownNode(id))
    }

    pub fn device(&self, id: DeviceId) -> TopologyResult<&NetDevice> {
        self.devices.get(id.index()).ok_or(TopologyError::UnknownDevice(id))
    }

    fn device_mut(&mut self, id: DeviceId) -> TopologyResult<&mut NetDevice> {
        self.devices.get_mut(id.index()).ok_or(TopologyError::UnknownDevice(id))
    }

    /// Devices owned by `node`, in creation order.
    pub fn devices_of(&self, node: NodeId) -> TopologyResult<&[DeviceId]> {
        Ok(self.node(node)?.devices())
    }

    /// Current peer of `device`.
    pub fn peer_of(&self, device: DeviceId) -> TopologyResult<Option<DeviceId>> {
        Ok(self.device(device)?.peer)
    }

    pub fn role_of(&self, device: DeviceId) -> TopologyResult<DeviceRole> {
        Ok(self.device(device)?.role)
    }

    /// Devices whose peer is `target`, in id order.
    ///
    /// For a base station this is the set of terminals currently attached to
    /// it.  O(device_count).
    pub fn associated_with(&self, target: DeviceId) -> Vec<DeviceId> {
        self.devices
            .iter()
            .filter(|d| d.peer == Some(target))
            .map(|d| d.id)
            .collect()
    }

    /// All devices with `role`, in id order.
    pub fn devices_with_role(&self, role: DeviceRole) -> impl Iterator<Item = &NetDevice> + '_ {
        self.devices.iter().filter(move |d| d.role == role)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn devices(&self) -> &[NetDevice] {
        &self.devices
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Release every node and device.  Ids handed out earlier become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.devices.clear();
    }
}
