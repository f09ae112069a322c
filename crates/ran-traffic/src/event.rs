//! Events produced by the traffic generator.

use ran_core::{DeviceId, FlowId, PacketId, SimTime};

/// Scheduler payload owned by [`TrafficGenerator`][crate::TrafficGenerator].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficEvent {
    /// Emit the next packet of `flow`.
    Send { flow: FlowId },
}

/// One packet emitted by a send event, reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSent {
    pub flow:   FlowId,
    pub packet: PacketId,
    pub source: DeviceId,
    pub dest:   DeviceId,
    pub size:   u32,
    pub at:     SimTime,
}
