//! Timer events owned by the attach state machine.

use ran_core::DeviceId;

/// A procedure timer expiring for one terminal.
///
/// Produced by [`AttachMachine`][crate::AttachMachine] and handed back to
/// [`AttachMachine::on_event`][crate::AttachMachine::on_event] by the
/// orchestrator when the scheduler pops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessEvent {
    /// The terminal finished discovering `base_station`.
    DiscoveryComplete {
        terminal:     DeviceId,
        base_station: DeviceId,
    },

    /// The terminal finished attaching to the base station found in discovery.
    AttachComplete { terminal: DeviceId },
}

impl AccessEvent {
    pub fn terminal(&self) -> DeviceId {
        match *self {
            AccessEvent::DiscoveryComplete { terminal, .. } => terminal,
            AccessEvent::AttachComplete { terminal }        => terminal,
        }
    }
}
