//! The scheduler payload and scripted control actions.

use ran_access::{AccessEvent, QosClass};
use ran_core::{BearerId, DeviceId, FlowId};
use ran_traffic::{OnOffConfig, TrafficEvent};

/// Every event the simulation scheduler carries.
#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    Access(AccessEvent),
    Traffic(TrafficEvent),
    Control(ControlEvent),
}

impl NetEvent {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NetEvent::Access(AccessEvent::DiscoveryComplete { .. }) => "discovery-complete",
            NetEvent::Access(AccessEvent::AttachComplete { .. })    => "attach-complete",
            NetEvent::Traffic(TrafficEvent::Send { .. })            => "traffic-send",
            NetEvent::Control(_)                                    => "control",
        }
    }
}

impl From<AccessEvent> for NetEvent {
    fn from(ev: AccessEvent) -> Self {
        NetEvent::Access(ev)
    }
}

impl From<TrafficEvent> for NetEvent {
    fn from(ev: TrafficEvent) -> Self {
        NetEvent::Traffic(ev)
    }
}

impl From<ControlEvent> for NetEvent {
    fn from(ev: ControlEvent) -> Self {
        NetEvent::Control(ev)
    }
}

/// A setup call deferred to a scripted virtual time.
///
/// Lets a scenario attach terminals, provision bearers, and start or stop
/// flows mid-run.  A control action that fails ends the run with its error.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    BeginAttach {
        terminal:     DeviceId,
        base_station: DeviceId,
    },
    ActivateBearer {
        terminal: DeviceId,
        qos:      QosClass,
    },
    DeactivateBearer(BearerId),
    StartTraffic(OnOffConfig),
    StopTraffic(FlowId),
    Detach { terminal: DeviceId },
    /// End the current `run` call once this event completes.
    Stop,
}
