//! `TrafficGenerator`: owns every flow and runs their send chains.

use std::fmt;

use ran_access::BearerManager;
use ran_core::{DeviceId, FlowId, PacketId, SimRng, SimTime};
use ran_phy::{Direction, PhyCache};
use ran_sched::{EventHandle, Scheduler};
use ran_topology::Topology;
use tracing::{debug, warn};

use crate::{OnOffConfig, PacketSent, TrafficError, TrafficEvent, TrafficResult};

/// Shortest gap between two sends of one flow.  A uniform draw can still
/// round to zero even when the configured maximum does not.
const MIN_PERIOD: SimTime = SimTime::from_nanos(1);

// ── Flow bookkeeping ──────────────────────────────────────────────────────────

/// Lifecycle of one flow.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowState {
    /// A send is pending on the scheduler.
    Running,
    /// The next send would have fallen at or after `stop`.
    Finished,
    /// Ended by [`TrafficGenerator::stop`].
    Stopped,
    /// The source lost its last bearer.
    Halted,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowState::Running  => "running",
            FlowState::Finished => "finished",
            FlowState::Stopped  => "stopped",
            FlowState::Halted   => "halted",
        })
    }
}

/// Per-flow counters.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FlowStats {
    pub flow:      FlowId,
    pub source:    DeviceId,
    pub dest:      DeviceId,
    pub state:     FlowState,
    /// Packets sent so far.
    pub sent:      u64,
    pub bytes:     u64,
    pub last_send: Option<SimTime>,
}

#[derive(Debug)]
struct Flow {
    config:    OnOffConfig,
    rng:       SimRng,
    state:     FlowState,
    pending:   Option<EventHandle>,
    sent:      u64,
    bytes:     u64,
    last_send: Option<SimTime>,
}

// ── TrafficGenerator ──────────────────────────────────────────────────────────

/// Starts on/off flows and executes their [`TrafficEvent::Send`] events.
///
/// Flow ids are dense from zero.  Packet ids are unique across all flows for
/// the lifetime of the generator.
#[derive(Debug)]
pub struct TrafficGenerator {
    flows:       Vec<Flow>,
    next_packet: u64,
    /// Root stream; each flow draws from its own child.
    rng:         SimRng,
}

impl TrafficGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            flows:       Vec::new(),
            next_packet: 0,
            rng:         SimRng::new(seed),
        }
    }

    /// Start an on/off flow described by `config`.
    ///
    /// The first send happens at `config.start`, or immediately if that time
    /// has already passed.  A flow whose first send would fall at or after
    /// `config.stop` is created already `Finished`.
    ///
    /// # Errors
    ///
    /// - [`TrafficError::Topology`] if either device is unknown.
    /// - Any validation error from [`OnOffConfig::validate`].
    /// - [`TrafficError::NoBearer`] if the source holds no active bearer.
    pub fn start_on_off<E: From<TrafficEvent>>(
        &mut self,
        sched:    &mut Scheduler<E>,
        topology: &Topology,
        bearers:  &BearerManager,
        config:   OnOffConfig,
    ) -> TrafficResult<FlowId> {
        topology.device(config.source)?;
        topology.device(config.dest)?;
        config.validate()?;
        if !bearers.has_bearer(config.source) {
            return Err(TrafficError::NoBearer(config.source));
        }

        let id = FlowId(self.flows.len() as u32);
        let first = config.start.max(sched.now());
        let (state, pending) = if first < config.stop {
            let handle = sched.schedule_at(first, E::from(TrafficEvent::Send { flow: id }))?;
            (FlowState::Running, Some(handle))
        } else {
            (FlowState::Finished, None)
        };

        debug!(
            flow = %id,
            source = %config.source,
            dest = %config.dest,
            first = %first,
            stop = %config.stop,
            %state,
            "on/off flow started"
        );
        self.flows.push(Flow {
            config,
            rng: self.rng.child(u64::from(id.0)),
            state,
            pending,
            sent: 0,
            bytes: 0,
            last_send: None,
        });
        Ok(id)
    }

    /// Execute a popped [`TrafficEvent`].
    ///
    /// Returns the packet that was logged, or `None` if the flow had already
    /// ended or was halted by this event.
    ///
    /// # Errors
    ///
    /// [`TrafficError::UnknownFlow`] for an id this generator never issued.
    pub fn on_event<E: From<TrafficEvent>>(
        &mut self,
        event:   TrafficEvent,
        sched:   &mut Scheduler<E>,
        bearers: &BearerManager,
        phy:     &mut PhyCache,
    ) -> TrafficResult<Option<PacketSent>> {
        let TrafficEvent::Send { flow: id } = event;
        let now = sched.now();
        let flow = self.flows.get_mut(id.index()).ok_or(TrafficError::UnknownFlow(id))?;
        if flow.state != FlowState::Running {
            return Ok(None);
        }
        flow.pending = None;

        let OnOffConfig { source, dest, packet_size, .. } = flow.config;
        if !bearers.has_bearer(source) {
            flow.state = FlowState::Halted;
            warn!(flow = %id, %source, time = %now, sent = flow.sent, "source lost its bearer, flow halted");
            return Ok(None);
        }

        let packet = PacketId(self.next_packet);
        self.next_packet += 1;
        phy.record(source, packet, packet_size, Direction::Tx, now);
        phy.record(dest, packet, packet_size, Direction::Rx, now);
        flow.sent += 1;
        flow.bytes += u64::from(packet_size);
        flow.last_send = Some(now);

        let on = flow.config.on.sample(&mut flow.rng)?;
        let off = flow.config.off.sample(&mut flow.rng)?;
        let period = (on + off).max(MIN_PERIOD);
        if now + period < flow.config.stop {
            flow.pending = Some(sched.schedule_in(period, E::from(TrafficEvent::Send { flow: id })));
        } else {
            flow.state = FlowState::Finished;
            debug!(flow = %id, sent = flow.sent, time = %now, "flow finished");
        }

        Ok(Some(PacketSent { flow: id, packet, source, dest, size: packet_size, at: now }))
    }

    /// End `flow`, canceling its pending send.
    ///
    /// Returns `true` if the flow was running.  Stopping a flow that already
    /// ended is a no-op.
    pub fn stop<E>(&mut self, sched: &mut Scheduler<E>, flow: FlowId) -> TrafficResult<bool> {
        let entry = self.flows.get_mut(flow.index()).ok_or(TrafficError::UnknownFlow(flow))?;
        if entry.state != FlowState::Running {
            return Ok(false);
        }
        if let Some(handle) = entry.pending.take() {
            sched.cancel(handle);
        }
        entry.state = FlowState::Stopped;
        debug!(%flow, sent = entry.sent, time = %sched.now(), "flow stopped");
        Ok(true)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn stats(&self, flow: FlowId) -> Option<FlowStats> {
        self.flows.get(flow.index()).map(|f| stats_of(flow, f))
    }

    /// Counters for every flow, in id order.
    pub fn all_stats(&self) -> Vec<FlowStats> {
        self.flows
            .iter()
            .enumerate()
            .map(|(i, f)| stats_of(FlowId(i as u32), f))
            .collect()
    }

    /// Flows still waiting on a send.
    pub fn active(&self) -> usize {
        self.flows.iter().filter(|f| f.state == FlowState::Running).count()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Packets sent across every flow.
    pub fn packets_sent(&self) -> u64 {
        self.next_packet
    }

    /// Forget every flow.  Pending sends are owned by the scheduler and must
    /// be cleared there.
    pub fn clear(&mut self) {
        self.flows.clear();
    }
}

fn stats_of(id: FlowId, flow: &Flow) -> FlowStats {
    FlowStats {
        flow:      id,
        source:    flow.config.source,
        dest:      flow.config.dest,
        state:     flow.state,
        sent:      flow.sent,
        bytes:     flow.bytes,
        last_send: flow.last_send,
    }
}
