//! Simulation observer trait for progress reporting and data collection.

use ran_access::Transition;
use ran_core::SimTime;
use ran_sched::RunStats;
use ran_traffic::PacketSent;
use tracing::{debug, info};

use crate::NetEvent;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] while events execute.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: packet counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct PacketCounter(u64);
///
/// impl SimObserver for PacketCounter {
///     fn on_packet(&mut self, _packet: &PacketSent) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before each event is dispatched.
    fn on_event(&mut self, _now: SimTime, _event: &NetEvent) {}

    /// Called after a terminal changes attach state during the run.
    fn on_attach_transition(&mut self, _transition: &Transition) {}

    /// Called for every packet a flow emits.
    fn on_packet(&mut self, _packet: &PacketSent) {}

    /// Called once when a `run` call returns without error.
    fn on_run_end(&mut self, _stats: &RunStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs attach transitions and run completion at `info`, packets at `debug`.
#[derive(Debug, Default)]
pub struct TracingObserver {
    packets: u64,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets seen so far.
    pub fn packets(&self) -> u64 {
        self.packets
    }
}

impl SimObserver for TracingObserver {
    fn on_attach_transition(&mut self, t: &Transition) {
        info!(terminal = %t.terminal, from = %t.from, to = %t.to, time = %t.at, "attach");
    }

    fn on_packet(&mut self, p: &PacketSent) {
        self.packets += 1;
        debug!(
            flow = %p.flow,
            packet = %p.packet,
            source = %p.source,
            dest = %p.dest,
            size = p.size,
            time = %p.at,
            "packet"
        );
    }

    fn on_run_end(&mut self, stats: &RunStats) {
        info!(
            executed = stats.executed,
            last_time = %stats.last_time,
            packets = self.packets,
            "run finished"
        );
    }
}
