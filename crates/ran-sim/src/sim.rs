//! The `Sim` struct: scheduler, world, and the setup / run / teardown API.

use ran_access::{AttachState, QosClass, Transition};
use ran_core::{BearerId, DeviceId, DeviceRole, FlowId, NodeId, SimConfig, SimTime};
use ran_phy::{CacheDump, CacheEntry};
use ran_sched::{EventHandle, RunStats, Scheduler};
use ran_traffic::{FlowStats, OnOffConfig};
use tracing::info;

use crate::{ControlEvent, NetEvent, SimObserver, SimResult, World};

/// Totals reported by [`Sim::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSummary {
    pub final_time:      SimTime,
    pub events_executed: u64,
    pub events_dropped:  usize,
    pub devices:         usize,
    pub flows:           usize,
    pub packets_sent:    u64,
}

/// The simulation runner.
///
/// Lifecycle:
///
/// 1. **Setup**: [`Sim::new`], then create nodes and devices, begin attach
///    procedures, and script later actions with
///    [`schedule_control_at`][Sim::schedule_control_at].
/// 2. **Run**: [`Sim::run`] (to `config.stop_time`) or
///    [`Sim::run_until`].  A later call resumes from the events left queued.
/// 3. **Inspect**: [`Sim::snapshot`], [`Sim::dump`], and the query methods.
/// 4. **Teardown**: [`Sim::destroy`] releases everything and reports totals.
///
/// Setup calls that need a connected terminal (bearers, traffic) cannot
/// succeed before the first run, since attach completes in virtual time.
/// Script them as [`ControlEvent`]s or enable a default bearer.
#[derive(Debug)]
pub struct Sim {
    pub config: SimConfig,

    /// The event queue and virtual clock.
    pub scheduler: Scheduler<NetEvent>,

    pub world: World,
}

impl Sim {
    /// # Errors
    ///
    /// Returns [`SimError::Core`][crate::SimError::Core] if `config` fails
    /// validation.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let world = World::new(&config);
        Ok(Self { config, scheduler: Scheduler::new(), world })
    }

    /// Activate a bearer of class `qos` on every terminal as it connects.
    pub fn with_default_bearer(mut self, qos: Option<QosClass>) -> Self {
        self.world.attach.set_default_bearer(qos);
        self
    }

    // ── Topology ──────────────────────────────────────────────────────────

    pub fn create_node(&mut self) -> NodeId {
        self.world.topology.create_node()
    }

    pub fn create_device(&mut self, node: NodeId, role: DeviceRole) -> SimResult<DeviceId> {
        Ok(self.world.topology.create_device(node, role)?)
    }

    /// Create a node holding a single device of `role`.
    pub fn create_station(&mut self, role: DeviceRole) -> SimResult<DeviceId> {
        let node = self.create_node();
        self.create_device(node, role)
    }

    /// Terminal devices, in id order.
    pub fn terminals(&self) -> Vec<DeviceId> {
        self.devices_with_role(DeviceRole::Terminal)
    }

    /// Base-station devices, in id order.
    pub fn base_stations(&self) -> Vec<DeviceId> {
        self.devices_with_role(DeviceRole::BaseStation)
    }

    fn devices_with_role(&self, role: DeviceRole) -> Vec<DeviceId> {
        self.world.topology.devices_with_role(role).map(|d| d.id).collect()
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn begin_attach(&mut self, terminal: DeviceId, base_station: DeviceId) -> SimResult<Transition> {
        let World { topology, attach, .. } = &mut self.world;
        Ok(attach.begin_attach(&mut self.scheduler, topology, terminal, base_station)?)
    }

    pub fn detach(&mut self, terminal: DeviceId) -> SimResult<Transition> {
        let now = self.now();
        let World { topology, attach, bearers, .. } = &mut self.world;
        Ok(attach.detach(topology, bearers, terminal, now)?)
    }

    pub fn attach_state(&self, terminal: DeviceId) -> AttachState {
        self.world.attach.state(terminal)
    }

    pub fn activate_bearer(&mut self, terminal: DeviceId, qos: QosClass) -> SimResult<BearerId> {
        let now = self.now();
        let World { attach, bearers, .. } = &mut self.world;
        Ok(bearers.activate(attach, terminal, qos, now)?)
    }

    /// Idempotent; returns `false` if `bearer` was not active.
    pub fn deactivate_bearer(&mut self, bearer: BearerId) -> bool {
        self.world.bearers.deactivate(bearer).is_some()
    }

    pub fn bearers_of(&self, terminal: DeviceId) -> Vec<BearerId> {
        self.world.bearers.bearers_of(terminal)
    }

    // ── Traffic ───────────────────────────────────────────────────────────

    pub fn start_on_off_traffic(&mut self, config: OnOffConfig) -> SimResult<FlowId> {
        let World { topology, bearers, traffic, .. } = &mut self.world;
        Ok(traffic.start_on_off(&mut self.scheduler, topology, bearers, config)?)
    }

    pub fn stop_traffic(&mut self, flow: FlowId) -> SimResult<bool> {
        Ok(self.world.traffic.stop(&mut self.scheduler, flow)?)
    }

    pub fn flow_stats(&self, flow: FlowId) -> Option<FlowStats> {
        self.world.traffic.stats(flow)
    }

    // ── PHY cache ─────────────────────────────────────────────────────────

    pub fn snapshot(&self, device: DeviceId) -> &[CacheEntry] {
        self.world.phy.snapshot(device)
    }

    pub fn dump(&self, device: DeviceId) -> CacheDump<'_> {
        self.world.phy.dump(device)
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Run `action` `delay_secs` seconds from now.
    pub fn schedule_control(&mut self, delay_secs: f64, action: ControlEvent) -> SimResult<EventHandle> {
        Ok(self.scheduler.schedule(delay_secs, NetEvent::Control(action))?)
    }

    /// Run `action` at absolute time `at`.
    pub fn schedule_control_at(&mut self, at: SimTime, action: ControlEvent) -> SimResult<EventHandle> {
        Ok(self.scheduler.schedule_at(at, NetEvent::Control(action))?)
    }

    /// Returns `true` if the event was still pending.
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        self.scheduler.cancel(handle).is_some()
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Run until `config.stop_time`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunStats> {
        self.run_until(self.config.stop_time, observer)
    }

    /// Execute events up to and including `stop_time`.
    ///
    /// # Errors
    ///
    /// The first component error ends the run.  Events already executed keep
    /// their effects, and the rest stay queued.
    pub fn run_until<O: SimObserver>(&mut self, stop_time: SimTime, observer: &mut O) -> SimResult<RunStats> {
        info!(
            now = %self.scheduler.now(),
            stop_time = %stop_time,
            pending = self.scheduler.pending(),
            "run started"
        );

        let Sim { scheduler, world, .. } = self;
        let stats = scheduler.run(stop_time, |sched, event| world.dispatch(sched, event, &mut *observer))?;

        observer.on_run_end(&stats);
        info!(
            executed = stats.executed,
            last_time = %stats.last_time,
            stopped_early = stats.stopped_early,
            packets = self.world.traffic.packets_sent(),
            "run complete"
        );
        Ok(stats)
    }

    /// Tear the simulation down: drop pending events, release every
    /// registry, and report totals.
    pub fn destroy(mut self) -> SimSummary {
        let summary = SimSummary {
            final_time:      self.scheduler.now(),
            events_executed: self.scheduler.executed(),
            events_dropped:  self.scheduler.pending(),
            devices:         self.world.topology.device_count(),
            flows:           self.world.traffic.len(),
            packets_sent:    self.world.traffic.packets_sent(),
        };
        self.scheduler.clear();
        self.world.clear();
        info!(?summary, "simulation destroyed");
        summary
    }
}
