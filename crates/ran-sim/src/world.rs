//! `World`: every component the scheduler's events act on.

use ran_access::{AttachMachine, BearerManager};
use ran_core::SimConfig;
use ran_phy::PhyCache;
use ran_sched::Scheduler;
use ran_topology::Topology;
use ran_traffic::TrafficGenerator;
use tracing::trace;

use crate::{ControlEvent, NetEvent, SimObserver, SimResult};

/// Component state, kept apart from the scheduler so an event handler can
/// hold `&mut Scheduler` and `&mut World` at the same time.
///
/// Fields are public for read access from tests and observers; mutate
/// through [`Sim`][crate::Sim] so invariants hold.
#[derive(Debug)]
pub struct World {
    pub topology: Topology,
    pub attach:   AttachMachine,
    pub bearers:  BearerManager,
    pub phy:      PhyCache,
    pub traffic:  TrafficGenerator,
}

impl World {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            topology: Topology::new(),
            attach:   AttachMachine::new(config),
            bearers:  BearerManager::new(),
            phy:      PhyCache::new(),
            traffic:  TrafficGenerator::new(config.seed),
        }
    }

    /// Route one popped event to the component that owns it.
    pub(crate) fn dispatch<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<NetEvent>,
        event:    NetEvent,
        observer: &mut O,
    ) -> SimResult<()> {
        observer.on_event(sched.now(), &event);
        trace!(kind = event.kind(), time = %sched.now(), "dispatch");

        match event {
            NetEvent::Access(ev) => {
                let t = self.attach.on_event(ev, sched, &mut self.topology, &mut self.bearers)?;
                observer.on_attach_transition(&t);
            }
            NetEvent::Traffic(ev) => {
                if let Some(packet) = self.traffic.on_event(ev, sched, &self.bearers, &mut self.phy)? {
                    observer.on_packet(&packet);
                }
            }
            NetEvent::Control(ctrl) => self.control(sched, ctrl, observer)?,
        }
        Ok(())
    }

    fn control<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<NetEvent>,
        ctrl:     ControlEvent,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        match ctrl {
            ControlEvent::BeginAttach { terminal, base_station } => {
                let t = self.attach.begin_attach(sched, &self.topology, terminal, base_station)?;
                observer.on_attach_transition(&t);
            }
            ControlEvent::ActivateBearer { terminal, qos } => {
                self.bearers.activate(&self.attach, terminal, qos, now)?;
            }
            ControlEvent::DeactivateBearer(id) => {
                self.bearers.deactivate(id);
            }
            ControlEvent::StartTraffic(config) => {
                self.traffic.start_on_off(sched, &self.topology, &self.bearers, config)?;
            }
            ControlEvent::StopTraffic(flow) => {
                self.traffic.stop(sched, flow)?;
            }
            ControlEvent::Detach { terminal } => {
                let t = self.attach.detach(&mut self.topology, &mut self.bearers, terminal, now)?;
                observer.on_attach_transition(&t);
            }
            ControlEvent::Stop => sched.stop(),
        }
        Ok(())
    }

    /// Release all component state.
    pub fn clear(&mut self) {
        self.traffic.clear();
        self.bearers.clear();
        self.attach.clear();
        self.phy.clear();
        self.topology.clear();
    }
}
