//! Unit tests for ran-access.

use ran_core::{DeviceId, DeviceRole, SimConfig, SimTime};
use ran_sched::Scheduler;
use ran_topology::Topology;

use crate::{
    AccessError, AccessEvent, AccessResult, AttachMachine, AttachState, BearerManager, QosClass,
    Transition, MAX_BEARERS_PER_TERMINAL,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One-second discovery and attach timers.
fn test_config() -> SimConfig {
    SimConfig {
        seed:            42,
        discovery_delay: SimTime::from_secs(1),
        attach_delay:    SimTime::from_secs(1),
        stop_time:       SimTime::from_secs(10),
    }
}

struct Cell {
    sched:    Scheduler<AccessEvent>,
    topology: Topology,
    attach:   AttachMachine,
    bearers:  BearerManager,
    bs:       DeviceId,
    t1:       DeviceId,
    t2:       DeviceId,
}

impl Cell {
    fn new() -> Self {
        Self::with_machine(AttachMachine::new(&test_config()))
    }

    fn with_machine(attach: AttachMachine) -> Self {
        let mut topology = Topology::new();
        let n0 = topology.create_node();
        let bs = topology.create_device(n0, DeviceRole::BaseStation).unwrap();
        let n1 = topology.create_node();
        let t1 = topology.create_device(n1, DeviceRole::Terminal).unwrap();
        let n2 = topology.create_node();
        let t2 = topology.create_device(n2, DeviceRole::Terminal).unwrap();
        Self {
            sched: Scheduler::new(),
            topology,
            attach,
            bearers: BearerManager::new(),
            bs,
            t1,
            t2,
        }
    }

    fn begin(&mut self, terminal: DeviceId) -> AccessResult<Transition> {
        self.attach.begin_attach(&mut self.sched, &self.topology, terminal, self.bs)
    }

    /// Run the scheduler to `stop_secs`, feeding every event to the machine.
    fn run_to(&mut self, stop_secs: u64) -> Vec<Transition> {
        let Cell { sched, topology, attach, bearers, .. } = self;
        let mut log = Vec::new();
        sched
            .run(SimTime::from_secs(stop_secs), |s, ev| {
                log.push(attach.on_event(ev, s, topology, bearers)?);
                Ok::<_, AccessError>(())
            })
            .unwrap();
        log
    }

    fn activate(&mut self, terminal: DeviceId, qos: QosClass) -> AccessResult<ran_core::BearerId> {
        let now = self.sched.now();
        self.bearers.activate(&self.attach, terminal, qos, now)
    }

    fn detach(&mut self, terminal: DeviceId) -> AccessResult<Transition> {
        let now = self.sched.now();
        self.attach.detach(&mut self.topology, &mut self.bearers, terminal, now)
    }
}

// ── Attach procedure ──────────────────────────────────────────────────────────

#[cfg(test)]
mod attach {
    use super::*;

    #[test]
    fn terminals_start_idle() {
        let cell = Cell::new();
        assert_eq!(cell.attach.state(cell.t1), AttachState::Idle);
        assert_eq!(cell.attach.serving_cell(cell.t1), None);
    }

    #[test]
    fn full_procedure_reaches_connected_at_two_seconds() {
        let mut cell = Cell::new();
        let t = cell.begin(cell.t1).unwrap();
        assert_eq!((t.from, t.to), (AttachState::Idle, AttachState::Discovering));
        assert_eq!(cell.attach.pending_timer(cell.t1).map(|h| h.time()), Some(SimTime::from_secs(1)));

        let log = cell.run_to(10);
        let states: Vec<_> = log.iter().map(|t| (t.to, t.at)).collect();
        assert_eq!(
            states,
            vec![
                (AttachState::Attaching, SimTime::from_secs(1)),
                (AttachState::Connected, SimTime::from_secs(2)),
            ]
        );
        assert!(cell.attach.is_connected(cell.t1));
        assert_eq!(cell.attach.connected_since(cell.t1), Some(SimTime::from_secs(2)));
        assert_eq!(cell.attach.pending_timer(cell.t1), None);
    }

    #[test]
    fn discovery_associates_with_base_station() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(1);
        assert_eq!(cell.attach.state(cell.t1), AttachState::Attaching);
        assert_eq!(cell.topology.peer_of(cell.t1).unwrap(), Some(cell.bs));
        assert_eq!(cell.attach.serving_cell(cell.t1), Some(cell.bs));
    }

    #[test]
    fn two_terminals_connect_together() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.begin(cell.t2).unwrap();
        cell.run_to(10);
        assert_eq!(cell.attach.terminals_in(AttachState::Connected), vec![cell.t1, cell.t2]);
        assert_eq!(cell.topology.associated_with(cell.bs), vec![cell.t1, cell.t2]);
        assert_eq!(cell.sched.now(), SimTime::from_secs(2));
    }

    #[test]
    fn begin_attach_twice_is_invalid() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        let err = cell.begin(cell.t1).unwrap_err();
        assert!(matches!(
            err,
            AccessError::InvalidState { state: AttachState::Discovering, .. }
        ));
        assert_eq!(cell.sched.pending(), 1, "no second discovery timer");
    }

    #[test]
    fn begin_attach_while_connected_is_invalid() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        assert!(matches!(cell.begin(cell.t1), Err(AccessError::InvalidState { .. })));
    }

    #[test]
    fn roles_are_checked() {
        let mut cell = Cell::new();
        let (bs, t1, t2) = (cell.bs, cell.t1, cell.t2);
        let err = cell.attach.begin_attach(&mut cell.sched, &cell.topology, bs, bs).unwrap_err();
        assert!(matches!(err, AccessError::RoleMismatch { expected: DeviceRole::Terminal, .. }));
        let err = cell.attach.begin_attach(&mut cell.sched, &cell.topology, t1, t2).unwrap_err();
        assert!(matches!(err, AccessError::RoleMismatch { expected: DeviceRole::BaseStation, .. }));
        assert!(cell.sched.is_empty());
    }

    #[test]
    fn unknown_device_is_reported() {
        let mut cell = Cell::new();
        let err = cell.begin(DeviceId(77)).unwrap_err();
        assert!(matches!(err, AccessError::Topology(_)));
    }

    #[test]
    fn stale_timer_is_rejected() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let Cell { sched, topology, attach, bearers, t1, .. } = &mut cell;
        let err = attach
            .on_event(AccessEvent::AttachComplete { terminal: *t1 }, sched, topology, bearers)
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidState { state: AttachState::Connected, .. }));
    }
}

// ── Detach ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod detach {
    use super::*;

    #[test]
    fn detach_returns_to_idle_and_clears_association() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let t = cell.detach(cell.t1).unwrap();
        assert_eq!((t.from, t.to), (AttachState::Connected, AttachState::Idle));
        assert_eq!(cell.topology.peer_of(cell.t1).unwrap(), None);
        assert_eq!(cell.attach.connected_since(cell.t1), None);
    }

    #[test]
    fn detach_requires_connected() {
        let mut cell = Cell::new();
        assert!(matches!(cell.detach(cell.t1), Err(AccessError::InvalidState { .. })));
        cell.begin(cell.t1).unwrap();
        cell.run_to(1); // Attaching
        assert!(matches!(
            cell.detach(cell.t1),
            Err(AccessError::InvalidState { state: AttachState::Attaching, .. })
        ));
    }

    #[test]
    fn detach_cascades_to_bearers() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.begin(cell.t2).unwrap();
        cell.run_to(10);
        cell.activate(cell.t1, QosClass::ConversationalVoice).unwrap();
        cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        let other = cell.activate(cell.t2, QosClass::BestEffort).unwrap();

        cell.detach(cell.t1).unwrap();
        assert!(cell.bearers.bearers_of(cell.t1).is_empty());
        assert_eq!(cell.bearers.bearers_of(cell.t2), vec![other]);
    }

    #[test]
    fn reattach_after_detach() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        cell.detach(cell.t1).unwrap();
        cell.begin(cell.t1).unwrap();
        cell.run_to(20);
        assert!(cell.attach.is_connected(cell.t1));
        assert_eq!(cell.attach.connected_since(cell.t1), Some(SimTime::from_secs(4)));
    }
}

// ── Bearers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bearers {
    use super::*;

    #[test]
    fn activate_before_attach_is_not_connected() {
        let mut cell = Cell::new();
        let err = cell.activate(cell.t1, QosClass::BestEffort).unwrap_err();
        assert!(matches!(err, AccessError::NotConnected(t) if t == cell.t1));
    }

    #[test]
    fn activate_before_attach_completion_is_not_connected() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        assert!(matches!(cell.activate(cell.t1, QosClass::BestEffort), Err(AccessError::NotConnected(_))));
        cell.run_to(1);
        assert!(matches!(cell.activate(cell.t1, QosClass::BestEffort), Err(AccessError::NotConnected(_))));
        assert!(cell.bearers.is_empty());
    }

    #[test]
    fn activate_when_connected() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let id = cell.activate(cell.t1, QosClass::ConversationalVoice).unwrap();
        let bearer = cell.bearers.get(id).unwrap();
        assert_eq!(bearer.terminal, cell.t1);
        assert!(bearer.guaranteed);
        assert_eq!(bearer.activated_at, SimTime::from_secs(2));
        assert!(cell.bearers.has_bearer(cell.t1));
        assert!(!cell.bearers.has_bearer(cell.t2));
    }

    #[test]
    fn bearers_listed_in_activation_order() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let a = cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        let b = cell.activate(cell.t1, QosClass::ImsSignalling).unwrap();
        assert_eq!(cell.bearers.bearers_of(cell.t1), vec![a, b]);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let id = cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        assert!(cell.bearers.deactivate(id).is_some());
        assert!(cell.bearers.deactivate(id).is_none());
        assert!(cell.bearers.bearers_of(cell.t1).is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        let a = cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        cell.bearers.deactivate(a);
        let b = cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn per_terminal_limit() {
        let mut cell = Cell::new();
        cell.begin(cell.t1).unwrap();
        cell.run_to(10);
        for _ in 0..MAX_BEARERS_PER_TERMINAL {
            cell.activate(cell.t1, QosClass::BestEffort).unwrap();
        }
        assert!(matches!(
            cell.activate(cell.t1, QosClass::BestEffort),
            Err(AccessError::TooManyBearers(_))
        ));
    }

    #[test]
    fn default_bearer_on_connect() {
        let machine = AttachMachine::new(&test_config()).with_default_bearer(Some(QosClass::BestEffort));
        let mut cell = Cell::with_machine(machine);
        cell.begin(cell.t1).unwrap();
        cell.run_to(1);
        assert!(cell.bearers.is_empty(), "no bearer before Connected");
        cell.run_to(10);
        let ids = cell.bearers.bearers_of(cell.t1);
        assert_eq!(ids.len(), 1);
        assert_eq!(cell.bearers.get(ids[0]).unwrap().qos, QosClass::BestEffort);
    }
}

// ── QoS classes ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod qos {
    use super::*;

    #[test]
    fn qci_roundtrip() {
        for class in QosClass::ALL {
            assert_eq!(QosClass::from_qci(class.qci()), Some(class));
        }
        assert_eq!(QosClass::from_qci(0), None);
        assert_eq!(QosClass::from_qci(10), None);
    }

    #[test]
    fn gbr_split() {
        assert!(QosClass::ConversationalVoice.is_gbr());
        assert!(QosClass::BufferedVideo.is_gbr());
        assert!(!QosClass::ImsSignalling.is_gbr());
        assert!(!QosClass::BestEffort.is_gbr());
    }

    #[test]
    fn default_is_best_effort() {
        assert_eq!(QosClass::default(), QosClass::BestEffort);
        assert_eq!(QosClass::BestEffort.to_string(), "best-effort (QCI 9)");
    }

    #[test]
    fn ims_has_top_priority() {
        let top = QosClass::ALL.into_iter().min_by_key(|c| c.priority()).unwrap();
        assert_eq!(top, QosClass::ImsSignalling);
        assert_eq!(QosClass::RealTimeGaming.delay_budget_ms(), 50);
    }
}
