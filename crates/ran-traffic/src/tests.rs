//! Unit tests for ran-traffic.

use ran_access::{AccessEvent, AttachMachine, BearerManager, QosClass};
use ran_core::{DeviceId, DeviceRole, FlowId, SimConfig, SimTime};
use ran_phy::{Direction, PhyCache};
use ran_sched::Scheduler;
use ran_topology::Topology;

use crate::{FlowState, OnOffConfig, OnOffTime, TrafficError, TrafficEvent, TrafficGenerator};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Ev {
    Access(AccessEvent),
    Traffic(TrafficEvent),
    /// Advances the clock without touching any component.
    Tick,
}

impl From<AccessEvent> for Ev {
    fn from(ev: AccessEvent) -> Self {
        Ev::Access(ev)
    }
}

impl From<TrafficEvent> for Ev {
    fn from(ev: TrafficEvent) -> Self {
        Ev::Traffic(ev)
    }
}

fn secs(s: u64) -> SimTime {
    SimTime::from_secs(s)
}

/// One base station and two terminals whose attach completes at t=1.
struct Bench {
    sched:    Scheduler<Ev>,
    topology: Topology,
    attach:   AttachMachine,
    bearers:  BearerManager,
    phy:      PhyCache,
    traffic:  TrafficGenerator,
    t1:       DeviceId,
    t2:       DeviceId,
}

impl Bench {
    fn new() -> Self {
        let config = SimConfig {
            seed:            7,
            discovery_delay: SimTime::from_millis(500),
            attach_delay:    SimTime::from_millis(500),
            stop_time:       secs(10),
        };
        let mut topology = Topology::new();
        let n0 = topology.create_node();
        let bs = topology.create_device(n0, DeviceRole::BaseStation).unwrap();
        let n1 = topology.create_node();
        let t1 = topology.create_device(n1, DeviceRole::Terminal).unwrap();
        let n2 = topology.create_node();
        let t2 = topology.create_device(n2, DeviceRole::Terminal).unwrap();

        let mut bench = Self {
            sched: Scheduler::new(),
            topology,
            attach: AttachMachine::new(&config),
            bearers: BearerManager::new(),
            phy: PhyCache::new(),
            traffic: TrafficGenerator::new(config.seed),
            t1,
            t2,
        };
        for t in [t1, t2] {
            bench.attach.begin_attach(&mut bench.sched, &bench.topology, t, bs).unwrap();
        }
        bench
    }

    /// Attach both terminals and give each a best-effort bearer.  Returns at t=1.
    fn connected() -> Self {
        let mut bench = Self::new();
        bench.run_to(1.0);
        assert_eq!(bench.sched.now(), secs(1));
        for t in [bench.t1, bench.t2] {
            bench.bearers.activate(&bench.attach, t, QosClass::BestEffort, secs(1)).unwrap();
        }
        bench
    }

    fn start(&mut self, config: OnOffConfig) -> Result<FlowId, TrafficError> {
        self.traffic.start_on_off(&mut self.sched, &self.topology, &self.bearers, config)
    }

    /// Place a clock tick at `at` and run up to it.
    fn advance_to(&mut self, at: f64) {
        let at = SimTime::from_secs_f64(at).unwrap();
        self.sched.schedule_at(at, Ev::Tick).unwrap();
        self.run_to(at.as_secs_f64());
    }

    fn run_to(&mut self, stop_secs: f64) {
        let Bench { sched, topology, attach, bearers, phy, traffic, .. } = self;
        sched
            .run(SimTime::from_secs_f64(stop_secs).unwrap(), |s, ev| {
                match ev {
                    Ev::Access(ev) => {
                        attach.on_event(ev, s, topology, bearers).map_err(|e| e.to_string())?;
                    }
                    Ev::Traffic(ev) => {
                        traffic.on_event(ev, s, bearers, phy).map_err(|e| e.to_string())?;
                    }
                    Ev::Tick => {}
                }
                Ok::<_, String>(())
            })
            .unwrap();
    }

    fn tx_times(&self, device: DeviceId) -> Vec<SimTime> {
        self.phy
            .snapshot(device)
            .iter()
            .filter(|e| e.direction == Direction::Tx)
            .map(|e| e.timestamp)
            .collect()
    }
}

// ── Starting flows ────────────────────────────────────────────────────────────

#[cfg(test)]
mod start {
    use super::*;

    #[test]
    fn source_without_bearer_is_rejected() {
        let mut bench = Bench::new();
        let (t1, t2) = (bench.t1, bench.t2);
        let err = bench.start(OnOffConfig::new(t2, t1, secs(1), secs(10))).unwrap_err();
        assert!(matches!(err, TrafficError::NoBearer(d) if d == t2));
        assert!(bench.traffic.is_empty());
    }

    #[test]
    fn unknown_device_is_rejected() {
        let mut bench = Bench::connected();
        let t2 = bench.t2;
        let err = bench.start(OnOffConfig::new(t2, DeviceId(40), secs(1), secs(10))).unwrap_err();
        assert!(matches!(err, TrafficError::Topology(_)));
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let cfg = OnOffConfig::new(t2, t1, secs(1), secs(10))
            .with_on_off(OnOffTime::Constant(0.0), OnOffTime::Constant(0.0));
        assert!(matches!(bench.start(cfg), Err(TrafficError::EmptyPeriod)));
    }

    #[test]
    fn subnanosecond_period_is_rejected() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let base = OnOffConfig::new(t2, t1, secs(1), secs(10));
        let constant = base.with_on_off(OnOffTime::Constant(1e-10), OnOffTime::Constant(0.0));
        assert!(matches!(bench.start(constant), Err(TrafficError::EmptyPeriod)));
        let uniform = base.with_on_off(
            OnOffTime::Uniform { min: 0.0, max: 4e-10 },
            OnOffTime::Constant(1e-10),
        );
        assert!(matches!(bench.start(uniform), Err(TrafficError::EmptyPeriod)));
        assert!(bench.traffic.is_empty());
    }

    #[test]
    fn malformed_durations_are_rejected() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let base = OnOffConfig::new(t2, t1, secs(1), secs(10));
        let negative = base.with_on_off(OnOffTime::Constant(-1.0), OnOffTime::Constant(0.0));
        assert!(matches!(bench.start(negative), Err(TrafficError::InvalidDelay(_))));
        let inverted = base.with_on_off(OnOffTime::Uniform { min: 2.0, max: 1.0 }, OnOffTime::Constant(0.0));
        assert!(matches!(bench.start(inverted), Err(TrafficError::InvalidRange { .. })));
    }

    #[test]
    fn start_at_or_after_stop_finishes_immediately() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let pending = bench.sched.pending();
        let flow = bench.start(OnOffConfig::new(t2, t1, secs(10), secs(10))).unwrap();
        assert_eq!(bench.traffic.stats(flow).unwrap().state, FlowState::Finished);
        assert_eq!(bench.sched.pending(), pending);
    }

    #[test]
    fn start_in_the_past_begins_now() {
        let mut bench = Bench::connected();
        bench.advance_to(3.0);
        let (t1, t2) = (bench.t1, bench.t2);
        bench.start(OnOffConfig::new(t2, t1, secs(1), secs(6))).unwrap();
        bench.run_to(10.0);
        assert_eq!(bench.tx_times(t2), vec![secs(3), secs(4), secs(5)]);
    }
}

// ── Send chain ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod chain {
    use super::*;

    #[test]
    fn nine_packets_from_one_to_ten() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let flow = bench.start(OnOffConfig::new(t2, t1, secs(1), secs(10))).unwrap();
        bench.run_to(20.0);

        let expected: Vec<_> = (1..=9).map(secs).collect();
        assert_eq!(bench.tx_times(t2), expected);
        let rx = bench.phy.snapshot(t1);
        assert_eq!(rx.len(), 9);
        assert!(rx.iter().all(|e| e.direction == Direction::Rx && e.size == 512));
        assert_eq!(rx.iter().map(|e| e.timestamp).collect::<Vec<_>>(), expected);

        // Each tx has its matching rx with the same packet id.
        for (tx, rx) in bench.phy.snapshot(t2).iter().zip(rx) {
            assert_eq!(tx.packet, rx.packet);
        }

        let stats = bench.traffic.stats(flow).unwrap();
        assert_eq!(stats.state, FlowState::Finished);
        assert_eq!(stats.sent, 9);
        assert_eq!(stats.bytes, 9 * 512);
        assert_eq!(stats.last_send, Some(secs(9)));
        assert!(bench.sched.is_empty());
    }

    #[test]
    fn off_periods_space_out_sends() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let cfg = OnOffConfig::new(t2, t1, secs(1), secs(10))
            .with_on_off(OnOffTime::Constant(1.0), OnOffTime::Constant(1.0))
            .with_packet_size(100);
        bench.start(cfg).unwrap();
        bench.run_to(20.0);
        assert_eq!(bench.tx_times(t2), vec![secs(1), secs(3), secs(5), secs(7), secs(9)]);
        assert_eq!(bench.phy.bytes(t1, Direction::Rx), 500);
    }

    #[test]
    fn packet_ids_are_unique_across_flows() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        bench.start(OnOffConfig::new(t2, t1, secs(1), secs(4))).unwrap();
        bench.start(OnOffConfig::new(t1, t2, secs(1), secs(4))).unwrap();
        bench.run_to(10.0);

        let mut ids: Vec<_> = bench
            .phy
            .snapshot(t1)
            .iter()
            .chain(bench.phy.snapshot(t2))
            .filter(|e| e.direction == Direction::Tx)
            .map(|e| e.packet)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
        assert_eq!(bench.traffic.packets_sent(), 6);

        let all = bench.traffic.all_stats();
        assert_eq!(all.iter().map(|s| (s.source, s.dest)).collect::<Vec<_>>(), vec![(t2, t1), (t1, t2)]);
        assert!(all.iter().all(|s| s.sent == 3 && s.state == FlowState::Finished));
    }

    #[test]
    fn zero_length_draws_still_advance_the_clock() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let stop = secs(1) + SimTime::from_nanos(50);
        let cfg = OnOffConfig::new(t2, t1, secs(1), stop)
            .with_on_off(OnOffTime::Uniform { min: 0.0, max: 1e-9 }, OnOffTime::Constant(0.0));
        let flow = bench.start(cfg).unwrap();
        bench.run_to(20.0);

        let tx = bench.tx_times(t2);
        assert_eq!(tx.len(), 50, "one send per nanosecond until stop");
        assert!(tx.windows(2).all(|w| w[0] < w[1]));
        assert!(tx.iter().all(|&t| t >= secs(1) && t < stop));
        assert_eq!(bench.traffic.stats(flow).unwrap().state, FlowState::Finished);
        assert!(bench.sched.is_empty());
    }

    #[test]
    fn uniform_periods_stay_in_range_and_replay() {
        let run = || {
            let mut bench = Bench::connected();
            let (t1, t2) = (bench.t1, bench.t2);
            let cfg = OnOffConfig::new(t2, t1, secs(1), secs(30))
                .with_on_off(OnOffTime::Uniform { min: 0.5, max: 1.5 }, OnOffTime::Constant(0.5));
            bench.start(cfg).unwrap();
            bench.run_to(40.0);
            bench.tx_times(t2)
        };
        let first = run();
        assert!(first.len() > 10);
        for gap in first.windows(2).map(|w| w[1] - w[0]) {
            assert!(gap >= secs(1) && gap <= secs(2), "gap {gap} out of range");
        }
        assert_eq!(first, run(), "same seed must replay the same schedule");
    }
}

// ── Ending flows ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod ending {
    use super::*;

    #[test]
    fn stop_cancels_pending_send() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let flow = bench.start(OnOffConfig::new(t2, t1, secs(1), secs(10))).unwrap();
        bench.run_to(4.0);
        assert!(bench.traffic.stop(&mut bench.sched, flow).unwrap());
        bench.run_to(20.0);

        assert_eq!(bench.tx_times(t2).len(), 4);
        assert_eq!(bench.traffic.stats(flow).unwrap().state, FlowState::Stopped);
        assert!(!bench.traffic.stop(&mut bench.sched, flow).unwrap(), "second stop is a no-op");
        assert_eq!(bench.traffic.active(), 0);
    }

    #[test]
    fn stop_unknown_flow_fails() {
        let mut bench = Bench::connected();
        assert!(matches!(
            bench.traffic.stop(&mut bench.sched, FlowId(3)),
            Err(TrafficError::UnknownFlow(_))
        ));
    }

    #[test]
    fn losing_the_bearer_halts_the_flow() {
        let mut bench = Bench::connected();
        let (t1, t2) = (bench.t1, bench.t2);
        let flow = bench.start(OnOffConfig::new(t2, t1, secs(1), secs(10))).unwrap();
        bench.advance_to(3.5);
        let now = bench.sched.now();
        bench.attach.detach(&mut bench.topology, &mut bench.bearers, t2, now).unwrap();
        bench.run_to(20.0);

        assert_eq!(bench.tx_times(t2), vec![secs(1), secs(2), secs(3)]);
        let stats = bench.traffic.stats(flow).unwrap();
        assert_eq!(stats.state, FlowState::Halted);
        assert_eq!(stats.sent, 3);
    }

    #[test]
    fn unknown_send_event_is_an_error() {
        let mut bench = Bench::connected();
        let err = bench
            .traffic
            .on_event(TrafficEvent::Send { flow: FlowId(9) }, &mut bench.sched, &bench.bearers, &mut bench.phy)
            .unwrap_err();
        assert!(matches!(err, TrafficError::UnknownFlow(_)));
    }
}
