//! Scenario files: a TOML description of a cell layout and its flows.
//!
//! ```toml
//! seed            = 1
//! base_stations   = 1
//! terminals       = 2
//! discovery_delay = 0.010
//! attach_delay    = 0.015
//! stop_time       = 10.0
//! default_bearer  = "best-effort"
//!
//! [[flows]]
//! source = 1          # terminal index
//! dest   = 0
//! start  = 1.0
//! stop   = 10.0
//! on     = { constant = 1.0 }
//! off    = { constant = 0.0 }
//! ```
//!
//! Every field has a default; an empty file yields the one-cell,
//! two-terminal layout with a single flow from the second terminal to the
//! first.

use std::path::Path;

use ran_access::QosClass;
use ran_core::{DeviceId, DeviceRole, SimConfig, SimTime};
use ran_traffic::{DEFAULT_PACKET_SIZE, OnOffConfig, OnOffTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ControlEvent, Sim, SimError, SimResult};

/// One on/off flow between two terminals, named by terminal index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSpec {
    pub source:      usize,
    pub dest:        usize,
    /// Absolute start time, seconds.
    pub start:       f64,
    /// Absolute stop time, seconds.
    pub stop:        f64,
    #[serde(default = "default_on")]
    pub on:          OnOffTime,
    #[serde(default = "default_off")]
    pub off:         OnOffTime,
    #[serde(default = "default_packet_size")]
    pub packet_size: u32,
}

fn default_on() -> OnOffTime {
    OnOffTime::Constant(1.0)
}

fn default_off() -> OnOffTime {
    OnOffTime::Constant(0.0)
}

fn default_packet_size() -> u32 {
    DEFAULT_PACKET_SIZE
}

/// A complete scenario.  Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub seed:            u64,
    pub base_stations:   usize,
    pub terminals:       usize,
    pub discovery_delay: f64,
    pub attach_delay:    f64,
    pub stop_time:       f64,
    /// Bearer class activated on every terminal when it connects.
    pub default_bearer:  Option<QosClass>,
    pub flows:           Vec<FlowSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed:            1,
            base_stations:   1,
            terminals:       2,
            discovery_delay: 0.010,
            attach_delay:    0.015,
            stop_time:       10.0,
            default_bearer:  Some(QosClass::BestEffort),
            flows:           vec![FlowSpec {
                source:      1,
                dest:        0,
                start:       1.0,
                stop:        10.0,
                on:          default_on(),
                off:         default_off(),
                packet_size: DEFAULT_PACKET_SIZE,
            }],
        }
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject layouts that cannot be built.
    pub fn validate(&self) -> SimResult<()> {
        if self.terminals > 0 && self.base_stations == 0 {
            return Err(SimError::Config("terminals need at least one base station".into()));
        }
        for (i, flow) in self.flows.iter().enumerate() {
            for end in [flow.source, flow.dest] {
                if end >= self.terminals {
                    return Err(SimError::Config(format!(
                        "flow {i} names terminal {end}, but only {} exist",
                        self.terminals
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn sim_config(&self) -> SimResult<SimConfig> {
        Ok(SimConfig {
            seed:            self.seed,
            discovery_delay: SimTime::from_secs_f64(self.discovery_delay)?,
            attach_delay:    SimTime::from_secs_f64(self.attach_delay)?,
            stop_time:       SimTime::from_secs_f64(self.stop_time)?,
        })
    }

    /// Create the layout and script its procedures.
    ///
    /// Each base station and each terminal gets its own node.  Terminal `i`
    /// begins attaching to base station `i % base_stations` at t=0, and each
    /// flow starts with a [`ControlEvent::StartTraffic`] at its start time.
    /// Flows therefore need their source connected with a bearer by then,
    /// which `default_bearer` provides.
    pub fn build(&self) -> SimResult<Sim> {
        self.validate()?;
        let mut sim = Sim::new(self.sim_config()?)?.with_default_bearer(self.default_bearer);

        let stations = (0..self.base_stations)
            .map(|_| sim.create_station(DeviceRole::BaseStation))
            .collect::<SimResult<Vec<_>>>()?;
        let terminals = (0..self.terminals)
            .map(|_| sim.create_station(DeviceRole::Terminal))
            .collect::<SimResult<Vec<_>>>()?;

        for (i, &terminal) in terminals.iter().enumerate() {
            let base_station = stations[i % stations.len()];
            sim.schedule_control_at(SimTime::ZERO, ControlEvent::BeginAttach { terminal, base_station })?;
        }

        for flow in &self.flows {
            let config = flow.on_off_config(&terminals)?;
            sim.schedule_control_at(config.start, ControlEvent::StartTraffic(config))?;
        }

        debug!(
            base_stations = stations.len(),
            terminals = terminals.len(),
            flows = self.flows.len(),
            "scenario built"
        );
        Ok(sim)
    }
}

impl FlowSpec {
    fn on_off_config(&self, terminals: &[DeviceId]) -> SimResult<OnOffConfig> {
        let endpoint = |i: usize| {
            terminals
                .get(i)
                .copied()
                .ok_or_else(|| SimError::Config(format!("no terminal with index {i}")))
        };
        Ok(OnOffConfig {
            source:      endpoint(self.source)?,
            dest:        endpoint(self.dest)?,
            start:       SimTime::from_secs_f64(self.start)?,
            stop:        SimTime::from_secs_f64(self.stop)?,
            on:          self.on,
            off:         self.off,
            packet_size: self.packet_size,
        })
    }
}
