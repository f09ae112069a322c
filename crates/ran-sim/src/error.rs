use std::path::PathBuf;

use ran_access::AccessError;
use ran_core::CoreError;
use ran_sched::SchedError;
use ran_topology::TopologyError;
use ran_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot read scenario file {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sched(#[from] SchedError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Traffic(#[from] TrafficError),
}

pub type SimResult<T> = Result<T, SimError>;
