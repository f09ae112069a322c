//! `ran-topology`: nodes, network devices, and their associations.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`node`]     | `Node`, `NetDevice`                                    |
//! | [`registry`] | `Topology`, owner of every node and device             |
//! | [`error`]    | `TopologyError`, `TopologyResult<T>`                   |
//!
//! # Ownership model
//!
//! The registry owns everything.  A node lists its devices by `DeviceId`; a
//! device names its owner by `NodeId` and its current peer by an optional
//! `DeviceId`.  Nothing holds a reference into another entity, so a peer link
//! can never dangle: it is resolved through the registry on every lookup.

pub mod error;
pub mod node;
pub mod registry;


pub use error::{TopologyError, TopologyResult};
pub use node::{NetDevice, Node};
pub use registry::Topology;
