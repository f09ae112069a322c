//! `ran-core`: foundational types for the `ran_sim` discrete-event core.
//!
//! This crate is a dependency of every other `ran-*` crate.  It has no
//! `ran-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `DeviceId`, `BearerId`, `FlowId`, `PacketId`    |
//! | [`time`]    | `SimTime`, `SimConfig`                                    |
//! | [`rng`]     | `SimRng` (seeded, derivable per flow)                     |
//! | [`addr`]    | `LinkAddress` (48-bit link-layer address)                 |
//! | [`role`]    | `DeviceRole` enum                                         |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod addr;
pub mod error;
pub mod ids;
pub mod rng;
pub mod role;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use addr::LinkAddress;
pub use error::{CoreError, CoreResult};
pub use ids::{BearerId, DeviceId, FlowId, NodeId, PacketId};
pub use rng::SimRng;
pub use role::DeviceRole;
pub use time::{SimConfig, SimTime};
