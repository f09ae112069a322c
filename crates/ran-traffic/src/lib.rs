//! `ran-traffic`: on/off packet flows between terminals.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`config`]    | `OnOffConfig`, `OnOffTime`                               |
//! | [`event`]     | `TrafficEvent`, `PacketSent`                             |
//! | [`generator`] | `TrafficGenerator`, `FlowStats`, `FlowState`             |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                       |
//!
//! # Send chain
//!
//! A flow is a chain of `Send` events.  Each send logs one packet (`tx` at
//! the source, `rx` at the destination) and then schedules the next send one
//! on/off period later:
//!
//! ```text
//! start ──Send──▶ start+T₁ ──Send──▶ start+T₁+T₂ ── … ──▶ (next ≥ stop: done)
//!                  Tₖ = on(k) + off(k)
//! ```
//!
//! A flow needs an active bearer on its source terminal: starting without
//! one fails, and losing the last bearer mid-flow halts the chain at the
//! next send.

pub mod config;
pub mod error;
pub mod event;
pub mod generator;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_PACKET_SIZE, OnOffConfig, OnOffTime};
pub use error::{TrafficError, TrafficResult};
pub use event::{PacketSent, TrafficEvent};
pub use generator::{FlowState, FlowStats, TrafficGenerator};
