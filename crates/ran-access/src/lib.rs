//! `ran-access`: terminal attach procedure and data bearers.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`attach`] | `AttachMachine`, `AttachState`, `Transition`                  |
//! | [`event`]  | `AccessEvent`, timer expiries the machine schedules           |
//! | [`bearer`] | `BearerManager`, `Bearer`                                     |
//! | [`qos`]    | `QosClass`, standardized QoS class identifiers                |
//! | [`error`]  | `AccessError`, `AccessResult<T>`                              |
//!
//! # Attach procedure (summary)
//!
//! ```text
//!  Idle ──begin_attach──▶ Discovering ──(discovery_delay)──▶ Attaching
//!   ▲                                   associate(terminal, bs)     │
//!   │                                                   (attach_delay)
//!   └──────────── detach (release bearers) ◀──────────── Connected ◀┘
//! ```
//!
//! Timer expiries are ordinary scheduler events carrying an [`AccessEvent`].
//! The machine is generic over the orchestrator's event type `E` and only
//! requires `E: From<AccessEvent>` to put its own events on the queue.

pub mod attach;
pub mod bearer;
pub mod error;
pub mod event;
pub mod qos;

#[cfg(test)]
mod tests;

pub use attach::{AttachMachine, AttachState, Transition};
pub use bearer::{Bearer, BearerManager, MAX_BEARERS_PER_TERMINAL};
pub use error::{AccessError, AccessResult};
pub use event::AccessEvent;
pub use qos::QosClass;
