//! `ran-sched`: virtual clock and discrete-event queue.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`key`]       | `EventKey` (`(time, seq)` ordering), `EventHandle`       |
//! | [`scheduler`] | `Scheduler<E>` (`BTreeMap<EventKey, E>`), `RunStats`     |
//! | [`error`]     | `SchedError`, `SchedResult<T>`                           |
//!
//! # Execution model (summary)
//!
//! ```text
//! loop:
//!   (key, event) = earliest pending entry        // by (time, seq)
//!   if key.time > stop_time: break               // left queued for next run
//!   now = key.time                               // before the handler runs
//!   handler(&mut scheduler, event)?              // may schedule / cancel
//! ```
//!
//! The scheduler is generic over the event payload `E`.  It never inspects
//! payloads; the orchestrator dispatches each one to the component that owns
//! it.  Single-threaded and cooperative: a handler runs to completion before
//! the next event is considered.

pub mod error;
pub mod key;
pub mod scheduler;


pub use error::{SchedError, SchedResult};
pub use key::{EventHandle, EventKey};
pub use scheduler::{RunStats, Scheduler};
