//! `ran-sim`: event dispatch orchestrator for the radio-access core.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`event`]    | `NetEvent` (the scheduler payload), `ControlEvent`        |
//! | [`world`]    | `World`: topology, attach, bearers, PHY cache, traffic    |
//! | [`sim`]      | `Sim`: scheduler + world, setup API, `run`, `destroy`     |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `TracingObserver`          |
//! | [`scenario`] | `ScenarioConfig`, `FlowSpec` (TOML scenario files)        |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |
//!
//! # Dispatch
//!
//! ```text
//! Scheduler<NetEvent>::run
//!   NetEvent::Access(ev)   → AttachMachine::on_event      → on_attach_transition
//!   NetEvent::Traffic(ev)  → TrafficGenerator::on_event   → on_packet
//!   NetEvent::Control(ev)  → setup call made at a scripted time
//! ```
//!
//! Components never see `NetEvent`.  Each one schedules its own event type
//! through `E: From<…>` and gets it back from the dispatcher.  The first
//! component error ends the run and is returned from [`Sim::run`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ran_sim::{NoopObserver, ScenarioConfig};
//!
//! let mut sim = ScenarioConfig::default().build()?;
//! sim.run(&mut NoopObserver)?;
//! for terminal in sim.terminals() {
//!     println!("{}", sim.dump(terminal));
//! }
//! ```

pub mod error;
pub mod event;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod world;


pub use error::{SimError, SimResult};
pub use event::{ControlEvent, NetEvent};
pub use observer::{NoopObserver, SimObserver, TracingObserver};
pub use scenario::{FlowSpec, ScenarioConfig};
pub use sim::{Sim, SimSummary};
pub use world::World;
