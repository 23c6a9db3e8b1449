//! xpad-engine — edge-triggered gamepad input engine
//!
//! Converts periodic raw gamepad snapshots into consumable input semantics
//! (press/release/change edges, analog values, compass directions) and
//! arbitrates timed vibration requests across up to four controllers.
//!
//! Hosts create a [`Dispatcher`] with a [`backend::PadPoller`] and a
//! [`backend::HapticSink`], call [`Dispatcher::tick`] once per frame from a
//! single logical thread, and either query controller state by [`Slot`] or
//! subscribe to typed [`PadEvent`]s per [`EventKind`].

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{
    ControllerEngine, Direction, Dispatcher, EventKind, Motor, Observers, PadButton, PadEvent,
    Slot, Snapshot, Stick, StickPos, TriggerSide, SLOT_COUNT,
};
pub use error::Error;
