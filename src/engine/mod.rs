//! Per-controller polling/diff engine and its haptic arbitration
//!
//! The engine turns raw per-tick snapshots into edge-triggered semantics:
//! press/release/held predicates, dead-zone based stick direction changes,
//! trigger threshold crossings and D-pad compass classification, plus timed
//! vibration arbitration per motor. The [`dispatcher`] drives all four
//! controller slots and fans events out to observers.

pub mod controller;
pub mod direction;
pub mod dispatcher;
pub mod events;
pub mod motor;
pub mod slot;
pub mod snapshot;

pub use controller::ControllerEngine;
pub use direction::{classify_delta, dpad_direction, Direction, DIRECTION_DETECT_THRESHOLD};
pub use dispatcher::Dispatcher;
pub use events::{EventCallback, EventKind, Observers, PadEvent, SubscriptionId};
pub use motor::Motor;
pub use slot::{Slot, SLOT_COUNT};
pub use snapshot::{ButtonSet, PadButton, Snapshot, Stick, StickPos, TriggerSide};
