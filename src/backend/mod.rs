//! Hardware boundary
//!
//! The engine consumes two capabilities through trait seams: a poller that
//! produces one raw [`Snapshot`] per slot per tick, and a haptic sink that
//! accepts the commanded motor pair whenever it changes. Shipping
//! implementations: [`GilrsPoller`] for real hardware and [`LogHaptics`] for
//! hosts without (or not wanting) rumble output.

mod gilrs;
mod log;

pub use self::gilrs::GilrsPoller;
pub use self::log::LogHaptics;

use crate::engine::{Slot, Snapshot};

/// Hardware polling capability.
pub trait PadPoller {
    /// Called once at the start of every tick, before any slot is read.
    /// Backends drain their event queues here.
    fn pump(&mut self) {}

    /// Fully-populated raw state for one slot. An empty slot reports the
    /// neutral snapshot with `connected = false`.
    fn poll(&mut self, slot: Slot) -> Snapshot;
}

/// Haptic output capability.
pub trait HapticSink {
    /// Receive the commanded `(left, right)` motor pair for one controller,
    /// each in [0, 1].
    fn set_motor_output(&mut self, slot: Slot, left: f32, right: f32);
}
