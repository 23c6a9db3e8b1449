//! Logging haptic sink
//!
//! Writes motor output changes to the log instead of hardware. Useful for
//! exercising the engine without rumble-capable devices and as the default
//! sink for the diagnostic binary.

use tracing::info;

use super::HapticSink;
use crate::engine::Slot;

#[derive(Debug, Default)]
pub struct LogHaptics {
    /// Number of output changes received, for diagnostics.
    pushes: u64,
}

impl LogHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> u64 {
        self.pushes
    }
}

impl HapticSink for LogHaptics {
    fn set_motor_output(&mut self, slot: Slot, left: f32, right: f32) {
        self.pushes += 1;
        info!(
            "Motor output slot {}: L {:.2} R {:.2} (#{})",
            slot, left, right, self.pushes
        );
    }
}
