//! Library error taxonomy
//!
//! Almost nothing in the engine can fail: disconnected controllers answer
//! queries with neutral values, out-of-range configuration values are
//! clamped, and a double update simply lets the last snapshot win. What
//! remains is slot addressing (a programming error) and backend bring-up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A slot index outside the tracked range was used. This is a caller
    /// bug, not a runtime condition, and is surfaced immediately instead of
    /// being clamped.
    #[error("controller slot {slot} is out of range (valid slots are 0-3)")]
    InvalidSlot { slot: usize },

    /// The gamepad hardware backend could not be initialized.
    #[error("gamepad backend unavailable: {0}")]
    Backend(String),
}
