//! Controller slot addressing
//!
//! The dispatcher tracks a fixed number of controllers matching the hardware
//! abstraction's addressing scheme. Slot validation happens once, at
//! construction: an out-of-range index is a programming error surfaced
//! immediately, while every API taking a constructed [`Slot`] is infallible.

use crate::error::Error;

/// Number of controller slots the dispatcher tracks.
pub const SLOT_COUNT: usize = 4;

/// Validated controller slot index (0 to 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(u8);

impl Slot {
    /// All slots in tick order.
    pub const ALL: [Slot; SLOT_COUNT] = [Slot(0), Slot(1), Slot(2), Slot(3)];

    /// Validate a raw slot index.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSlot`] when `index` is outside `0..4`.
    pub fn new(index: usize) -> Result<Slot, Error> {
        if index < SLOT_COUNT {
            Ok(Slot(index as u8))
        } else {
            Err(Error::InvalidSlot { slot: index })
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
