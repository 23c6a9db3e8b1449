//! Timed vibration arbitration
//!
//! Each trigger side of each controller has one physical motor, shared by
//! possibly-overlapping timed vibration requests. A request takes effect
//! immediately (last writer wins on magnitude) and schedules an expiry; the
//! motor only falls silent once every outstanding request has expired, so an
//! early request running out never mutes a later, still-running one.
//!
//! Expiries are kept in a per-motor min-heap of deadlines serviced once per
//! tick by the dispatcher. [`Motor::stop`] is bulk cancellation: it clears
//! the heap without executing any completion effect.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use tracing::trace;

/// Per-trigger vibration actuator with overlapping-request reference
/// counting.
#[derive(Debug, Default)]
pub struct Motor {
    commanded: f32,
    active_requests: usize,
    expiries: BinaryHeap<Reverse<Instant>>,
}

impl Motor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Magnitude currently driving the physical motor, in [0, 1].
    pub fn commanded_value(&self) -> f32 {
        self.commanded
    }

    /// Number of timed requests that have started but not yet expired.
    pub fn active_requests(&self) -> usize {
        self.active_requests
    }

    /// Admission gate for new requests.
    ///
    /// Deliberately serializing: a new request is refused while any previous
    /// request on this motor is still running, rather than layering
    /// independent magnitudes. Overlap handling (the reference counting in
    /// [`Motor::service`]) therefore only comes into play for callers that
    /// bypass the gate on purpose.
    pub fn can_request(&self) -> bool {
        self.active_requests == 0
    }

    /// Start a timed vibration at `value` (clamped to [0, 1]) expiring
    /// `duration` after `now`.
    pub fn request(&mut self, value: f32, duration: Duration, now: Instant) {
        let value = value.clamp(0.0, 1.0);
        self.commanded = value;
        self.active_requests += 1;
        self.expiries.push(Reverse(now + duration));
        trace!(
            "Vibration request: value {:.2}, duration {:?}, {} active",
            value,
            duration,
            self.active_requests
        );
    }

    /// Expire every request whose deadline has passed.
    ///
    /// Each expiry decrements the active count; when the count reaches zero
    /// the commanded value drops to zero. While any request remains active
    /// the last-set magnitude keeps driving the motor. Returns `true` when
    /// the commanded value changed.
    pub fn service(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(&Reverse(deadline)) = self.expiries.peek() {
            if deadline > now {
                break;
            }
            self.expiries.pop();
            self.active_requests = self.active_requests.saturating_sub(1);
            trace!("Vibration request expired, {} active", self.active_requests);
            if self.active_requests == 0 && self.commanded != 0.0 {
                self.commanded = 0.0;
                changed = true;
            }
        }
        changed
    }

    /// Force-stop the motor: zero the commanded value, drop the active
    /// count, and cancel every pending expiry without running its
    /// completion. Returns `true` when the commanded value changed.
    pub fn stop(&mut self) -> bool {
        let changed = self.commanded != 0.0;
        self.commanded = 0.0;
        self.active_requests = 0;
        self.expiries.clear();
        changed
    }
}
