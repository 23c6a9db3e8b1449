//! Typed events and the observer registry
//!
//! The dispatcher pushes every derived edge as a [`PadEvent`] to observers
//! registered per [`EventKind`]. Delivery is synchronous and follows
//! registration order. The registry hands out cloneable handles; a dispatch
//! pass snapshots the matching callbacks before invoking any of them, so a
//! callback may subscribe or unsubscribe (including itself) without
//! poisoning the pass — removals take effect for the next event.

use std::sync::Arc;

use parking_lot::Mutex;

use super::direction::Direction;
use super::slot::Slot;
use super::snapshot::{PadButton, Stick, TriggerSide};

/// One edge derived by the engine, tagged with the originating slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    Connected { slot: Slot },
    Disconnected { slot: Slot },
    ButtonPressed { slot: Slot, button: PadButton },
    ButtonReleased { slot: Slot, button: PadButton },
    StickDirectionChanged { slot: Slot, stick: Stick, direction: Direction },
    StickReleased { slot: Slot, stick: Stick },
    TriggerPressed { slot: Slot, side: TriggerSide },
    TriggerReleased { slot: Slot, side: TriggerSide },
    DPadDirectionChanged { slot: Slot, direction: Direction },
    DPadReleased { slot: Slot },
}

impl PadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PadEvent::Connected { .. } => EventKind::Connected,
            PadEvent::Disconnected { .. } => EventKind::Disconnected,
            PadEvent::ButtonPressed { .. } => EventKind::ButtonPressed,
            PadEvent::ButtonReleased { .. } => EventKind::ButtonReleased,
            PadEvent::StickDirectionChanged { .. } => EventKind::StickDirectionChanged,
            PadEvent::StickReleased { .. } => EventKind::StickReleased,
            PadEvent::TriggerPressed { .. } => EventKind::TriggerPressed,
            PadEvent::TriggerReleased { .. } => EventKind::TriggerReleased,
            PadEvent::DPadDirectionChanged { .. } => EventKind::DPadDirectionChanged,
            PadEvent::DPadReleased { .. } => EventKind::DPadReleased,
        }
    }

    pub fn slot(&self) -> Slot {
        match *self {
            PadEvent::Connected { slot }
            | PadEvent::Disconnected { slot }
            | PadEvent::ButtonPressed { slot, .. }
            | PadEvent::ButtonReleased { slot, .. }
            | PadEvent::StickDirectionChanged { slot, .. }
            | PadEvent::StickReleased { slot, .. }
            | PadEvent::TriggerPressed { slot, .. }
            | PadEvent::TriggerReleased { slot, .. }
            | PadEvent::DPadDirectionChanged { slot, .. }
            | PadEvent::DPadReleased { slot } => slot,
        }
    }
}

/// Discriminant used for per-kind subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    ButtonPressed,
    ButtonReleased,
    StickDirectionChanged,
    StickReleased,
    TriggerPressed,
    TriggerReleased,
    DPadDirectionChanged,
    DPadReleased,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::ButtonPressed,
        EventKind::ButtonReleased,
        EventKind::StickDirectionChanged,
        EventKind::StickReleased,
        EventKind::TriggerPressed,
        EventKind::TriggerReleased,
        EventKind::DPadDirectionChanged,
        EventKind::DPadReleased,
    ];
}

/// Callback type for pad events.
pub type EventCallback = Arc<dyn Fn(&PadEvent) + Send + Sync>;

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    kind: EventKind,
    callback: EventCallback,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Ordered observer registry, cloneable handle.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Arc<Mutex<Inner>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind. Callbacks for the same kind
    /// are invoked in registration order.
    pub fn subscribe(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.entries.push(Entry { id, kind, callback });
        id
    }

    /// Remove a subscription. Safe to call from inside a callback; the
    /// removal applies from the next emitted event. Returns `false` when the
    /// id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        inner.entries.len() != before
    }

    /// Synchronously deliver an event to every observer of its kind.
    pub(crate) fn emit(&self, event: &PadEvent) {
        let kind = event.kind();
        // Clone the matching callbacks out of the lock so observers can
        // (un)subscribe reentrantly.
        let callbacks: Vec<EventCallback> = {
            let inner = self.inner.lock();
            inner
                .entries
                .iter()
                .filter(|entry| entry.kind == kind)
                .map(|entry| Arc::clone(&entry.callback))
                .collect()
        };
        for callback in callbacks {
            callback(event);
        }
    }
}
