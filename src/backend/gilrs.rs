//! gilrs-backed hardware poller
//!
//! Bridges the event-driven gilrs API to the engine's per-slot polling
//! model: the event queue is drained once per tick to track which physical
//! gamepad occupies which slot, and snapshots are then built from the cached
//! gamepad state. Gamepads are assigned to the first free slot in arrival
//! order, and a slot is freed again when its gamepad disconnects.

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use tracing::{debug, info, warn};

use super::PadPoller;
use crate::engine::{ButtonSet, PadButton, Slot, Snapshot, StickPos, SLOT_COUNT};
use crate::error::Error;

/// Gamepad buttons paired with their gilrs counterparts, Xbox layout.
const BUTTON_MAP: [(PadButton, Button); 15] = [
    (PadButton::Start, Button::Start),
    (PadButton::Back, Button::Select),
    (PadButton::LeftStick, Button::LeftThumb),
    (PadButton::RightStick, Button::RightThumb),
    (PadButton::LeftShoulder, Button::LeftTrigger),
    (PadButton::RightShoulder, Button::RightTrigger),
    (PadButton::Guide, Button::Mode),
    (PadButton::A, Button::South),
    (PadButton::B, Button::East),
    (PadButton::X, Button::West),
    (PadButton::Y, Button::North),
    (PadButton::DPadUp, Button::DPadUp),
    (PadButton::DPadDown, Button::DPadDown),
    (PadButton::DPadLeft, Button::DPadLeft),
    (PadButton::DPadRight, Button::DPadRight),
];

pub struct GilrsPoller {
    gilrs: Gilrs,
    slots: [Option<GamepadId>; SLOT_COUNT],
}

impl GilrsPoller {
    /// Initialize gilrs and claim slots for any gamepads already present.
    pub fn new() -> Result<Self, Error> {
        let gilrs = Gilrs::new().map_err(|e| Error::Backend(e.to_string()))?;
        let mut poller = Self {
            gilrs,
            slots: [None; SLOT_COUNT],
        };

        let present: Vec<(GamepadId, String)> = poller
            .gilrs
            .gamepads()
            .map(|(id, pad)| (id, pad.name().to_string()))
            .collect();
        for (id, name) in present {
            poller.assign(id, &name);
        }

        Ok(poller)
    }

    fn assign(&mut self, id: GamepadId, name: &str) {
        if self.slots.contains(&Some(id)) {
            return;
        }
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(id);
                info!("Gamepad \"{}\" assigned to slot {}", name, index);
            }
            None => {
                warn!("Gamepad \"{}\" ignored: all {} slots occupied", name, SLOT_COUNT);
            }
        }
    }

    fn release(&mut self, id: GamepadId) {
        if let Some(index) = self.slots.iter().position(|slot| *slot == Some(id)) {
            self.slots[index] = None;
            info!("Slot {} freed", index);
        }
    }
}

impl PadPoller for GilrsPoller {
    fn pump(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    let name = self.gilrs.gamepad(event.id).name().to_string();
                    self.assign(event.id, &name);
                }
                EventType::Disconnected => {
                    debug!("Gamepad {:?} disconnected", event.id);
                    self.release(event.id);
                }
                // Button/axis state is read from the cached gamepad state in
                // poll(); individual change events are not needed.
                _ => {}
            }
        }
    }

    fn poll(&mut self, slot: Slot) -> Snapshot {
        let Some(id) = self.slots[slot.index()] else {
            return Snapshot::default();
        };

        let pad = self.gilrs.gamepad(id);
        if !pad.is_connected() {
            return Snapshot::default();
        }

        let mut buttons = ButtonSet::EMPTY;
        for (button, gilrs_button) in BUTTON_MAP {
            if pad.is_pressed(gilrs_button) {
                buttons.insert(button);
            }
        }

        let trigger_value = |button: Button| -> f32 {
            pad.button_data(button)
                .map(|data| data.value())
                .unwrap_or(0.0)
                .clamp(0.0, 1.0)
        };

        Snapshot {
            connected: true,
            buttons,
            stick_left: StickPos::new(pad.value(Axis::LeftStickX), pad.value(Axis::LeftStickY)),
            stick_right: StickPos::new(pad.value(Axis::RightStickX), pad.value(Axis::RightStickY)),
            trigger_left: trigger_value(Button::LeftTrigger2),
            trigger_right: trigger_value(Button::RightTrigger2),
        }
    }
}
