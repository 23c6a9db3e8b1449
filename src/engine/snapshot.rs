//! Raw controller state capture
//!
//! A [`Snapshot`] is one tick's worth of raw hardware state for a single
//! controller: connectivity, the digital button set, both stick vectors and
//! both analog triggers. The engine keeps exactly two snapshots per
//! controller (previous and current) and derives every edge from that pair.
//!
//! Buttons are stored as a bitset rather than individual fields so that edge
//! evaluation can iterate the full button enumeration without per-button
//! branching.

/// Digital buttons reported by an Xbox-style controller.
///
/// The discriminant order is the fixed enumeration order used for event
/// fan-out, so it must not be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PadButton {
    Start,
    Back,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    Guide,
    A,
    B,
    X,
    Y,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    /// All buttons, in fan-out order.
    pub const ALL: [PadButton; 15] = [
        PadButton::Start,
        PadButton::Back,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::LeftShoulder,
        PadButton::RightShoulder,
        PadButton::Guide,
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
    ];

    const fn bit(self) -> u16 {
        1u16 << (self as u8)
    }
}

/// Set of currently-down digital buttons, backed by a `u16` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSet(u16);

impl ButtonSet {
    /// Empty set (no buttons down).
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub fn contains(self, button: PadButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: PadButton) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: PadButton) {
        self.0 &= !button.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask, for tests and diagnostics.
    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn from_bits(bits: u16) -> Self {
        ButtonSet(bits)
    }
}

impl FromIterator<PadButton> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = PadButton>>(iter: I) -> Self {
        let mut set = ButtonSet::EMPTY;
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Analog stick identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

/// Analog trigger identifier. Each trigger side also addresses the vibration
/// motor on that side of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSide {
    Left,
    Right,
}

/// 2-D stick position with components in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickPos {
    pub x: f32,
    pub y: f32,
}

impl StickPos {
    pub const ZERO: StickPos = StickPos { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        StickPos { x, y }
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Component-wise delta `self - earlier`, used for direction
    /// classification on dead-zone exit.
    pub fn delta_from(self, earlier: StickPos) -> StickPos {
        StickPos {
            x: self.x - earlier.x,
            y: self.y - earlier.y,
        }
    }
}

/// Immutable capture of one controller's raw state at one tick.
///
/// The default value is the fully-neutral disconnected state, which is also
/// what the hardware boundary must report for an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    pub connected: bool,
    pub buttons: ButtonSet,
    pub stick_left: StickPos,
    pub stick_right: StickPos,
    /// Left trigger travel in [0, 1].
    pub trigger_left: f32,
    /// Right trigger travel in [0, 1].
    pub trigger_right: f32,
}

impl Snapshot {
    pub fn stick(&self, stick: Stick) -> StickPos {
        match stick {
            Stick::Left => self.stick_left,
            Stick::Right => self.stick_right,
        }
    }

    pub fn trigger(&self, side: TriggerSide) -> f32 {
        match side {
            TriggerSide::Left => self.trigger_left,
            TriggerSide::Right => self.trigger_right,
        }
    }
}
