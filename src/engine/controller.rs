//! Per-slot polling/diff engine
//!
//! A [`ControllerEngine`] owns one controller's snapshot pair, the derived
//! D-pad direction pair and the two vibration motors, and answers every
//! edge/level query by comparing the previous and current snapshot. One
//! engine is created per slot at startup and lives for the process lifetime;
//! a disconnected controller keeps its engine and yields neutral results.

use std::mem;

use super::direction::{
    classify_delta, dpad_direction, Direction, DIRECTION_DETECT_THRESHOLD,
};
use super::motor::Motor;
use super::snapshot::{PadButton, Snapshot, Stick, StickPos, TriggerSide};
use crate::config::EngineConfig;

pub struct ControllerEngine {
    previous: Snapshot,
    current: Snapshot,
    dpad_previous: Direction,
    dpad_current: Direction,
    motor_left: Motor,
    motor_right: Motor,
    config: EngineConfig,
}

impl ControllerEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            previous: Snapshot::default(),
            current: Snapshot::default(),
            dpad_previous: Direction::None,
            dpad_current: Direction::None,
            motor_left: Motor::new(),
            motor_right: Motor::new(),
            config,
        }
    }

    /// Advance the snapshot pair with this tick's raw state and re-classify
    /// the D-pad direction pair.
    ///
    /// Must be called once per tick. Calling it twice without an intervening
    /// hardware poll simply makes the last raw snapshot win; only one
    /// snapshot per tick exists.
    pub fn update(&mut self, raw: Snapshot) {
        self.previous = mem::replace(&mut self.current, raw);
        self.dpad_previous = self.dpad_current;
        self.dpad_current = dpad_direction(self.current.buttons);
    }

    /// Replace the tuning values used by the analog classifiers.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    // Connectivity

    pub fn is_connected(&self) -> bool {
        self.current.connected
    }

    pub fn just_connected(&self) -> bool {
        self.current.connected && !self.previous.connected
    }

    pub fn just_disconnected(&self) -> bool {
        !self.current.connected && self.previous.connected
    }

    // Buttons

    /// True iff the button is down now and was already down the previous
    /// tick. Held is not merely "currently down".
    pub fn button_held(&self, button: PadButton) -> bool {
        self.previous.buttons.contains(button) && self.current.buttons.contains(button)
    }

    pub fn button_pressed(&self, button: PadButton) -> bool {
        !self.previous.buttons.contains(button) && self.current.buttons.contains(button)
    }

    pub fn button_released(&self, button: PadButton) -> bool {
        self.previous.buttons.contains(button) && !self.current.buttons.contains(button)
    }

    // Sticks

    /// Raw current stick vector, unfiltered.
    pub fn stick_pos(&self, stick: Stick) -> StickPos {
        self.current.stick(stick)
    }

    pub fn stick_in_dead_zone(&self, stick: Stick) -> bool {
        self.in_dead_zone(&self.current, stick)
    }

    /// Compass direction for a stick that left its dead zone this tick.
    ///
    /// Fires only on the exact dead-zone-exit tick and stays
    /// `Direction::None` on every other tick, even while the stick keeps
    /// moving outside the zone. The direction is classified from the
    /// snapshot-to-snapshot delta, not the current position, so an exit with
    /// a negligible delta yields `Direction::None` despite the transition.
    pub fn stick_direction_changed(&self, stick: Stick) -> Direction {
        if self.in_dead_zone(&self.previous, stick) && !self.in_dead_zone(&self.current, stick) {
            let delta = self.current.stick(stick).delta_from(self.previous.stick(stick));
            classify_delta(delta.x, delta.y, DIRECTION_DETECT_THRESHOLD)
        } else {
            Direction::None
        }
    }

    /// True on the tick the stick re-enters its dead zone.
    pub fn stick_released(&self, stick: Stick) -> bool {
        !self.in_dead_zone(&self.previous, stick) && self.in_dead_zone(&self.current, stick)
    }

    fn in_dead_zone(&self, snapshot: &Snapshot, stick: Stick) -> bool {
        snapshot.stick(stick).magnitude() < self.config.dead_zone_radius
    }

    // D-pad

    /// Classified direction of the currently-held D-pad buttons.
    pub fn dpad_direction(&self) -> Direction {
        self.dpad_current
    }

    /// The new classified direction when it differs from the previous
    /// tick's, `Direction::None` otherwise. A release to neutral reports
    /// `None` here as well; callers distinguish it via
    /// [`ControllerEngine::dpad_released`].
    pub fn dpad_direction_changed(&self) -> Direction {
        if self.dpad_previous != self.dpad_current {
            self.dpad_current
        } else {
            Direction::None
        }
    }

    pub fn dpad_released(&self) -> bool {
        self.dpad_previous != Direction::None && self.dpad_current == Direction::None
    }

    // Triggers

    /// Raw current trigger travel in [0, 1].
    pub fn trigger_value(&self, side: TriggerSide) -> f32 {
        self.current.trigger(side)
    }

    pub fn trigger_pressed(&self, side: TriggerSide) -> bool {
        let threshold = self.config.trigger_press_threshold;
        self.current.trigger(side) >= threshold && self.previous.trigger(side) < threshold
    }

    pub fn trigger_released(&self, side: TriggerSide) -> bool {
        let threshold = self.config.trigger_press_threshold;
        self.current.trigger(side) < threshold && self.previous.trigger(side) >= threshold
    }

    // Motors

    pub fn motor(&self, side: TriggerSide) -> &Motor {
        match side {
            TriggerSide::Left => &self.motor_left,
            TriggerSide::Right => &self.motor_right,
        }
    }

    pub fn motor_mut(&mut self, side: TriggerSide) -> &mut Motor {
        match side {
            TriggerSide::Left => &mut self.motor_left,
            TriggerSide::Right => &mut self.motor_right,
        }
    }

    /// Current `(left, right)` commanded motor pair, the physical output for
    /// this controller.
    pub fn motor_output(&self) -> (f32, f32) {
        (
            self.motor_left.commanded_value(),
            self.motor_right.commanded_value(),
        )
    }
}
