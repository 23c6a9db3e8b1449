//! Tick loop, event fan-out and the slot-addressed API
//!
//! The [`Dispatcher`] owns the four controller engines, the hardware poller
//! and the haptic sink. Each call to [`Dispatcher::tick`] polls every slot,
//! advances its engine, fires the derived events in a fixed order
//! (controller-major, event-kind-minor), services the vibration expiry heaps
//! and pushes motor output to the sink whenever a commanded pair changed.
//!
//! There is no ambient global state: hosts create a `Dispatcher` value and
//! drive it from one logical thread.

use std::time::{Duration, Instant};

use tracing::debug;

use super::controller::ControllerEngine;
use super::direction::Direction;
use super::events::{Observers, PadEvent};
use super::slot::{Slot, SLOT_COUNT};
use super::snapshot::{PadButton, Stick, StickPos, TriggerSide};
use crate::backend::{HapticSink, PadPoller};
use crate::config::EngineConfig;

pub struct Dispatcher {
    engines: [ControllerEngine; SLOT_COUNT],
    observers: Observers,
    poller: Box<dyn PadPoller>,
    haptics: Box<dyn HapticSink>,
    last_output: [(f32, f32); SLOT_COUNT],
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(poller: Box<dyn PadPoller>, haptics: Box<dyn HapticSink>) -> Self {
        Self::with_config(poller, haptics, EngineConfig::default())
    }

    pub fn with_config(
        poller: Box<dyn PadPoller>,
        haptics: Box<dyn HapticSink>,
        config: EngineConfig,
    ) -> Self {
        let config = config.clamped();
        Self {
            engines: std::array::from_fn(|_| ControllerEngine::new(config)),
            observers: Observers::new(),
            poller,
            haptics,
            last_output: [(0.0, 0.0); SLOT_COUNT],
            config,
        }
    }

    /// Cloneable handle to the observer registry.
    pub fn observers(&self) -> Observers {
        self.observers.clone()
    }

    /// Run one tick against the current wall clock.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Run one tick with an explicit time base (tests drive time this way).
    pub fn tick_at(&mut self, now: Instant) {
        self.poller.pump();
        for slot in Slot::ALL {
            let raw = self.poller.poll(slot);
            self.engines[slot.index()].update(raw);
            self.fire_events(slot);
        }
        for slot in Slot::ALL {
            let engine = &mut self.engines[slot.index()];
            engine.motor_mut(TriggerSide::Left).service(now);
            engine.motor_mut(TriggerSide::Right).service(now);
            self.push_output(slot);
        }
    }

    /// Emit this tick's events for one controller, in the fixed order:
    /// connect/disconnect, button edges in enumeration order, stick
    /// direction changes then stick releases (Left, Right), trigger edges
    /// (Left, Right), D-pad change then D-pad release.
    fn fire_events(&self, slot: Slot) {
        let engine = &self.engines[slot.index()];

        if engine.just_connected() {
            self.observers.emit(&PadEvent::Connected { slot });
        } else if engine.just_disconnected() {
            self.observers.emit(&PadEvent::Disconnected { slot });
        }

        // Digital/analog edges are only evaluated while connected; the
        // connect/disconnect pair above still fires every tick.
        if !engine.is_connected() {
            return;
        }

        for button in PadButton::ALL {
            if engine.button_pressed(button) {
                self.observers.emit(&PadEvent::ButtonPressed { slot, button });
            } else if engine.button_released(button) {
                self.observers.emit(&PadEvent::ButtonReleased { slot, button });
            }
        }

        for stick in [Stick::Left, Stick::Right] {
            let direction = engine.stick_direction_changed(stick);
            if !direction.is_none() {
                self.observers.emit(&PadEvent::StickDirectionChanged {
                    slot,
                    stick,
                    direction,
                });
            }
        }

        for stick in [Stick::Left, Stick::Right] {
            if engine.stick_released(stick) {
                self.observers.emit(&PadEvent::StickReleased { slot, stick });
            }
        }

        for side in [TriggerSide::Left, TriggerSide::Right] {
            if engine.trigger_pressed(side) {
                self.observers.emit(&PadEvent::TriggerPressed { slot, side });
            }
        }

        for side in [TriggerSide::Left, TriggerSide::Right] {
            if engine.trigger_released(side) {
                self.observers.emit(&PadEvent::TriggerReleased { slot, side });
            }
        }

        let direction = engine.dpad_direction_changed();
        if !direction.is_none() {
            self.observers
                .emit(&PadEvent::DPadDirectionChanged { slot, direction });
        }

        if engine.dpad_released() {
            self.observers.emit(&PadEvent::DPadReleased { slot });
        }
    }

    // Configuration

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn set_dead_zone_radius(&mut self, radius: f32) {
        self.config.set_dead_zone_radius(radius);
        self.propagate_config();
    }

    pub fn set_trigger_press_threshold(&mut self, threshold: f32) {
        self.config.set_trigger_press_threshold(threshold);
        self.propagate_config();
    }

    fn propagate_config(&mut self) {
        for engine in &mut self.engines {
            engine.set_config(self.config);
        }
    }

    // Query API. All queries take a validated slot and answer with the
    // neutral value while that controller is disconnected.

    /// Direct read access to a slot's engine.
    pub fn engine(&self, slot: Slot) -> &ControllerEngine {
        &self.engines[slot.index()]
    }

    pub fn is_connected(&self, slot: Slot) -> bool {
        self.engines[slot.index()].is_connected()
    }

    pub fn just_connected(&self, slot: Slot) -> bool {
        self.engines[slot.index()].just_connected()
    }

    pub fn just_disconnected(&self, slot: Slot) -> bool {
        self.engines[slot.index()].just_disconnected()
    }

    pub fn button_held(&self, slot: Slot, button: PadButton) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.button_held(button)
    }

    pub fn button_pressed(&self, slot: Slot, button: PadButton) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.button_pressed(button)
    }

    pub fn button_released(&self, slot: Slot, button: PadButton) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.button_released(button)
    }

    pub fn stick_pos(&self, slot: Slot, stick: Stick) -> StickPos {
        let engine = &self.engines[slot.index()];
        if engine.is_connected() {
            engine.stick_pos(stick)
        } else {
            StickPos::ZERO
        }
    }

    pub fn stick_in_dead_zone(&self, slot: Slot, stick: Stick) -> bool {
        self.engines[slot.index()].stick_in_dead_zone(stick)
    }

    pub fn stick_direction_changed(&self, slot: Slot, stick: Stick) -> Direction {
        let engine = &self.engines[slot.index()];
        if engine.is_connected() {
            engine.stick_direction_changed(stick)
        } else {
            Direction::None
        }
    }

    pub fn stick_released(&self, slot: Slot, stick: Stick) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.stick_released(stick)
    }

    pub fn dpad_direction(&self, slot: Slot) -> Direction {
        let engine = &self.engines[slot.index()];
        if engine.is_connected() {
            engine.dpad_direction()
        } else {
            Direction::None
        }
    }

    pub fn dpad_direction_changed(&self, slot: Slot) -> Direction {
        let engine = &self.engines[slot.index()];
        if engine.is_connected() {
            engine.dpad_direction_changed()
        } else {
            Direction::None
        }
    }

    pub fn dpad_released(&self, slot: Slot) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.dpad_released()
    }

    pub fn trigger_value(&self, slot: Slot, side: TriggerSide) -> f32 {
        let engine = &self.engines[slot.index()];
        if engine.is_connected() {
            engine.trigger_value(side)
        } else {
            0.0
        }
    }

    pub fn trigger_pressed(&self, slot: Slot, side: TriggerSide) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.trigger_pressed(side)
    }

    pub fn trigger_released(&self, slot: Slot, side: TriggerSide) -> bool {
        let engine = &self.engines[slot.index()];
        engine.is_connected() && engine.trigger_released(side)
    }

    // Vibration

    /// Whether a new timed vibration would be admitted on this motor.
    pub fn can_vibrate(&self, slot: Slot, side: TriggerSide) -> bool {
        self.engines[slot.index()].motor(side).can_request()
    }

    /// Start a timed vibration on one motor. Returns `false` when the
    /// admission gate refused the request (a previous request is still
    /// running on that motor).
    pub fn vibrate(&mut self, slot: Slot, side: TriggerSide, power: f32, duration: Duration) -> bool {
        self.vibrate_at(slot, side, power, duration, Instant::now())
    }

    /// Start the same timed vibration on both motors of a controller. Each
    /// side passes the admission gate independently; returns `true` when at
    /// least one side was admitted.
    pub fn vibrate_both(&mut self, slot: Slot, power: f32, duration: Duration) -> bool {
        let left = self.vibrate(slot, TriggerSide::Left, power, duration);
        let right = self.vibrate(slot, TriggerSide::Right, power, duration);
        left || right
    }

    fn vibrate_at(
        &mut self,
        slot: Slot,
        side: TriggerSide,
        power: f32,
        duration: Duration,
        now: Instant,
    ) -> bool {
        let engine = &mut self.engines[slot.index()];
        if !engine.motor(side).can_request() {
            debug!(
                "Vibration refused on slot {} {:?}: a request is still active",
                slot, side
            );
            return false;
        }
        engine.motor_mut(side).request(power, duration, now);
        self.push_output(slot);
        true
    }

    /// Force-stop one motor, cancelling its pending expiries.
    pub fn stop_vibration(&mut self, slot: Slot, side: TriggerSide) {
        self.engines[slot.index()].motor_mut(side).stop();
        self.push_output(slot);
    }

    /// Emergency stop: silences every motor on every controller and cancels
    /// all pending expiries in one call.
    pub fn stop_all_vibrations(&mut self) {
        for slot in Slot::ALL {
            let engine = &mut self.engines[slot.index()];
            engine.motor_mut(TriggerSide::Left).stop();
            engine.motor_mut(TriggerSide::Right).stop();
            self.push_output(slot);
        }
    }

    /// Push `(left, right)` commanded values to the haptic sink when they
    /// differ from what was last sent for this slot.
    fn push_output(&mut self, slot: Slot) {
        let output = self.engines[slot.index()].motor_output();
        if output != self.last_output[slot.index()] {
            self.last_output[slot.index()] = output;
            debug!(
                "Motor output slot {}: L {:.2} R {:.2}",
                slot, output.0, output.1
            );
            self.haptics.set_motor_output(slot, output.0, output.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::EventKind;
    use crate::engine::snapshot::{ButtonSet, Snapshot};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Poller fed a fixed script of per-slot frames; reports all-disconnected
    /// once the script runs out.
    struct ScriptedPoller {
        frames: VecDeque<[Snapshot; SLOT_COUNT]>,
        current: [Snapshot; SLOT_COUNT],
    }

    impl ScriptedPoller {
        fn new(frames: Vec<[Snapshot; SLOT_COUNT]>) -> Self {
            Self {
                frames: frames.into(),
                current: [Snapshot::default(); SLOT_COUNT],
            }
        }
    }

    impl PadPoller for ScriptedPoller {
        fn pump(&mut self) {
            self.current = self.frames.pop_front().unwrap_or_default();
        }

        fn poll(&mut self, slot: Slot) -> Snapshot {
            self.current[slot.index()]
        }
    }

    #[derive(Clone, Default)]
    struct RecordingHaptics {
        outputs: Arc<Mutex<Vec<(usize, f32, f32)>>>,
    }

    impl HapticSink for RecordingHaptics {
        fn set_motor_output(&mut self, slot: Slot, left: f32, right: f32) {
            self.outputs.lock().push((slot.index(), left, right));
        }
    }

    fn slot(index: usize) -> Slot {
        Slot::new(index).unwrap()
    }

    fn frame_with(index: usize, snapshot: Snapshot) -> [Snapshot; SLOT_COUNT] {
        let mut frame = [Snapshot::default(); SLOT_COUNT];
        frame[index] = snapshot;
        frame
    }

    fn connected_snapshot() -> Snapshot {
        Snapshot {
            connected: true,
            ..Snapshot::default()
        }
    }

    fn dispatcher_with(
        frames: Vec<[Snapshot; SLOT_COUNT]>,
    ) -> (Dispatcher, Arc<Mutex<Vec<(usize, f32, f32)>>>) {
        let haptics = RecordingHaptics::default();
        let outputs = Arc::clone(&haptics.outputs);
        let dispatcher = Dispatcher::new(
            Box::new(ScriptedPoller::new(frames)),
            Box::new(haptics),
        );
        (dispatcher, outputs)
    }

    fn record_events(dispatcher: &Dispatcher) -> Arc<Mutex<Vec<PadEvent>>> {
        let log: Arc<Mutex<Vec<PadEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let observers = dispatcher.observers();
        for kind in EventKind::ALL {
            let log = Arc::clone(&log);
            observers.subscribe(kind, Arc::new(move |event| log.lock().push(*event)));
        }
        log
    }

    #[test]
    fn test_connect_fires_exactly_one_event() {
        let (mut dispatcher, _) = dispatcher_with(vec![
            frame_with(0, connected_snapshot()),
            frame_with(0, connected_snapshot()),
        ]);
        let log = record_events(&dispatcher);

        dispatcher.tick();
        assert!(dispatcher.just_connected(slot(0)));
        dispatcher.tick();
        assert!(!dispatcher.just_connected(slot(0)));

        let events = log.lock();
        let connects = events
            .iter()
            .filter(|event| event.kind() == EventKind::Connected)
            .count();
        let disconnects = events
            .iter()
            .filter(|event| event.kind() == EventKind::Disconnected)
            .count();
        assert_eq!(connects, 1);
        assert_eq!(disconnects, 0);
    }

    #[test]
    fn test_disconnect_event_and_neutral_queries() {
        let held = Snapshot {
            connected: true,
            buttons: ButtonSet::from_iter([PadButton::A]),
            trigger_left: 1.0,
            ..Snapshot::default()
        };
        let (mut dispatcher, _) = dispatcher_with(vec![
            frame_with(0, connected_snapshot()),
            frame_with(0, held),
            frame_with(0, Snapshot::default()),
        ]);
        let log = record_events(&dispatcher);

        dispatcher.tick();
        dispatcher.tick();
        assert!(dispatcher.button_pressed(slot(0), PadButton::A));

        dispatcher.tick();
        assert!(dispatcher.just_disconnected(slot(0)));
        // Disconnected queries answer with neutral values, never errors:
        // no release edge is reported even though the button set vanished.
        assert!(!dispatcher.button_released(slot(0), PadButton::A));
        assert_eq!(dispatcher.trigger_value(slot(0), TriggerSide::Left), 0.0);
        assert_eq!(dispatcher.stick_pos(slot(0), Stick::Left), StickPos::ZERO);
        assert_eq!(dispatcher.dpad_direction(slot(0)), Direction::None);

        let events = log.lock();
        assert_eq!(
            events
                .iter()
                .filter(|event| event.kind() == EventKind::Disconnected)
                .count(),
            1
        );
        // Edge evaluation is skipped on the disconnect tick.
        assert!(!events
            .iter()
            .any(|event| event.kind() == EventKind::ButtonReleased));
    }

    #[test]
    fn test_event_order_within_a_tick() {
        let busy = Snapshot {
            connected: true,
            buttons: ButtonSet::from_iter([PadButton::A, PadButton::DPadUp]),
            stick_left: StickPos::new(0.02, 0.4),
            trigger_left: 1.0,
            ..Snapshot::default()
        };
        let (mut dispatcher, _) = dispatcher_with(vec![
            frame_with(0, connected_snapshot()),
            frame_with(0, busy),
        ]);
        let log = record_events(&dispatcher);

        dispatcher.tick();
        dispatcher.tick();

        let kinds: Vec<EventKind> = log.lock().iter().map(|event| event.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Connected,
                EventKind::ButtonPressed,       // A
                EventKind::ButtonPressed,       // DPadUp
                EventKind::StickDirectionChanged,
                EventKind::TriggerPressed,
                EventKind::DPadDirectionChanged,
            ]
        );

        let events = log.lock();
        assert_eq!(
            events[3],
            PadEvent::StickDirectionChanged {
                slot: slot(0),
                stick: Stick::Left,
                direction: Direction::Up,
            }
        );
        assert_eq!(
            events[5],
            PadEvent::DPadDirectionChanged {
                slot: slot(0),
                direction: Direction::Up,
            }
        );
    }

    #[test]
    fn test_controller_major_ordering() {
        let mut frame = [Snapshot::default(); SLOT_COUNT];
        frame[0] = connected_snapshot();
        frame[2] = connected_snapshot();
        let (mut dispatcher, _) = dispatcher_with(vec![frame]);
        let log = record_events(&dispatcher);

        dispatcher.tick();

        let slots: Vec<usize> = log.lock().iter().map(|event| event.slot().index()).collect();
        assert_eq!(slots, vec![0, 2]);
    }

    #[test]
    fn test_trigger_press_release_events() {
        let frames = vec![
            frame_with(0, connected_snapshot()),
            frame_with(
                0,
                Snapshot {
                    connected: true,
                    trigger_left: 0.96,
                    ..Snapshot::default()
                },
            ),
            frame_with(
                0,
                Snapshot {
                    connected: true,
                    trigger_left: 0.94,
                    ..Snapshot::default()
                },
            ),
        ];
        let (mut dispatcher, _) = dispatcher_with(frames);

        dispatcher.tick();
        dispatcher.tick();
        assert!(dispatcher.trigger_pressed(slot(0), TriggerSide::Left));
        dispatcher.tick();
        assert!(dispatcher.trigger_released(slot(0), TriggerSide::Left));
    }

    #[test]
    fn test_vibration_output_and_expiry() {
        let (mut dispatcher, outputs) = dispatcher_with(vec![]);
        let t0 = Instant::now();

        assert!(dispatcher.vibrate_at(slot(1), TriggerSide::Left, 0.8, Duration::from_secs(1), t0));
        assert_eq!(*outputs.lock(), vec![(1, 0.8, 0.0)]);

        // Admission gate refuses a second request on the same motor.
        assert!(!dispatcher.vibrate_at(slot(1), TriggerSide::Left, 0.3, Duration::from_secs(1), t0));
        assert!(!dispatcher.can_vibrate(slot(1), TriggerSide::Left));
        // The other motor is independent.
        assert!(dispatcher.can_vibrate(slot(1), TriggerSide::Right));

        // Before expiry: no new output.
        dispatcher.tick_at(t0 + Duration::from_millis(500));
        assert_eq!(outputs.lock().len(), 1);

        // After expiry the motor stops and the zeroed pair is pushed.
        dispatcher.tick_at(t0 + Duration::from_millis(1500));
        assert_eq!(outputs.lock().last(), Some(&(1, 0.0, 0.0)));
        assert!(dispatcher.can_vibrate(slot(1), TriggerSide::Left));
    }

    #[test]
    fn test_zero_duration_vibration_gone_by_next_tick() {
        let (mut dispatcher, outputs) = dispatcher_with(vec![]);
        let t0 = Instant::now();

        dispatcher.vibrate_at(slot(0), TriggerSide::Right, 1.0, Duration::ZERO, t0);
        assert_eq!(outputs.lock().last(), Some(&(0, 0.0, 1.0)));

        dispatcher.tick_at(t0 + Duration::from_millis(16));
        assert_eq!(outputs.lock().last(), Some(&(0, 0.0, 0.0)));
        assert_eq!(
            dispatcher.engine(slot(0)).motor(TriggerSide::Right).active_requests(),
            0
        );
    }

    #[test]
    fn test_stop_all_vibrations() {
        let (mut dispatcher, outputs) = dispatcher_with(vec![]);
        let t0 = Instant::now();

        dispatcher.vibrate_at(slot(0), TriggerSide::Left, 0.5, Duration::from_secs(10), t0);
        dispatcher.vibrate_at(slot(3), TriggerSide::Right, 0.9, Duration::from_secs(10), t0);

        dispatcher.stop_all_vibrations();
        assert_eq!(outputs.lock().last(), Some(&(3, 0.0, 0.0)));
        for index in 0..SLOT_COUNT {
            let engine = dispatcher.engine(slot(index));
            assert_eq!(engine.motor_output(), (0.0, 0.0));
            assert_eq!(engine.motor(TriggerSide::Left).active_requests(), 0);
            assert_eq!(engine.motor(TriggerSide::Right).active_requests(), 0);
        }

        // Stopped deadlines never fire.
        dispatcher.tick_at(t0 + Duration::from_secs(60));
        assert_eq!(dispatcher.engine(slot(0)).motor_output(), (0.0, 0.0));
    }

    #[test]
    fn test_config_changes_reach_engines() {
        let frames = vec![
            frame_with(0, connected_snapshot()),
            frame_with(
                0,
                Snapshot {
                    connected: true,
                    trigger_left: 0.6,
                    ..Snapshot::default()
                },
            ),
        ];
        let (mut dispatcher, _) = dispatcher_with(frames);
        dispatcher.set_trigger_press_threshold(0.5);

        dispatcher.tick();
        dispatcher.tick();
        assert!(dispatcher.trigger_pressed(slot(0), TriggerSide::Left));

        // Out-of-range values are clamped, never rejected.
        dispatcher.set_dead_zone_radius(4.2);
        assert_eq!(dispatcher.config().dead_zone_radius, 1.0);
    }
}
