//=========================================================================
// Aetheric Input Engine
//
// Top-level system object: owns the device registry, the event pipeline
// and the producer channel.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine
//         │                          ├─ registry   (devices, clocks, ...)
//         ├─ with_channel_capacity() ├─ pipeline   (translate → apply → handler)
//         ├─ with_default_deadzone() └─ sender     (cloned out to producers)
//         └─ with_long_frame_threshold()
//
//     producer threads ──EventSender──> channel ──poll()/wait()──> caller
// ```
//
// Everything except the producers runs on the thread that calls `poll`,
// `wait` and `frame`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::animation::Animation;
use crate::core::clock::{Clock, TimerFired};
use crate::core::deadzone::{Deadzone, StickState};
use crate::core::event::Event;
use crate::core::input::{Controller, InputDevice, InputSet, PressRecord, Stick, Trigger};
use crate::core::pipeline::EventPipeline;
use crate::core::registry::{DeviceKind, DeviceRegistry, Handle};
use crate::platform::{EventSender, RawEvent, RawEventKind};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Channel capacity**: 1024 raw records
/// - **Default deadzone**: radial, threshold 0.1
/// - **Long frame threshold**: 0.25 s
/// - **Identifiers**: seeded from the system clock
/// - **Start-up devices**: one keyboard and one mouse
///
/// # Examples
///
/// ```no_run
/// use aetheric_input::EngineBuilder;
///
/// let mut engine = EngineBuilder::new()
///     .with_channel_capacity(256)
///     .with_long_frame_threshold(0.1)
///     .build();
///
/// while let Some(event) = engine.poll() {
///     println!("{}", event.name());
/// }
/// ```
pub struct EngineBuilder {
    channel_capacity: usize,
    default_deadzone: Deadzone,
    long_frame_threshold: f64,
    id_seed: Option<u64>,
    keyboard: bool,
    mouse: bool,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            channel_capacity: 1024,
            default_deadzone: Deadzone::default(),
            long_frame_threshold: 0.25,
            id_seed: None,
            keyboard: true,
            mouse: true,
        }
    }

    /// Sets the capacity of the platform → core channel.
    ///
    /// While the channel is full, producers drop high-rate records (with a
    /// warning) and block on control records.
    ///
    /// Default: 1024
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Deadzone seeded into both sticks of every controller inserted later.
    ///
    /// Default: radial, threshold 0.1
    pub fn with_default_deadzone(mut self, deadzone: Deadzone) -> Self {
        self.default_deadzone = deadzone.clamped();
        self
    }

    /// Frame duration above which [`Engine::frame`] emits `LongFrame`.
    ///
    /// Default: 0.25
    ///
    /// # Panics
    ///
    /// Panics if `seconds <= 0.0`.
    pub fn with_long_frame_threshold(mut self, seconds: f64) -> Self {
        assert!(seconds > 0.0, "Long frame threshold must be positive, got {}", seconds);
        self.long_frame_threshold = seconds;
        self
    }

    /// Makes device identifiers deterministic (tests, replays).
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    /// Skips the start-up keyboard insertion.
    pub fn without_keyboard(mut self) -> Self {
        self.keyboard = false;
        self
    }

    /// Skips the start-up mouse insertion.
    pub fn without_mouse(mut self) -> Self {
        self.mouse = false;
        self
    }

    /// Builds the engine.
    ///
    /// The singleton keyboard and mouse are inserted immediately; their
    /// insertion events are the first ones returned by [`Engine::poll`].
    pub fn build(self) -> Engine {
        info!(
            "Building input engine (channel: {}, deadzone: {} {}, long frame: {}s)",
            self.channel_capacity,
            self.default_deadzone.mode,
            self.default_deadzone.threshold,
            self.long_frame_threshold
        );

        let (tx, rx) = bounded(self.channel_capacity);
        let sender = EventSender::new(tx, Instant::now());

        let mut registry = match self.id_seed {
            Some(seed) => DeviceRegistry::with_seed(seed),
            None => DeviceRegistry::new(),
        };
        let mut pipeline = EventPipeline::new(rx, self.default_deadzone);

        if self.keyboard {
            pipeline.inject(&mut registry, RawEvent::new(sender.now(), RawEventKind::KeyboardAdded));
        }
        if self.mouse {
            pipeline.inject(&mut registry, RawEvent::new(sender.now(), RawEventKind::MouseAdded { mouse: 0 }));
        }

        Engine {
            registry,
            pipeline,
            sender,
            long_frame_threshold: self.long_frame_threshold,
            shut_down: false,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Input and timing system.
///
/// Create via [`EngineBuilder`]. Tear down with [`Engine::shutdown`], or
/// let it drop.
///
/// # Architecture
///
/// ```text
/// Engine (caller's thread)
///   ├─► poll() / wait()      drain raw records, normalize, dispatch
///   ├─► frame(dt)            LongFrame + auto-updated clocks
///   └─► per-device queries   timing, history, sticks, deadzones
///
/// Producers: EventSender clones (any thread)
/// ```
pub struct Engine {
    registry: DeviceRegistry,
    pipeline: EventPipeline,
    sender: EventSender,
    long_frame_threshold: f64,
    shut_down: bool,
}

impl Engine {
    //--- Access -----------------------------------------------------------

    /// A producer endpoint for platform threads.
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    pub fn long_frame_threshold(&self) -> f64 {
        self.long_frame_threshold
    }

    //--- Events -----------------------------------------------------------

    /// Next meaningful event, or `None` if nothing is queued.
    pub fn poll(&mut self) -> Option<Event> {
        self.pipeline.poll(&mut self.registry)
    }

    /// Blocks until a meaningful event arrives.
    ///
    /// Returns `None` if a producer calls [`EventSender::wake`].
    pub fn wait(&mut self) -> Option<Event> {
        self.pipeline.wait(&mut self.registry)
    }

    /// Events that [`Engine::poll`] would currently return.
    pub fn pending_count(&mut self) -> usize {
        self.pipeline.pending_count(&self.registry)
    }

    /// Installs the global handler, called for every event returned by
    /// `poll`/`wait` before the call returns.
    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Event, &DeviceRegistry) + 'static,
    {
        self.pipeline.set_handler(handler);
    }

    pub fn clear_handler(&mut self) {
        self.pipeline.clear_handler();
    }

    //--- Frame & Scheduling -----------------------------------------------

    /// Per-frame hook.
    ///
    /// Queues `LongFrame` when `dt` exceeds the threshold, then ticks every
    /// clock flagged `auto_update`.
    pub fn frame(&mut self, dt: f64) {
        if dt > self.long_frame_threshold {
            debug!("Long frame: {:.3}s", dt);
            self.pipeline.push_synthetic(Event::LongFrame { dt });
        }

        for clock in self.registry.list::<Clock>() {
            let auto = self.registry.get(clock).is_some_and(Clock::auto_update);
            if auto {
                self.tick_clock(clock, dt);
            }
        }
    }

    /// Ticks one clock and queues a `Timer` event per fired timer.
    ///
    /// Returns the number of timers that fired; `0` for a closed clock.
    pub fn tick_clock(&mut self, clock: Handle<Clock>, dt: f64) -> usize {
        let Some(record) = self.registry.get_mut(clock) else {
            warn!(target: "clock", "Tick on closed clock");
            return 0;
        };

        let fired = record.tick(dt);
        let count = fired.len();
        for TimerFired { name, seconds, repeat } in fired {
            self.pipeline.push_synthetic(Event::Timer { name, seconds, repeat, clock });
        }
        count
    }

    /// Advances an animation and queues `AnimationFinished` per completion.
    pub fn update_animation(&mut self, animation: Handle<Animation>, dt: f64) -> u32 {
        let Some(record) = self.registry.get_mut(animation) else {
            warn!(target: "animation", "Update on closed animation");
            return 0;
        };

        let completions = record.advance(dt);
        for _ in 0..completions {
            self.pipeline.push_synthetic(Event::AnimationFinished { animation });
        }
        completions
    }

    //--- Press Timing & History -------------------------------------------

    /// Most recent press on the device, if any.
    pub fn last_pressed<D: InputDevice>(&self, device: Handle<D>) -> Option<PressRecord<D::Input>> {
        self.input_device(device, "last press")?.inputs().timing().last_pressed()
    }

    /// Most recent release on the device, if any.
    pub fn last_released<D: InputDevice>(&self, device: Handle<D>) -> Option<PressRecord<D::Input>> {
        self.input_device(device, "last release")?.inputs().timing().last_released()
    }

    /// Time of the last press of `input`; `0.0` for a closed device.
    pub fn pressed_time<D: InputDevice>(&self, device: Handle<D>, input: D::Input) -> f64 {
        self.input_device(device, "press time")
            .map_or(0.0, |d| d.inputs().timing().pressed_time(input))
    }

    /// Time of the last release of `input`; `0.0` for a closed device.
    pub fn released_time<D: InputDevice>(&self, device: Handle<D>, input: D::Input) -> f64 {
        self.input_device(device, "release time")
            .map_or(0.0, |d| d.inputs().timing().released_time(input))
    }

    /// `true` if the newest press snapshots equal `masks`, newest first.
    ///
    /// An empty `masks` always matches; a closed device never does.
    pub fn check_history<D: InputDevice>(&self, device: Handle<D>, masks: &[InputSet<D::Input>]) -> bool {
        self.input_device(device, "history")
            .is_some_and(|d| d.inputs().history().matches(masks))
    }

    //--- Controllers ------------------------------------------------------

    /// Shaped stick position; [`StickState::ZERO`] for a closed controller.
    pub fn controller_stick(&self, controller: Handle<Controller>, which: Stick) -> StickState {
        self.controller(controller, "stick")
            .map_or(StickState::ZERO, |c| c.stick(which))
    }

    /// Trigger value in `[0, 1]`; `0.0` for a closed controller.
    pub fn controller_trigger(&self, controller: Handle<Controller>, which: Trigger) -> f64 {
        self.controller(controller, "trigger")
            .map_or(0.0, |c| c.trigger(which))
    }

    pub fn controller_deadzone(&self, controller: Handle<Controller>, which: Stick) -> Deadzone {
        self.controller(controller, "deadzone")
            .map_or_else(Deadzone::default, |c| c.deadzone(which))
    }

    pub fn set_controller_deadzone(&mut self, controller: Handle<Controller>, which: Stick, deadzone: Deadzone) {
        match self.registry.get_mut(controller) {
            Some(c) => c.set_deadzone(which, deadzone),
            None => warn!(target: "registry", "Cannot set deadzone on closed controller"),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Closes one record. See [`DeviceRegistry::close`].
    pub fn close<D: DeviceKind>(&mut self, handle: Handle<D>) -> bool {
        self.registry.close(handle)
    }

    /// Closes every device and resource.
    ///
    /// # Panics
    ///
    /// Panics if any record survives the teardown.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    //--- Internal Helpers -------------------------------------------------

    fn teardown(&mut self) {
        info!("Shutting down input engine");
        self.shut_down = true;
        self.registry.close_all();
        info!("Input engine shutdown complete");
    }

    fn input_device<D: InputDevice>(&self, device: Handle<D>, query: &str) -> Option<&D> {
        let record = self.registry.get(device);
        if record.is_none() {
            warn!(target: "registry", "{} query on closed {}", query, D::KIND);
        }
        record
    }

    fn controller(&self, controller: Handle<Controller>, query: &str) -> Option<&Controller> {
        self.input_device(controller, query)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if !self.shut_down && !thread::panicking() {
            self.teardown();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadzone::DeadzoneMode;
    use crate::core::input::{KeyCode, KeySet, Keyboard, Modifiers, Mouse};
    use crate::core::input::ControllerAxis;
    use std::cell::Cell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    fn bare_engine() -> Engine {
        EngineBuilder::new()
            .with_id_seed(5)
            .without_keyboard()
            .without_mouse()
            .build()
    }

    fn engine() -> Engine {
        let mut engine = EngineBuilder::new().with_id_seed(5).with_long_frame_threshold(1.0).build();
        drain(&mut engine);
        engine
    }

    fn drain(engine: &mut Engine) -> Vec<Event> {
        std::iter::from_fn(|| engine.poll()).collect()
    }

    fn tap(engine: &Engine, time: f64, key: KeyCode) {
        let sender = engine.event_sender();
        for pressed in [true, false] {
            sender.post(RawEvent::new(
                time,
                RawEventKind::Key { key, mods: Modifiers::NONE, pressed, repeat: false },
            ));
        }
    }

    fn timer_events(events: &[Event]) -> Vec<(String, i32)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Timer { name, repeat, .. } => Some((name.clone(), *repeat)),
                _ => None,
            })
            .collect()
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.channel_capacity, 1024);
        assert_eq!(builder.default_deadzone, Deadzone::new(DeadzoneMode::Radial, 0.1));
        assert_eq!(builder.long_frame_threshold, 0.25);
        assert!(builder.keyboard && builder.mouse);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Long frame threshold must be positive")]
    fn builder_with_long_frame_threshold_panics_on_zero() {
        EngineBuilder::new().with_long_frame_threshold(0.0);
    }

    #[test]
    fn build_inserts_keyboard_and_mouse() {
        let mut engine = EngineBuilder::new().build();

        let events = drain(&mut engine);
        assert!(matches!(events[0], Event::KeyboardInsert { .. }));
        assert!(matches!(events[1], Event::MouseInsert { .. }));
        assert_eq!(engine.registry().count::<Keyboard>(), 1);
        assert_eq!(engine.registry().count::<Mouse>(), 1);
    }

    #[test]
    fn build_without_singletons_is_empty() {
        let mut engine = bare_engine();
        assert_eq!(engine.poll(), None);
        assert_eq!(engine.registry().count::<Keyboard>(), 0);
    }

    #[test]
    fn id_seed_is_deterministic() {
        let a = EngineBuilder::new().with_id_seed(42).build();
        let b = EngineBuilder::new().with_id_seed(42).build();
        let ka = a.registry().primary_keyboard().unwrap();
        let kb = b.registry().primary_keyboard().unwrap();
        assert_eq!(a.registry().id(ka), b.registry().id(kb));
    }

    //=====================================================================
    // History Tests
    //=====================================================================

    #[test]
    fn history_matches_newest_first() {
        let mut engine = engine();
        tap(&engine, 1.0, KeyCode::KeyA);
        tap(&engine, 2.0, KeyCode::KeyB);
        tap(&engine, 3.0, KeyCode::KeyC);
        drain(&mut engine);

        let kb = engine.registry().primary_keyboard().unwrap();
        let newest_first = [KeySet::single(KeyCode::KeyC), KeySet::single(KeyCode::KeyB), KeySet::single(KeyCode::KeyA)];
        let oldest_first = [KeySet::single(KeyCode::KeyA), KeySet::single(KeyCode::KeyB), KeySet::single(KeyCode::KeyC)];

        assert!(engine.check_history(kb, &newest_first));
        assert!(!engine.check_history(kb, &oldest_first));
        assert!(engine.check_history(kb, &[]));
        assert_eq!(engine.last_pressed(kb).map(|r| r.input), Some(KeyCode::KeyC));
        assert_eq!(engine.pressed_time(kb, KeyCode::KeyB), 2.0);
    }

    #[test]
    fn closed_device_queries_return_defaults() {
        let mut engine = engine();
        tap(&engine, 1.0, KeyCode::KeyA);
        drain(&mut engine);

        let kb = engine.registry().primary_keyboard().unwrap();
        assert!(engine.close(kb));
        assert!(!engine.close(kb));

        assert_eq!(engine.last_pressed(kb), None);
        assert_eq!(engine.last_released(kb), None);
        assert_eq!(engine.pressed_time(kb, KeyCode::KeyA), 0.0);
        assert_eq!(engine.released_time(kb, KeyCode::KeyA), 0.0);
        assert!(!engine.check_history(kb, &[]));
    }

    //=====================================================================
    // Scheduling Tests
    //=====================================================================

    #[test]
    fn one_shot_timer_fires_once_through_frame() {
        let mut engine = engine();
        let clock = engine.registry_mut().create_clock("game");
        engine.registry_mut().get_mut(clock).unwrap().add_timer("boom", 1.0, false);

        engine.frame(0.4);
        engine.frame(0.4);
        assert!(timer_events(&drain(&mut engine)).is_empty());

        engine.frame(0.4);
        assert_eq!(timer_events(&drain(&mut engine)), vec![("boom".to_string(), 0)]);
        assert!(!engine.registry().get(clock).unwrap().has_timer("boom"));
    }

    #[test]
    fn repeating_timer_counts_up() {
        let mut engine = engine();
        let clock = engine.registry_mut().create_clock("game");
        engine.registry_mut().get_mut(clock).unwrap().add_timer("tick", 1.0, true);

        for _ in 0..4 {
            engine.frame(0.5);
        }
        let fired = timer_events(&drain(&mut engine));
        assert_eq!(fired, vec![("tick".to_string(), 1), ("tick".to_string(), 2)]);
    }

    #[test]
    fn manual_clock_is_not_auto_ticked() {
        let mut engine = engine();
        let clock = engine.registry_mut().create_clock("manual");
        let record = engine.registry_mut().get_mut(clock).unwrap();
        record.set_auto_update(false);
        record.add_timer("t", 0.1, false);

        engine.frame(0.5);
        assert!(drain(&mut engine).is_empty());

        assert_eq!(engine.tick_clock(clock, 0.5), 1);
        assert_eq!(timer_events(&drain(&mut engine)).len(), 1);
    }

    #[test]
    fn long_frame_is_reported() {
        let mut engine = bare_engine();
        engine.frame(0.1);
        assert_eq!(engine.poll(), None);

        engine.frame(0.5);
        assert_eq!(engine.poll(), Some(Event::LongFrame { dt: 0.5 }));
    }

    #[test]
    fn animation_completion_is_queued() {
        let mut engine = bare_engine();
        let animation = engine.registry_mut().create_animation(Animation::new(64, 16, 16, 16, 0.5));

        assert_eq!(engine.update_animation(animation, 2.5), 1);
        assert_eq!(engine.poll(), Some(Event::AnimationFinished { animation }));
        assert_eq!(engine.update_animation(animation, 1.0), 0);
        assert_eq!(engine.poll(), None);
    }

    //=====================================================================
    // Dispatch Tests
    //=====================================================================

    #[test]
    fn handler_runs_before_poll_returns() {
        let mut engine = engine();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        engine.set_handler(move |_, _| counter.set(counter.get() + 1));

        tap(&engine, 1.0, KeyCode::Space);
        assert_eq!(engine.pending_count(), 2);
        engine.poll();
        assert_eq!(calls.get(), 1);
        engine.poll();
        assert_eq!(calls.get(), 2);

        engine.clear_handler();
        tap(&engine, 2.0, KeyCode::Space);
        drain(&mut engine);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn wait_returns_none_on_wake() {
        let mut engine = bare_engine();
        let sender = engine.event_sender();
        let producer = std::thread::spawn(move || {
            sender.wake();
        });

        assert_eq!(engine.wait(), None);
        producer.join().unwrap();
    }

    #[test]
    fn wake_posted_before_wait_is_not_lost() {
        let mut engine = bare_engine();
        assert!(engine.event_sender().wake());
        assert_eq!(engine.wait(), None);
    }

    //=====================================================================
    // Controller Tests
    //=====================================================================

    #[test]
    fn controller_lifecycle_through_sender() {
        let mut engine = engine();
        let sender = engine.event_sender();
        sender.post(RawEvent::new(1.0, RawEventKind::ControllerAdded { instance: 3, name: "Pad".into() }));
        sender.post(RawEvent::new(1.1, RawEventKind::ControllerAxis { instance: 3, axis: ControllerAxis::LeftX, value: i16::MAX }));
        sender.post(RawEvent::new(1.2, RawEventKind::ControllerAxis { instance: 3, axis: ControllerAxis::TriggerRight, value: i16::MAX }));

        let Some(Event::ControllerInsert { controller, instance: 3 }) = engine.poll() else {
            panic!("Expected ControllerInsert");
        };
        assert!(matches!(engine.poll(), Some(Event::ControllerStick { which: Stick::Left, .. })));
        assert!(matches!(engine.poll(), Some(Event::ControllerTrigger { which: Trigger::Right, .. })));

        assert!(engine.controller_stick(controller, Stick::Left).magnitude > 0.99);
        assert_eq!(engine.controller_trigger(controller, Trigger::Right), 1.0);
        assert_eq!(engine.pressed_time(controller, crate::core::input::ControllerButton::A), 1.0);

        let wide = Deadzone::new(DeadzoneMode::Axial, 0.3);
        engine.set_controller_deadzone(controller, Stick::Left, wide);
        assert_eq!(engine.controller_deadzone(controller, Stick::Left), wide);

        sender.post(RawEvent::new(2.0, RawEventKind::ControllerRemoved { instance: 3 }));
        assert!(matches!(engine.poll(), Some(Event::ControllerRemove { instance: 3, .. })));
        assert_eq!(engine.controller_stick(controller, Stick::Left), StickState::ZERO);
        assert_eq!(engine.controller_deadzone(controller, Stick::Left), Deadzone::default());
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn shutdown_closes_everything() {
        let mut engine = engine();
        let w = engine.registry_mut().create_window(1, "main", 320, 240);
        engine.registry_mut().create_texture(w, 8, 8);
        engine.registry_mut().create_clock("game");
        engine.shutdown();
    }

    #[test]
    fn drop_tears_down_without_shutdown() {
        let mut engine = engine();
        engine.registry_mut().create_clock("game");
        drop(engine);
    }
}
