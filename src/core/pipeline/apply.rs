//=========================================================================
// Stage 2: Apply
//=========================================================================
//
// Commits a translated event to the registry. Runs exactly once for each
// raw record that is actually consumed.
//
// Responsibilities:
// - Insert and remove keyboard, mouse and controller records
// - Replace the dangling handle of insertion events with the new record
// - Update press timing, history, cursor and shadow stick state
// - Mirror window geometry, focus and visibility
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::deadzone::Deadzone;
use crate::core::event::Event;
use crate::core::input::{Controller, Keyboard, Mouse};
use crate::core::registry::DeviceRegistry;
use crate::platform::{RawEvent, RawEventKind};

//=== apply() =============================================================

/// Applies `event` (the translation of `raw`) and returns it with any
/// placeholder handles resolved.
///
/// # Panics
///
/// Panics on a second insertion of a device that is already registered.
pub fn apply(registry: &mut DeviceRegistry, default_deadzone: Deadzone, raw: &RawEvent, event: Event) -> Event {
    let time = raw.timestamp;

    match event {
        //--- Insertion & Removal ------------------------------------------
        Event::KeyboardInsert { .. } => {
            if let Some(existing) = registry.primary_keyboard() {
                panic!("keyboard inserted twice (already registered as {:?})", existing);
            }
            let keyboard = registry.insert(Keyboard::inserted_at(time));
            info!(target: "pipeline", "Keyboard inserted");
            Event::KeyboardInsert { keyboard }
        }

        Event::MouseInsert { .. } => {
            let instance = match raw.kind {
                RawEventKind::MouseAdded { mouse } => mouse,
                _ => 0,
            };
            if registry.mouse_by_instance(instance).is_some() {
                panic!("mouse {} inserted twice", instance);
            }
            let mouse = registry.insert(Mouse::inserted_at(instance, time));
            info!(target: "pipeline", "Mouse {} inserted", instance);
            Event::MouseInsert { mouse }
        }

        Event::ControllerInsert { instance, .. } => {
            if registry.controller_by_instance(instance).is_some() {
                panic!("controller {} inserted twice", instance);
            }
            let name = match &raw.kind {
                RawEventKind::ControllerAdded { name, .. } => name.clone(),
                _ => String::new(),
            };
            info!(target: "pipeline", "Controller {} inserted ({})", instance, name);
            let controller = registry.insert(Controller::inserted_at(instance, name, default_deadzone, time));
            Event::ControllerInsert { controller, instance }
        }

        Event::ControllerRemove { controller, instance } => {
            registry.close(controller);
            info!(target: "pipeline", "Controller {} removed", instance);
            Event::ControllerRemove { controller, instance }
        }

        //--- Keyboard -----------------------------------------------------
        Event::KeyboardKey { keyboard, key, mods, pressed } => {
            if let Some(kb) = registry.get_mut(keyboard) {
                kb.key(key, mods, pressed, time);
            }
            event
        }

        //--- Mouse --------------------------------------------------------
        Event::MouseMotion { mouse, window, x, y, .. } => {
            if let Some(m) = registry.get_mut(mouse) {
                m.motion(window, x, y);
            }
            event
        }

        Event::MouseButton { mouse, button, pressed } => {
            if let Some(m) = registry.get_mut(mouse) {
                m.button(button, pressed, time);
            }
            event
        }

        Event::MouseWheel { mouse, x, y } => {
            if let Some(m) = registry.get_mut(mouse) {
                m.scroll(x, y);
            }
            event
        }

        //--- Controller ---------------------------------------------------
        Event::ControllerButton { controller, button, pressed } => {
            if let Some(c) = registry.get_mut(controller) {
                c.button(button, pressed, time);
            }
            event
        }

        Event::ControllerStick { controller, .. } | Event::ControllerTrigger { controller, .. } => {
            if let RawEventKind::ControllerAxis { axis, value, .. } = raw.kind {
                if let Some(c) = registry.get_mut(controller) {
                    c.set_axis(axis, value);
                }
            }
            event
        }

        //--- Window -------------------------------------------------------
        Event::WindowMove { window, x, y } => {
            if let Some(w) = registry.get_mut(window) {
                w.set_position(x, y);
            }
            event
        }

        Event::WindowResize { window, width, height } => {
            if let Some(w) = registry.get_mut(window) {
                w.set_size(width, height);
            }
            event
        }

        Event::WindowGainFocus { window } | Event::WindowLoseFocus { window } => {
            let focused = matches!(event, Event::WindowGainFocus { .. });
            if let Some(w) = registry.get_mut(window) {
                w.set_focused(focused);
            }
            event
        }

        Event::WindowVisibilityChange { window, visible } => {
            if let Some(w) = registry.get_mut(window) {
                w.set_visible(visible);
            }
            event
        }

        Event::WindowMouseLeave { window } => {
            for mouse in registry.list::<Mouse>() {
                if let Some(m) = registry.get_mut(mouse) {
                    m.leave(window);
                }
            }
            event
        }

        other => other,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadzone::DeadzoneMode;
    use crate::core::input::{ControllerAxis, ControllerButton, KeyCode, Modifiers, MouseButton, Stick};
    use crate::core::pipeline::translate::translate;
    use crate::core::registry::Window;
    use crate::platform::WindowChange;

    //--- Test Helpers -----------------------------------------------------

    fn registry() -> DeviceRegistry {
        let mut reg = DeviceRegistry::with_seed(3);
        reg.insert(Keyboard::inserted_at(0.0));
        reg.insert(Mouse::inserted_at(0, 0.0));
        reg
    }

    /// Runs both stages, as the pipeline does for a consumed record.
    fn consume(reg: &mut DeviceRegistry, time: f64, kind: RawEventKind) -> Event {
        let raw = RawEvent::new(time, kind);
        let event = translate(reg, &raw);
        apply(reg, Deadzone::default(), &raw, event)
    }

    fn key(key: KeyCode, pressed: bool) -> RawEventKind {
        RawEventKind::Key { key, mods: Modifiers::NONE, pressed, repeat: false }
    }

    //=====================================================================
    // Insertion Tests
    //=====================================================================

    #[test]
    fn controller_insert_creates_seeded_record() {
        let mut reg = registry();
        let event = consume(&mut reg, 4.0, RawEventKind::ControllerAdded { instance: 6, name: "Pad".into() });

        let Event::ControllerInsert { controller, instance } = event else {
            panic!("Expected ControllerInsert, got {:?}", event);
        };
        assert_eq!(instance, 6);
        assert!(!controller.is_dangling());

        let pad = reg.get(controller).unwrap();
        assert_eq!(pad.name(), "Pad");
        assert_eq!(pad.deadzone(Stick::Left), Deadzone::new(DeadzoneMode::Radial, 0.1));
        assert_eq!(pad.deadzone(Stick::Right), Deadzone::new(DeadzoneMode::Radial, 0.1));
        assert_eq!(pad.inputs().timing().pressed_time(ControllerButton::X), 4.0);
    }

    #[test]
    fn controller_remove_closes_record() {
        let mut reg = registry();
        let Event::ControllerInsert { controller, .. } =
            consume(&mut reg, 0.0, RawEventKind::ControllerAdded { instance: 6, name: "Pad".into() })
        else {
            panic!("Expected ControllerInsert");
        };

        let removed = consume(&mut reg, 1.0, RawEventKind::ControllerRemoved { instance: 6 });
        assert_eq!(removed, Event::ControllerRemove { controller, instance: 6 });
        assert!(!reg.is_open(controller));
    }

    #[test]
    #[should_panic(expected = "inserted twice")]
    fn duplicate_controller_insert_panics() {
        let mut reg = registry();
        consume(&mut reg, 0.0, RawEventKind::ControllerAdded { instance: 6, name: "Pad".into() });
        consume(&mut reg, 0.1, RawEventKind::ControllerAdded { instance: 6, name: "Pad".into() });
    }

    #[test]
    #[should_panic(expected = "keyboard inserted twice")]
    fn duplicate_keyboard_insert_panics() {
        let mut reg = registry();
        consume(&mut reg, 0.0, RawEventKind::KeyboardAdded);
    }

    //=====================================================================
    // Tracker Tests
    //=====================================================================

    #[test]
    fn key_press_updates_timing_and_history() {
        let mut reg = registry();
        consume(&mut reg, 1.0, key(KeyCode::KeyA, true));
        consume(&mut reg, 1.5, key(KeyCode::KeyA, false));

        let kb = reg.get(reg.primary_keyboard().unwrap()).unwrap();
        let timing = kb.inputs().timing();
        assert_eq!(timing.last_pressed().map(|r| r.input), Some(KeyCode::KeyA));
        assert_eq!(timing.released_time(KeyCode::KeyA), 1.5);
        assert!(!kb.is_down(KeyCode::KeyA));
    }

    #[test]
    fn stick_axis_commits_shadow_value() {
        let mut reg = registry();
        let Event::ControllerInsert { controller, .. } =
            consume(&mut reg, 0.0, RawEventKind::ControllerAdded { instance: 1, name: "Pad".into() })
        else {
            panic!("Expected ControllerInsert");
        };

        consume(&mut reg, 0.1, RawEventKind::ControllerAxis { instance: 1, axis: ControllerAxis::RightX, value: 30000 });
        let event = consume(&mut reg, 0.2, RawEventKind::ControllerAxis { instance: 1, axis: ControllerAxis::RightY, value: 30000 });

        let pad = reg.get(controller).unwrap();
        assert_eq!(pad.raw_axis(ControllerAxis::RightX), 30000);
        assert_eq!(pad.raw_axis(ControllerAxis::RightY), 30000);
        match event {
            Event::ControllerStick { stick, .. } => assert_eq!(stick, pad.stick(Stick::Right)),
            other => panic!("Expected ControllerStick, got {:?}", other),
        }
    }

    #[test]
    fn mouse_events_update_record() {
        let mut reg = registry();
        let w = reg.create_window(2, "main", 100, 100);
        consume(&mut reg, 0.1, RawEventKind::MouseMotion {
            mouse: 0, window: Some(2), x: 5.0, y: 6.0, dx: 5.0, dy: 6.0, buttons: Default::default(),
        });
        consume(&mut reg, 0.2, RawEventKind::MouseButton { mouse: 0, button: MouseButton::Middle, pressed: true });
        consume(&mut reg, 0.3, RawEventKind::MouseWheel { mouse: 0, x: 0.0, y: 2.0 });

        let m = reg.get(reg.primary_mouse().unwrap()).unwrap();
        assert_eq!(m.position(), (5.0, 6.0));
        assert_eq!(m.window(), Some(w));
        assert!(m.is_down(MouseButton::Middle));
        assert_eq!(m.wheel(), (0.0, 2.0));

        consume(&mut reg, 0.4, RawEventKind::Window { window: 2, change: WindowChange::Leave });
        let m = reg.get(reg.primary_mouse().unwrap()).unwrap();
        assert_eq!(m.window(), None);
    }

    //=====================================================================
    // Window Tests
    //=====================================================================

    #[test]
    fn window_state_is_mirrored() {
        let mut reg = registry();
        let w = reg.create_window(2, "main", 100, 100);

        consume(&mut reg, 0.1, RawEventKind::Window { window: 2, change: WindowChange::Moved { x: 30, y: 40 } });
        consume(&mut reg, 0.2, RawEventKind::Window { window: 2, change: WindowChange::Resized { width: 200, height: 150 } });
        consume(&mut reg, 0.3, RawEventKind::Window { window: 2, change: WindowChange::FocusGained });
        consume(&mut reg, 0.4, RawEventKind::Window { window: 2, change: WindowChange::Hidden });

        let window: &Window = reg.get(w).unwrap();
        assert_eq!(window.position(), (30, 40));
        assert_eq!(window.size(), (200, 150));
        assert!(window.is_focused());
        assert!(!window.is_visible());

        // Same size again is filtered in stage 1.
        let again = consume(&mut reg, 0.5, RawEventKind::Window { window: 2, change: WindowChange::Resized { width: 200, height: 150 } });
        assert!(again.is_nothing());
    }
}
