//=========================================================================
// Stage 1: Translate
//=========================================================================
//
// Pure mapping from a raw record to a normalized event.
//
// Reads the registry but never changes it, so a record may be translated
// any number of times (peeking, pending counts) before it is consumed.
// Insertion records come out with a dangling handle; `apply` fills it in.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::event::Event;
use crate::core::input::codes::AxisTarget;
use crate::core::input::controller::normalize_trigger;
use crate::core::registry::{DeviceRegistry, Handle};
use crate::platform::{RawEvent, RawEventKind, WindowChange};

//=== Divergence ==========================================================

/// The raw stream names a device the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Divergence {
    #[error("key event with no keyboard registered (keyboards are inserted at start-up)")]
    MissingKeyboard,

    #[error("event for unregistered mouse instance {0} (mice are inserted at start-up)")]
    UnknownMouse(u32),

    #[error("event for unregistered controller instance {0}")]
    UnknownController(u32),
}

//=== translate() =========================================================

/// Maps `raw` onto a normalized event.
///
/// # Panics
///
/// Panics if the record refers to a keyboard, mouse or controller the
/// registry does not hold.
pub fn translate(registry: &DeviceRegistry, raw: &RawEvent) -> Event {
    try_translate(registry, raw).unwrap_or_else(|divergence| panic!("{}", divergence))
}

/// Non-panicking form of [`translate`].
pub fn try_translate(registry: &DeviceRegistry, raw: &RawEvent) -> Result<Event, Divergence> {
    let event = match &raw.kind {
        RawEventKind::Quit => Event::Quit,
        RawEventKind::Wake => Event::Nothing,

        RawEventKind::Window { window, change } => translate_window(registry, *window, *change),

        //--- Keyboard -----------------------------------------------------
        RawEventKind::Key { repeat: true, .. } => Event::Nothing,
        RawEventKind::Key { key, mods, pressed, .. } => Event::KeyboardKey {
            keyboard: registry.primary_keyboard().ok_or(Divergence::MissingKeyboard)?,
            key: *key,
            mods: *mods,
            pressed: *pressed,
        },
        RawEventKind::KeyboardAdded => Event::KeyboardInsert { keyboard: Handle::dangling() },

        //--- Mouse --------------------------------------------------------
        RawEventKind::MouseAdded { .. } => Event::MouseInsert { mouse: Handle::dangling() },
        RawEventKind::MouseMotion { mouse, window, x, y, dx, dy, buttons } => Event::MouseMotion {
            mouse: registry.mouse_by_instance(*mouse).ok_or(Divergence::UnknownMouse(*mouse))?,
            window: window.and_then(|w| registry.window_by_instance(w)),
            x: *x,
            y: *y,
            dx: *dx,
            dy: *dy,
            buttons: *buttons,
        },
        RawEventKind::MouseButton { mouse, button, pressed } => Event::MouseButton {
            mouse: registry.mouse_by_instance(*mouse).ok_or(Divergence::UnknownMouse(*mouse))?,
            button: *button,
            pressed: *pressed,
        },
        RawEventKind::MouseWheel { mouse, x, y } => Event::MouseWheel {
            mouse: registry.mouse_by_instance(*mouse).ok_or(Divergence::UnknownMouse(*mouse))?,
            x: *x,
            y: *y,
        },

        //--- Controller ---------------------------------------------------
        RawEventKind::ControllerAdded { instance, .. } => Event::ControllerInsert {
            controller: Handle::dangling(),
            instance: *instance,
        },
        RawEventKind::ControllerRemoved { instance } => {
            match registry.controller_by_instance(*instance) {
                Some(controller) => Event::ControllerRemove { controller, instance: *instance },
                None => {
                    debug!(target: "pipeline", "Removal of unknown controller {}", instance);
                    Event::Nothing
                }
            }
        }
        RawEventKind::ControllerAxis { instance, axis, value } => {
            let controller = registry
                .controller_by_instance(*instance)
                .ok_or(Divergence::UnknownController(*instance))?;
            match axis.target() {
                AxisTarget::Stick { .. } => {
                    let pad = registry
                        .get(controller)
                        .ok_or(Divergence::UnknownController(*instance))?;
                    match pad.stick_with(*axis, *value) {
                        Some((which, stick)) => Event::ControllerStick { controller, which, stick },
                        None => Event::Nothing,
                    }
                }
                AxisTarget::Trigger(which) => Event::ControllerTrigger {
                    controller,
                    which,
                    value: normalize_trigger(*value),
                },
            }
        }
        RawEventKind::ControllerButton { instance, button, pressed } => Event::ControllerButton {
            controller: registry
                .controller_by_instance(*instance)
                .ok_or(Divergence::UnknownController(*instance))?,
            button: *button,
            pressed: *pressed,
        },

        //--- Audio --------------------------------------------------------
        RawEventKind::SoundFinished { sound } => Event::SoundFinished { sound: *sound },
        RawEventKind::MusicFinished => Event::MusicFinished,

        RawEventKind::Unknown(discriminant) => {
            debug!(target: "pipeline", "Unknown raw discriminant {:#x}", discriminant);
            Event::Nothing
        }
    };
    Ok(event)
}

//--- Window Changes ------------------------------------------------------

fn translate_window(registry: &DeviceRegistry, instance: u32, change: WindowChange) -> Event {
    let Some(window) = registry.window_by_instance(instance) else {
        debug!(target: "pipeline", "{:?} for unregistered window {}", change, instance);
        return Event::Nothing;
    };

    match change {
        WindowChange::Shown => Event::WindowVisibilityChange { window, visible: true },
        WindowChange::Hidden => Event::WindowVisibilityChange { window, visible: false },
        WindowChange::Exposed => Event::WindowRedraw { window },
        WindowChange::Moved { x, y } => Event::WindowMove { window, x, y },
        WindowChange::Resized { width, height } => {
            let unchanged = registry
                .get(window)
                .is_some_and(|w| w.size() == (width, height));
            if unchanged {
                Event::Nothing
            } else {
                Event::WindowResize { window, width, height }
            }
        }
        WindowChange::Enter => Event::WindowMouseEnter { window },
        WindowChange::Leave => Event::WindowMouseLeave { window },
        WindowChange::FocusGained => Event::WindowGainFocus { window },
        WindowChange::FocusLost => Event::WindowLoseFocus { window },
        WindowChange::Close => Event::WindowClose { window },
        WindowChange::Minimized
        | WindowChange::Maximized
        | WindowChange::Restored
        | WindowChange::TakeFocus => Event::Nothing,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
