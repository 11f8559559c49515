//=========================================================================
// Normalized Events
//=========================================================================
//
// Platform-independent event stream handed to the application.
//
// Device-bearing variants carry typed handles into the registry; every
// handle refers to a record that was open when the event was produced.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::animation::Animation;
use crate::core::clock::Clock;
use crate::core::deadzone::StickState;
use crate::core::input::{
    Controller, ControllerButton, KeyCode, Keyboard, Modifiers, Mouse, MouseButton, MouseButtons,
    Stick, Trigger,
};
use crate::core::registry::{Handle, Window};

//=== Event ===============================================================

/// Normalized application event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The application was asked to quit.
    Quit,

    //--- Window -----------------------------------------------------------
    WindowMove {
        window: Handle<Window>,
        x: i32,
        y: i32,
    },
    WindowResize {
        window: Handle<Window>,
        width: u32,
        height: u32,
    },
    WindowClose {
        window: Handle<Window>,
    },
    WindowRedraw {
        window: Handle<Window>,
    },
    WindowGainFocus {
        window: Handle<Window>,
    },
    WindowLoseFocus {
        window: Handle<Window>,
    },
    WindowMouseEnter {
        window: Handle<Window>,
    },
    WindowMouseLeave {
        window: Handle<Window>,
    },
    WindowVisibilityChange {
        window: Handle<Window>,
        visible: bool,
    },

    //--- Keyboard ---------------------------------------------------------
    KeyboardKey {
        keyboard: Handle<Keyboard>,
        key: KeyCode,
        mods: Modifiers,
        pressed: bool,
    },
    KeyboardInsert {
        keyboard: Handle<Keyboard>,
    },

    //--- Mouse ------------------------------------------------------------
    MouseMotion {
        mouse: Handle<Mouse>,
        window: Option<Handle<Window>>,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        buttons: MouseButtons,
    },
    MouseButton {
        mouse: Handle<Mouse>,
        button: MouseButton,
        pressed: bool,
    },
    MouseWheel {
        mouse: Handle<Mouse>,
        x: f32,
        y: f32,
    },
    MouseInsert {
        mouse: Handle<Mouse>,
    },

    //--- Controller -------------------------------------------------------
    ControllerButton {
        controller: Handle<Controller>,
        button: ControllerButton,
        pressed: bool,
    },
    /// Shaped stick position after one of its axes moved.
    ControllerStick {
        controller: Handle<Controller>,
        which: Stick,
        stick: StickState,
    },
    ControllerTrigger {
        controller: Handle<Controller>,
        which: Trigger,
        value: f64,
    },
    ControllerInsert {
        controller: Handle<Controller>,
        instance: u32,
    },
    /// The handle is already closed when this is delivered.
    ControllerRemove {
        controller: Handle<Controller>,
        instance: u32,
    },

    //--- Scheduling -------------------------------------------------------
    AnimationFinished {
        animation: Handle<Animation>,
    },
    /// `seconds` is the overshoot past the timer's threshold; `repeat`
    /// counts previous firings of a repeating timer.
    Timer {
        name: String,
        seconds: f64,
        repeat: i32,
        clock: Handle<Clock>,
    },
    /// A frame took longer than the configured threshold.
    LongFrame {
        dt: f64,
    },

    //--- Audio ------------------------------------------------------------
    SoundFinished {
        sound: u32,
    },
    MusicFinished,

    /// Platform notification with no application meaning.
    Nothing,
}

impl Event {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Event::Nothing)
    }

    /// Stable variant name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Quit => "quit",
            Event::WindowMove { .. } => "window_move",
            Event::WindowResize { .. } => "window_resize",
            Event::WindowClose { .. } => "window_close",
            Event::WindowRedraw { .. } => "window_redraw",
            Event::WindowGainFocus { .. } => "window_gain_focus",
            Event::WindowLoseFocus { .. } => "window_lose_focus",
            Event::WindowMouseEnter { .. } => "window_mouse_enter",
            Event::WindowMouseLeave { .. } => "window_mouse_leave",
            Event::WindowVisibilityChange { .. } => "window_visibility_change",
            Event::KeyboardKey { .. } => "keyboard_key",
            Event::KeyboardInsert { .. } => "keyboard_insert",
            Event::MouseMotion { .. } => "mouse_motion",
            Event::MouseButton { .. } => "mouse_button",
            Event::MouseWheel { .. } => "mouse_wheel",
            Event::MouseInsert { .. } => "mouse_insert",
            Event::ControllerButton { .. } => "controller_button",
            Event::ControllerStick { .. } => "controller_stick",
            Event::ControllerTrigger { .. } => "controller_trigger",
            Event::ControllerInsert { .. } => "controller_insert",
            Event::ControllerRemove { .. } => "controller_remove",
            Event::AnimationFinished { .. } => "animation_finished",
            Event::Timer { .. } => "timer",
            Event::LongFrame { .. } => "long_frame",
            Event::SoundFinished { .. } => "sound_finished",
            Event::MusicFinished => "music_finished",
            Event::Nothing => "nothing",
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Event::Nothing
    }
}
