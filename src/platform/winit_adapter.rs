//=========================================================================
// Winit Adapter
//=========================================================================
//
// Converts winit window events into raw event records.
//
// Architecture:
//   WindowEvent → WinitTranslator → RawEventKind → EventSender::send
//
// Stateful tracking: modifier state from ModifiersChanged is applied to
// every later key event, the last cursor position yields motion deltas,
// and pressed mouse buttons are kept as a mask for motion records. Keys
// with no engine code (F13-F24, numpad, media keys) are filtered.
//
// winit exposes a single pointer per window, so every mouse record names
// mouse instance 0.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::{RawEventKind, WindowChange};
use crate::core::input::{KeyCode, Modifiers, MouseButton, MouseButtons};

//=== Constants ===========================================================

/// Mouse instance id used for the winit pointer.
pub const WINIT_MOUSE: u32 = 0;

//=== WinitTranslator =====================================================

/// Stateful winit → raw record converter.
pub struct WinitTranslator {
    modifiers: Modifiers,
    cursor: Option<(f32, f32)>,
    buttons: MouseButtons,
}

impl WinitTranslator {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            cursor: None,
            buttons: MouseButtons::empty(),
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent key events).
    pub fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts one event of window `window` (the platform window id the
    /// application registered). `None` for events with no raw counterpart.
    pub fn translate(&mut self, window: u32, event: &WindowEvent) -> Option<RawEventKind> {
        match event {
            WindowEvent::CloseRequested => Some(window_change(window, WindowChange::Close)),
            WindowEvent::Resized(size) => Some(window_change(
                window,
                WindowChange::Resized { width: size.width, height: size.height },
            )),
            WindowEvent::Moved(position) => Some(window_change(
                window,
                WindowChange::Moved { x: position.x, y: position.y },
            )),
            WindowEvent::Focused(true) => Some(window_change(window, WindowChange::FocusGained)),
            WindowEvent::Focused(false) => Some(window_change(window, WindowChange::FocusLost)),
            WindowEvent::Occluded(true) => Some(window_change(window, WindowChange::Hidden)),
            WindowEvent::Occluded(false) => Some(window_change(window, WindowChange::Shown)),
            WindowEvent::RedrawRequested => Some(window_change(window, WindowChange::Exposed)),
            WindowEvent::CursorEntered { .. } => Some(window_change(window, WindowChange::Enter)),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(window_change(window, WindowChange::Leave))
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.update_modifiers(modifiers.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.key(event.physical_key, event.state, event.repeat)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_button(*button, *state))
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(window, position.x as f32, position.y as f32))
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Self::wheel(*delta)),
            other => {
                debug!(target: "platform", "Ignoring winit event {:?}", other);
                None
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key(&self, physical: PhysicalKey, state: ElementState, repeat: bool) -> Option<RawEventKind> {
        let key = match physical {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };
        if key == KeyCode::Unidentified {
            return None;
        }
        Some(RawEventKind::Key {
            key,
            mods: self.modifiers,
            pressed: state == ElementState::Pressed,
            repeat,
        })
    }

    fn mouse_button(&mut self, button: WinitMouseButton, state: ElementState) -> RawEventKind {
        let button = MouseButton::from(button);
        let pressed = state == ElementState::Pressed;
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(button);
        }
        RawEventKind::MouseButton { mouse: WINIT_MOUSE, button, pressed }
    }

    fn cursor_moved(&mut self, window: u32, x: f32, y: f32) -> RawEventKind {
        let (dx, dy) = match self.cursor {
            Some((last_x, last_y)) => (x - last_x, y - last_y),
            None => (0.0, 0.0),
        };
        self.cursor = Some((x, y));
        RawEventKind::MouseMotion {
            mouse: WINIT_MOUSE,
            window: Some(window),
            x,
            y,
            dx,
            dy,
            buttons: self.buttons,
        }
    }

    fn wheel(delta: MouseScrollDelta) -> RawEventKind {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(p) => (p.x as f32, p.y as f32),
        };
        RawEventKind::MouseWheel { mouse: WINIT_MOUSE, x, y }
    }
}

impl Default for WinitTranslator {
    fn default() -> Self {
        Self::new()
    }
}

fn window_change(window: u32, change: WindowChange) -> RawEventKind {
    RawEventKind::Window { window, change }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to engine key codes.
///
/// Unmapped keys (F13-F24, numpad, media keys) return
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Function -----------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,

            //--- Navigation & Editing -----------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            Insert => KeyCode::Insert,
            Home => KeyCode::Home,
            End => KeyCode::End,
            PageUp => KeyCode::PageUp,
            PageDown => KeyCode::PageDown,

            //--- Punctuation --------------------------------------------------

            Minus => KeyCode::Minus,
            Equal => KeyCode::Equal,
            BracketLeft => KeyCode::BracketLeft,
            BracketRight => KeyCode::BracketRight,
            Semicolon => KeyCode::Semicolon,
            Quote => KeyCode::Quote,
            Comma => KeyCode::Comma,
            Period => KeyCode::Period,
            Slash => KeyCode::Slash,
            Backslash => KeyCode::Backslash,
            Backquote => KeyCode::Backquote,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(_) => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    //=====================================================================
    // Window Event Tests
    //=====================================================================

    #[test]
    fn close_requested_maps_to_close() {
        let mut t = WinitTranslator::new();
        assert_eq!(
            t.translate(3, &WindowEvent::CloseRequested),
            Some(RawEventKind::Window { window: 3, change: WindowChange::Close })
        );
    }

    #[test]
    fn resize_and_move_carry_geometry() {
        let mut t = WinitTranslator::new();
        assert_eq!(
            t.translate(1, &WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(window_change(1, WindowChange::Resized { width: 800, height: 600 }))
        );
        assert_eq!(
            t.translate(1, &WindowEvent::Moved(PhysicalPosition::new(-5, 40))),
            Some(window_change(1, WindowChange::Moved { x: -5, y: 40 }))
        );
    }

    #[test]
    fn focus_and_occlusion_map_to_changes() {
        let mut t = WinitTranslator::new();
        assert_eq!(
            t.translate(1, &WindowEvent::Focused(true)),
            Some(window_change(1, WindowChange::FocusGained))
        );
        assert_eq!(
            t.translate(1, &WindowEvent::Focused(false)),
            Some(window_change(1, WindowChange::FocusLost))
        );
        assert_eq!(
            t.translate(1, &WindowEvent::Occluded(true)),
            Some(window_change(1, WindowChange::Hidden))
        );
    }

    #[test]
    fn destroyed_is_ignored() {
        let mut t = WinitTranslator::new();
        assert_eq!(t.translate(1, &WindowEvent::Destroyed), None);
    }

    //=====================================================================
    // Input Tests
    //=====================================================================

    #[test]
    fn starts_with_no_modifiers() {
        let t = WinitTranslator::new();
        assert_eq!(t.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn key_carries_sticky_modifiers_and_repeat() {
        let mut t = WinitTranslator::new();
        t.update_modifiers(make_modifiers(false, true, false));

        let kind = t.key(PhysicalKey::Code(WinitKeyCode::KeyS), ElementState::Pressed, true);
        assert_eq!(
            kind,
            Some(RawEventKind::Key { key: KeyCode::KeyS, mods: Modifiers::CTRL, pressed: true, repeat: true })
        );
    }

    #[test]
    fn unmapped_key_is_filtered() {
        let t = WinitTranslator::new();
        assert_eq!(t.key(PhysicalKey::Code(WinitKeyCode::F13), ElementState::Pressed, false), None);
    }

    #[test]
    fn cursor_motion_tracks_delta_and_buttons() {
        let mut t = WinitTranslator::new();
        t.cursor_moved(2, 10.0, 10.0);
        t.mouse_button(WinitMouseButton::Left, ElementState::Pressed);

        match t.cursor_moved(2, 13.0, 6.0) {
            RawEventKind::MouseMotion { window, x, y, dx, dy, buttons, .. } => {
                assert_eq!(window, Some(2));
                assert_eq!((x, y), (13.0, 6.0));
                assert_eq!((dx, dy), (3.0, -4.0));
                assert!(buttons.contains(MouseButton::Left));
            }
            other => panic!("Expected MouseMotion, got {:?}", other),
        }
    }

    #[test]
    fn first_motion_has_zero_delta() {
        let mut t = WinitTranslator::new();
        match t.cursor_moved(1, 50.0, 50.0) {
            RawEventKind::MouseMotion { dx, dy, .. } => assert_eq!((dx, dy), (0.0, 0.0)),
            other => panic!("Expected MouseMotion, got {:?}", other),
        }
    }

    #[test]
    fn pixel_wheel_delta_is_passed_through() {
        let kind = WinitTranslator::wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -12.0)));
        assert_eq!(kind, RawEventKind::MouseWheel { mouse: WINIT_MOUSE, x: 0.0, y: -12.0 });
    }

    //=====================================================================
    // Conversion Tests
    //=====================================================================

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::F12), KeyCode::F12);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftRight), KeyCode::ShiftRight);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadAdd), KeyCode::Unidentified);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Back);
        assert_eq!(MouseButton::from(WinitMouseButton::Other(9)), MouseButton::Other);
    }

    #[test]
    fn modifier_conversion() {
        let mods = Modifiers::from(make_modifiers(true, false, true));
        assert!(mods.shift && !mods.ctrl && mods.alt);
    }
}
