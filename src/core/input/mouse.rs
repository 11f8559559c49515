//=========================================================================
// Mouse
//=========================================================================
//
// Device record for one mouse: button down-state, edge timing and press
// history, plus cursor position, hovered window and wheel accumulator.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::codes::{MouseButton, MouseButtons};
use super::timing::DeviceInputs;
use crate::core::registry::{Handle, Window};

//=== Mouse ===============================================================

/// Tracked state of a mouse.
#[derive(Clone)]
pub struct Mouse {
    instance: u32,
    inputs: DeviceInputs<MouseButton>,
    x: f32,
    y: f32,
    window: Option<Handle<Window>>,
    wheel: (f32, f32),
}

impl Mouse {
    pub(crate) fn inserted_at(instance: u32, time: f64) -> Self {
        let mut inputs = DeviceInputs::new();
        inputs.timing_mut().backfill(time);
        Self {
            instance,
            inputs,
            x: 0.0,
            y: 0.0,
            window: None,
            wheel: (0.0, 0.0),
        }
    }

    /// Platform instance id.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn inputs(&self) -> &DeviceInputs<MouseButton> {
        &self.inputs
    }

    pub fn buttons(&self) -> MouseButtons {
        self.inputs.down()
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.inputs.is_down(button)
    }

    /// Last cursor position, relative to [`window`](Self::window).
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Window the cursor was last seen over.
    pub fn window(&self) -> Option<Handle<Window>> {
        self.window
    }

    /// Sum of all wheel deltas since insertion.
    pub fn wheel(&self) -> (f32, f32) {
        self.wheel
    }

    pub(crate) fn button(&mut self, button: MouseButton, pressed: bool, time: f64) -> bool {
        if pressed {
            self.inputs.press(button, time)
        } else {
            self.inputs.release(button, time)
        }
    }

    pub(crate) fn motion(&mut self, window: Option<Handle<Window>>, x: f32, y: f32) {
        self.window = window;
        self.x = x;
        self.y = y;
    }

    pub(crate) fn scroll(&mut self, dx: f32, dy: f32) {
        self.wheel.0 += dx;
        self.wheel.1 += dy;
    }

    pub(crate) fn leave(&mut self, window: Handle<Window>) {
        if self.window == Some(window) {
            self.window = None;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_tracks_position_and_window() {
        let mut m = Mouse::inserted_at(0, 0.0);
        let w: Handle<Window> = Handle::new(0, 0);
        m.motion(Some(w), 10.0, 20.0);
        assert_eq!(m.position(), (10.0, 20.0));
        assert_eq!(m.window(), Some(w));

        m.leave(w);
        assert_eq!(m.window(), None);
    }

    #[test]
    fn wheel_accumulates() {
        let mut m = Mouse::inserted_at(0, 0.0);
        m.scroll(0.0, 1.0);
        m.scroll(0.5, -3.0);
        assert_eq!(m.wheel(), (0.5, -2.0));
    }

    #[test]
    fn buttons_reflect_down_state() {
        let mut m = Mouse::inserted_at(0, 0.0);
        m.button(MouseButton::Left, true, 1.0);
        m.button(MouseButton::Right, true, 1.1);
        m.button(MouseButton::Left, false, 1.2);
        assert_eq!(m.buttons(), MouseButtons::single(MouseButton::Right));
    }
}
