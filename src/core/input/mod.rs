//=========================================================================
// Input Devices
//=========================================================================
//
// Input codes, per-device trackers and the device records for keyboards,
// mice and game controllers.
//
// Architecture:
//   codes     → KeyCode / MouseButton / ControllerButton, InputSet bitmask
//   timing    → PressTiming + DeviceInputs (down-state, edges, history)
//   history   → 64-deep ring of press snapshots
//   keyboard / mouse / controller → device records stored in the registry
//
//=========================================================================

//=== Submodules ==========================================================

pub mod codes;
pub mod controller;
pub mod history;
pub mod keyboard;
pub mod mouse;
pub mod timing;

//=== Re-exports ==========================================================

pub use codes::{
    ControllerAxis, ControllerButton, ControllerButtons, InputCode, InputSet, KeyCode, KeySet,
    Modifiers, MouseButton, MouseButtons, Stick, Trigger,
};
pub use controller::Controller;
pub use history::{InputHistory, HISTORY_DEPTH};
pub use keyboard::Keyboard;
pub use mouse::Mouse;
pub use timing::{DeviceInputs, PressRecord, PressTiming};

//=== Internal Dependencies ===============================================

use crate::core::registry::DeviceKind;

//=== InputDevice =========================================================

/// A registry record that owns press/release tracking.
///
/// Lets timing and history queries be written once for every device kind.
pub trait InputDevice: DeviceKind {
    type Input: InputCode;

    fn inputs(&self) -> &DeviceInputs<Self::Input>;
}

impl InputDevice for Keyboard {
    type Input = KeyCode;

    fn inputs(&self) -> &DeviceInputs<KeyCode> {
        Keyboard::inputs(self)
    }
}

impl InputDevice for Mouse {
    type Input = MouseButton;

    fn inputs(&self) -> &DeviceInputs<MouseButton> {
        Mouse::inputs(self)
    }
}

impl InputDevice for Controller {
    type Input = ControllerButton;

    fn inputs(&self) -> &DeviceInputs<ControllerButton> {
        Controller::inputs(self)
    }
}
