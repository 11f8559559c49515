//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_input::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Events
pub use crate::core::event::Event;
pub use crate::platform::{EventSender, RawEvent, RawEventKind, WindowChange, WinitTranslator};

// Devices
pub use crate::core::input::{
    Controller, ControllerAxis, ControllerButton, InputDevice, KeyCode, Keyboard, Modifiers, Mouse,
    MouseButton, Stick, Trigger,
};
pub use crate::core::registry::{DeviceKind, DeviceRegistry, Font, Handle, Texture, Window};

// Analog shaping
pub use crate::core::deadzone::{Deadzone, DeadzoneMode, StickState};

// Timing
pub use crate::core::animation::{Animation, FrameRect};
pub use crate::core::clock::{Clock, ClockFormatError, TimerFired};
