//=========================================================================
// Keyboard
//=========================================================================
//
// Device record for one keyboard: key down-state, edge timing, press
// history and the modifier state seen on the most recent key event.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::codes::{KeyCode, KeySet, Modifiers};
use super::timing::DeviceInputs;

//=== Keyboard ============================================================

/// Tracked state of a keyboard.
#[derive(Clone, Default)]
pub struct Keyboard {
    inputs: DeviceInputs<KeyCode>,
    modifiers: Modifiers,
}

impl Keyboard {
    /// Fresh keyboard with every key timestamp backfilled to `time`.
    pub(crate) fn inserted_at(time: f64) -> Self {
        let mut keyboard = Self::default();
        keyboard.inputs.timing_mut().backfill(time);
        keyboard
    }

    pub fn inputs(&self) -> &DeviceInputs<KeyCode> {
        &self.inputs
    }

    /// Keys currently held.
    pub fn keys_down(&self) -> KeySet {
        self.inputs.down()
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.inputs.is_down(key)
    }

    /// Modifiers carried by the last key event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Applies a key edge. Returns `false` for a press of a held key or a
    /// release of a key that is up.
    pub(crate) fn key(&mut self, key: KeyCode, mods: Modifiers, pressed: bool, time: f64) -> bool {
        self.modifiers = mods;
        if pressed {
            self.inputs.press(key, time)
        } else {
            self.inputs.release(key, time)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
