//=========================================================================
// Input Codes
//
// Platform-independent identifiers for keys, mouse buttons and
// controller inputs, plus the compact down-state sets built from them.
//
// Responsibilities:
// - Represent keyboard keys, mouse buttons and controller buttons/axes
//   in a stable, portable way
// - Give every discrete input a dense index (`InputCode`) so trackers
//   can keep per-input tables and bitmask snapshots
// - Support modifier key combinations (Shift, Ctrl, Alt)
//
// Design:
// - All codes are `Copy` + `Hash`
// - `InputSet<I>` is a 128-bit mask, cheap to copy into history buffers
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::marker::PhantomData;

//=== InputCode ===========================================================

/// A discrete input with a dense index in `0..COUNT`.
pub trait InputCode: Copy + Eq + fmt::Debug + 'static {
    /// Number of distinct codes. Must not exceed 128.
    const COUNT: usize;

    /// Dense index of this code.
    fn index(self) -> usize;

    /// Inverse of [`index`](Self::index).
    fn from_index(index: usize) -> Option<Self>;
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `Unidentified` covers keys the platform reports but the engine does
/// not name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown, ArrowLeft, ArrowRight, ArrowUp,

    //--- Modifier Keys ----------------------------------------------------
    ShiftLeft, ShiftRight, ControlLeft, ControlRight, AltLeft, AltRight,

    //--- Special Keys -----------------------------------------------------
    Space, Enter, Escape, Tab, Backspace, Delete, Insert,
    Home, End, PageUp, PageDown,
    Minus, Equal, BracketLeft, BracketRight, Semicolon, Quote,
    Comma, Period, Slash, Backslash, Backquote,

    /// Fallback for keys not explicitly mapped.
    Unidentified,
}

impl KeyCode {
    /// Every key, in index order.
    pub const ALL: [KeyCode; 81] = {
        use KeyCode::*;
        [
            Digit0, Digit1, Digit2, Digit3, Digit4,
            Digit5, Digit6, Digit7, Digit8, Digit9,
            KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
            KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
            KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
            F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
            ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
            ShiftLeft, ShiftRight, ControlLeft, ControlRight, AltLeft, AltRight,
            Space, Enter, Escape, Tab, Backspace, Delete, Insert,
            Home, End, PageUp, PageDown,
            Minus, Equal, BracketLeft, BracketRight, Semicolon, Quote,
            Comma, Period, Slash, Backslash, Backquote,
            Unidentified,
        ]
    };
}

impl InputCode for KeyCode {
    const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers macro and any non-standard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Thumb button, "back".
    Back,

    /// Thumb button, "forward".
    Forward,

    /// Any other button.
    Other,
}

impl MouseButton {
    pub const ALL: [MouseButton; 6] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Back,
        MouseButton::Forward,
        MouseButton::Other,
    ];
}

impl InputCode for MouseButton {
    const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

//=== Controller Codes ====================================================

/// Game-controller button, laid out like a standard dual-stick pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControllerButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl ControllerButton {
    pub const ALL: [ControllerButton; 15] = {
        use ControllerButton::*;
        [
            A, B, X, Y, Back, Guide, Start, LeftStick, RightStick,
            LeftShoulder, RightShoulder, DpadUp, DpadDown, DpadLeft, DpadRight,
        ]
    };
}

impl InputCode for ControllerButton {
    const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Single analog axis as reported by the platform (one per notification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

/// Which analog stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub(crate) fn slot(self) -> usize {
        match self {
            Stick::Left => 0,
            Stick::Right => 1,
        }
    }
}

/// Which analog trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Left,
    Right,
}

impl Trigger {
    pub(crate) fn slot(self) -> usize {
        match self {
            Trigger::Left => 0,
            Trigger::Right => 1,
        }
    }
}

/// Where a single axis sample lands on the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisTarget {
    /// Stick axis; `shadow` indexes the four-entry shadow table.
    Stick { which: Stick, shadow: usize },
    Trigger(Trigger),
}

impl ControllerAxis {
    pub(crate) fn target(self) -> AxisTarget {
        match self {
            ControllerAxis::LeftX => AxisTarget::Stick { which: Stick::Left, shadow: 0 },
            ControllerAxis::LeftY => AxisTarget::Stick { which: Stick::Left, shadow: 1 },
            ControllerAxis::RightX => AxisTarget::Stick { which: Stick::Right, shadow: 2 },
            ControllerAxis::RightY => AxisTarget::Stick { which: Stick::Right, shadow: 3 },
            ControllerAxis::TriggerLeft => AxisTarget::Trigger(Trigger::Left),
            ControllerAxis::TriggerRight => AxisTarget::Trigger(Trigger::Right),
        }
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left/right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// All modifiers held.
    pub const ALL: Self = Self { shift: true, ctrl: true, alt: true };
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== InputSet ============================================================

/// Composite down-state of one device: one bit per [`InputCode`].
///
/// This is what the history ring buffer records on every press edge.
pub struct InputSet<I> {
    bits: u128,
    _code: PhantomData<fn() -> I>,
}

impl<I: InputCode> InputSet<I> {
    /// Empty set.
    pub const fn empty() -> Self {
        Self { bits: 0, _code: PhantomData }
    }

    /// Set containing exactly `input`.
    pub fn single(input: I) -> Self {
        let mut set = Self::empty();
        set.insert(input);
        set
    }

    /// Adds `input`. Returns `true` if it was not already present.
    pub fn insert(&mut self, input: I) -> bool {
        let bit = Self::bit(input);
        let added = self.bits & bit == 0;
        self.bits |= bit;
        added
    }

    /// Removes `input`. Returns `true` if it was present.
    pub fn remove(&mut self, input: I) -> bool {
        let bit = Self::bit(input);
        let present = self.bits & bit != 0;
        self.bits &= !bit;
        present
    }

    pub fn contains(&self, input: I) -> bool {
        self.bits & Self::bit(input) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Raw bitmask (bit `n` = input with index `n`).
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Members in index order.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        (0..I::COUNT)
            .filter(move |i| self.bits & (1u128 << i) != 0)
            .filter_map(I::from_index)
    }

    fn bit(input: I) -> u128 {
        debug_assert!(I::COUNT <= 128, "InputSet supports at most 128 codes");
        1u128 << input.index()
    }
}

//--- Trait Implementations -----------------------------------------------

impl<I> Clone for InputSet<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for InputSet<I> {}

impl<I> PartialEq for InputSet<I> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<I> Eq for InputSet<I> {}

impl<I: InputCode> Default for InputSet<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: InputCode> FromIterator<I> for InputSet<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut set = Self::empty();
        for input in iter {
            set.insert(input);
        }
        set
    }
}

impl<I: InputCode, const N: usize> From<[I; N]> for InputSet<I> {
    fn from(inputs: [I; N]) -> Self {
        inputs.into_iter().collect()
    }
}

impl<I: InputCode> fmt::Debug for InputSet<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Keys held on a keyboard.
pub type KeySet = InputSet<KeyCode>;

/// Buttons held on a mouse.
pub type MouseButtons = InputSet<MouseButton>;

/// Buttons held on a controller.
pub type ControllerButtons = InputSet<ControllerButton>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Index Tests
    //=====================================================================

    #[test]
    fn key_indices_match_all_table() {
        for (i, key) in KeyCode::ALL.iter().enumerate() {
            assert_eq!(key.index(), i, "{:?} out of order", key);
            assert_eq!(KeyCode::from_index(i), Some(*key));
        }
        assert_eq!(KeyCode::from_index(KeyCode::COUNT), None);
    }

    #[test]
    fn mouse_and_controller_indices_round_trip() {
        for b in MouseButton::ALL {
            assert_eq!(MouseButton::from_index(b.index()), Some(b));
        }
        for b in ControllerButton::ALL {
            assert_eq!(ControllerButton::from_index(b.index()), Some(b));
        }
    }

    #[test]
    fn code_counts_fit_in_mask() {
        assert!(KeyCode::COUNT <= 128);
        assert!(MouseButton::COUNT <= 128);
        assert!(ControllerButton::COUNT <= 128);
    }

    //=====================================================================
    // InputSet Tests
    //=====================================================================

    #[test]
    fn insert_reports_new_members_only() {
        let mut set = KeySet::empty();
        assert!(set.insert(KeyCode::KeyA));
        assert!(!set.insert(KeyCode::KeyA));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_reports_previous_presence() {
        let mut set = KeySet::single(KeyCode::Space);
        assert!(set.remove(KeyCode::Space));
        assert!(!set.remove(KeyCode::Space));
        assert!(set.is_empty());
    }

    #[test]
    fn sets_compare_by_members() {
        let a = KeySet::from([KeyCode::KeyA, KeyCode::KeyB]);
        let b = KeySet::from([KeyCode::KeyB, KeyCode::KeyA]);
        let c = KeySet::from([KeyCode::KeyA]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn iter_yields_index_order() {
        let set = ControllerButtons::from([ControllerButton::Start, ControllerButton::A]);
        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, vec![ControllerButton::A, ControllerButton::Start]);
    }

    #[test]
    fn last_key_fits() {
        let set = KeySet::single(KeyCode::Unidentified);
        assert!(set.contains(KeyCode::Unidentified));
        assert!(!set.contains(KeyCode::Digit0));
    }

    //=====================================================================
    // Axis Mapping Tests
    //=====================================================================

    #[test]
    fn stick_axes_map_to_distinct_shadow_slots() {
        let slots: Vec<_> = [
            ControllerAxis::LeftX,
            ControllerAxis::LeftY,
            ControllerAxis::RightX,
            ControllerAxis::RightY,
        ]
        .iter()
        .map(|a| match a.target() {
            AxisTarget::Stick { shadow, .. } => shadow,
            AxisTarget::Trigger(_) => panic!("stick axis mapped to trigger"),
        })
        .collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn trigger_axes_map_to_triggers() {
        assert_eq!(
            ControllerAxis::TriggerLeft.target(),
            AxisTarget::Trigger(Trigger::Left)
        );
        assert_eq!(
            ControllerAxis::TriggerRight.target(),
            AxisTarget::Trigger(Trigger::Right)
        );
    }

    //=====================================================================
    // Modifiers Tests
    //=====================================================================

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(Modifiers::ALL.shift && Modifiers::ALL.ctrl && Modifiers::ALL.alt);
    }
}
