//=========================================================================
// Controller
//=========================================================================
//
// Device record for one game controller.
//
// The platform reports one analog axis per notification, so each stick's
// position is rebuilt from a four-entry shadow table holding the last
// sample seen on every stick axis. A stick is only as fresh as the more
// stale of its two axes.
//
// Architecture:
//   axis sample → stick_with(axis, raw)   (read-only preview)
//               → set_axis(axis, raw)     (commit into shadow / triggers)
//   stick(which) → Deadzone::shape(shadow[x], shadow[y])
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::codes::{AxisTarget, ControllerAxis, ControllerButton, ControllerButtons, Stick, Trigger};
use super::timing::DeviceInputs;
use crate::core::deadzone::{Deadzone, StickState};

//=== Controller ==========================================================

/// Tracked state of a game controller.
#[derive(Clone)]
pub struct Controller {
    instance: u32,
    name: String,
    inputs: DeviceInputs<ControllerButton>,
    shadow: [i16; 4],
    triggers: [f64; 2],
    deadzones: [Deadzone; 2],
}

impl Controller {
    /// Controller inserted at `time`, both sticks seeded with `deadzone`.
    pub(crate) fn inserted_at(instance: u32, name: String, deadzone: Deadzone, time: f64) -> Self {
        let mut inputs = DeviceInputs::new();
        inputs.timing_mut().backfill(time);
        Self {
            instance,
            name,
            inputs,
            shadow: [0; 4],
            triggers: [0.0; 2],
            deadzones: [deadzone.clamped(); 2],
        }
    }

    //--- Identity ---------------------------------------------------------

    /// Platform joystick instance id.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Buttons ----------------------------------------------------------

    pub fn inputs(&self) -> &DeviceInputs<ControllerButton> {
        &self.inputs
    }

    pub fn buttons(&self) -> ControllerButtons {
        self.inputs.down()
    }

    pub fn is_down(&self, button: ControllerButton) -> bool {
        self.inputs.is_down(button)
    }

    pub(crate) fn button(&mut self, button: ControllerButton, pressed: bool, time: f64) -> bool {
        if pressed {
            self.inputs.press(button, time)
        } else {
            self.inputs.release(button, time)
        }
    }

    //--- Sticks -----------------------------------------------------------

    /// Shaped position of `which` from the committed shadow samples.
    pub fn stick(&self, which: Stick) -> StickState {
        let (x, y) = Self::shadow_pair(which);
        self.deadzones[which.slot()].shape(self.shadow[x], self.shadow[y])
    }

    /// Shaped position of the stick `axis` belongs to, as it would read
    /// with `value` substituted for that axis. Nothing is committed.
    ///
    /// Returns `None` for trigger axes.
    pub fn stick_with(&self, axis: ControllerAxis, value: i16) -> Option<(Stick, StickState)> {
        let AxisTarget::Stick { which, shadow } = axis.target() else {
            return None;
        };
        let mut samples = self.shadow;
        samples[shadow] = value;
        let (x, y) = Self::shadow_pair(which);
        Some((which, self.deadzones[which.slot()].shape(samples[x], samples[y])))
    }

    /// Last raw sample seen on `axis` (triggers report their raw value
    /// rescaled back into the i16 range).
    pub fn raw_axis(&self, axis: ControllerAxis) -> i16 {
        match axis.target() {
            AxisTarget::Stick { shadow, .. } => self.shadow[shadow],
            AxisTarget::Trigger(t) => (self.triggers[t.slot()] * i16::MAX as f64).round() as i16,
        }
    }

    pub(crate) fn set_axis(&mut self, axis: ControllerAxis, value: i16) {
        match axis.target() {
            AxisTarget::Stick { shadow, .. } => self.shadow[shadow] = value,
            AxisTarget::Trigger(t) => self.triggers[t.slot()] = normalize_trigger(value),
        }
    }

    //--- Triggers ---------------------------------------------------------

    /// Trigger pull in `[0, 1]`.
    pub fn trigger(&self, which: Trigger) -> f64 {
        self.triggers[which.slot()]
    }

    //--- Deadzones --------------------------------------------------------

    pub fn deadzone(&self, which: Stick) -> Deadzone {
        self.deadzones[which.slot()]
    }

    /// Replaces the deadzone of `which`; thresholds outside `[0, 1]` are
    /// clamped with a warning.
    pub fn set_deadzone(&mut self, which: Stick, deadzone: Deadzone) {
        let clamped = deadzone.clamped();
        if clamped.threshold != deadzone.threshold {
            warn!(
                target: "registry",
                "Deadzone threshold {} out of range for controller {}, clamped to {}",
                deadzone.threshold, self.instance, clamped.threshold
            );
        }
        self.deadzones[which.slot()] = clamped;
    }

    //--- Internal Helpers -------------------------------------------------

    fn shadow_pair(which: Stick) -> (usize, usize) {
        match which {
            Stick::Left => (0, 1),
            Stick::Right => (2, 3),
        }
    }
}

/// Maps a raw trigger sample onto `[0, 1]`. Negative samples read as rest.
pub(crate) fn normalize_trigger(value: i16) -> f64 {
    (value as f64 / i16::MAX as f64).clamp(0.0, 1.0)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadzone::DeadzoneMode;

    //--- Test Helpers -----------------------------------------------------

    fn pad() -> Controller {
        Controller::inserted_at(7, "Test Pad".into(), Deadzone::new(DeadzoneMode::None, 0.0), 2.0)
    }

    //=====================================================================
    // Insertion Tests
    //=====================================================================

    #[test]
    fn insertion_seeds_deadzones_and_backfills() {
        let c = Controller::inserted_at(1, "Pad".into(), Deadzone::default(), 5.0);
        assert_eq!(c.deadzone(Stick::Left), Deadzone::default());
        assert_eq!(c.deadzone(Stick::Right), Deadzone::default());
        assert_eq!(c.inputs().timing().pressed_time(ControllerButton::A), 5.0);
        assert_eq!(c.inputs().timing().released_time(ControllerButton::DpadUp), 5.0);
    }

    //=====================================================================
    // Shadow Axis Tests
    //=====================================================================

    #[test]
    fn stick_combines_both_shadow_axes() {
        let mut c = pad();
        c.set_axis(ControllerAxis::LeftX, i16::MAX);
        c.set_axis(ControllerAxis::LeftY, 0);
        let s = c.stick(Stick::Left);
        assert!((s.x - 1.0).abs() < 1e-9);
        assert_eq!(s.y, 0.0);

        // Right stick untouched.
        assert_eq!(c.stick(Stick::Right), StickState::ZERO);
    }

    #[test]
    fn stick_with_previews_without_committing() {
        let mut c = pad();
        c.set_axis(ControllerAxis::RightX, i16::MAX);

        let (which, preview) = c.stick_with(ControllerAxis::RightY, i16::MAX).unwrap();
        assert_eq!(which, Stick::Right);
        assert!((preview.magnitude - 1.0).abs() < 1e-9);
        assert!((preview.angle - std::f64::consts::FRAC_PI_4).abs() < 1e-6);

        assert_eq!(c.raw_axis(ControllerAxis::RightY), 0);
        assert!((c.stick(Stick::Right).angle).abs() < 1e-9);
    }

    #[test]
    fn trigger_axes_are_not_sticks() {
        let c = pad();
        assert!(c.stick_with(ControllerAxis::TriggerLeft, 100).is_none());
    }

    #[test]
    fn trigger_values_are_normalized() {
        let mut c = pad();
        c.set_axis(ControllerAxis::TriggerRight, i16::MAX);
        c.set_axis(ControllerAxis::TriggerLeft, -5);
        assert_eq!(c.trigger(Trigger::Right), 1.0);
        assert_eq!(c.trigger(Trigger::Left), 0.0);
    }

    //=====================================================================
    // Deadzone Tests
    //=====================================================================

    #[test]
    fn deadzone_applies_per_stick() {
        let mut c = pad();
        c.set_deadzone(Stick::Left, Deadzone::new(DeadzoneMode::Radial, 0.5));
        c.set_axis(ControllerAxis::LeftX, 8000);
        c.set_axis(ControllerAxis::RightX, 8000);

        assert_eq!(c.stick(Stick::Left), StickState::ZERO);
        assert!(c.stick(Stick::Right).magnitude > 0.0);
    }

    #[test]
    fn out_of_range_threshold_is_clamped() {
        let mut c = pad();
        c.set_deadzone(Stick::Right, Deadzone::new(DeadzoneMode::Axial, 4.0));
        assert_eq!(c.deadzone(Stick::Right).threshold, 1.0);
    }
}
