//=========================================================================
// Press Timing
//=========================================================================
//
// Per-device press/release bookkeeping shared by keyboards, mice and
// controllers: the global last edge in each direction plus a per-input
// timestamp table.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::codes::{InputCode, InputSet};
use super::history::InputHistory;

//=== PressRecord =========================================================

/// Which input produced an edge, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressRecord<I> {
    pub input: I,
    pub time: f64,
}

//=== PressTiming =========================================================

/// Last-edge bookkeeping for one device.
#[derive(Debug, Clone)]
pub struct PressTiming<I> {
    last_pressed: Option<PressRecord<I>>,
    last_released: Option<PressRecord<I>>,
    pressed_at: Vec<f64>,
    released_at: Vec<f64>,
}

impl<I: InputCode> PressTiming<I> {
    pub fn new() -> Self {
        Self {
            last_pressed: None,
            last_released: None,
            pressed_at: vec![0.0; I::COUNT],
            released_at: vec![0.0; I::COUNT],
        }
    }

    /// Sets every per-input timestamp to `time`.
    ///
    /// Keeps "time since last press" sane for inputs never touched.
    pub fn backfill(&mut self, time: f64) {
        self.pressed_at.iter_mut().for_each(|t| *t = time);
        self.released_at.iter_mut().for_each(|t| *t = time);
    }

    pub fn press(&mut self, input: I, time: f64) {
        self.pressed_at[input.index()] = time;
        self.last_pressed = Some(PressRecord { input, time });
    }

    pub fn release(&mut self, input: I, time: f64) {
        self.released_at[input.index()] = time;
        self.last_released = Some(PressRecord { input, time });
    }

    pub fn last_pressed(&self) -> Option<PressRecord<I>> {
        self.last_pressed
    }

    pub fn last_released(&self) -> Option<PressRecord<I>> {
        self.last_released
    }

    pub fn pressed_time(&self, input: I) -> f64 {
        self.pressed_at[input.index()]
    }

    pub fn released_time(&self, input: I) -> f64 {
        self.released_at[input.index()]
    }
}

impl<I: InputCode> Default for PressTiming<I> {
    fn default() -> Self {
        Self::new()
    }
}

//=== DeviceInputs ========================================================

/// Down-state, edge timing and press history of one device.
///
/// Only genuine up→down edges touch the history; a repeated press of an
/// input already held is ignored, as is a release of one not held.
#[derive(Clone)]
pub struct DeviceInputs<I: InputCode> {
    down: InputSet<I>,
    timing: PressTiming<I>,
    history: InputHistory<InputSet<I>>,
}

impl<I: InputCode> DeviceInputs<I> {
    pub fn new() -> Self {
        Self {
            down: InputSet::empty(),
            timing: PressTiming::new(),
            history: InputHistory::new(),
        }
    }

    /// Records a press edge. Returns `false` if `input` was already down.
    pub fn press(&mut self, input: I, time: f64) -> bool {
        if !self.down.insert(input) {
            return false;
        }
        self.timing.press(input, time);
        self.history.record(self.down);
        true
    }

    /// Records a release edge. Returns `false` if `input` was not down.
    pub fn release(&mut self, input: I, time: f64) -> bool {
        if !self.down.remove(input) {
            return false;
        }
        self.timing.release(input, time);
        true
    }

    pub fn down(&self) -> InputSet<I> {
        self.down
    }

    pub fn is_down(&self, input: I) -> bool {
        self.down.contains(input)
    }

    pub fn timing(&self) -> &PressTiming<I> {
        &self.timing
    }

    pub(crate) fn timing_mut(&mut self) -> &mut PressTiming<I> {
        &mut self.timing
    }

    pub fn history(&self) -> &InputHistory<InputSet<I>> {
        &self.history
    }
}

impl<I: InputCode> Default for DeviceInputs<I> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
