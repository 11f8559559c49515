//=========================================================================
// Clock
//=========================================================================
//
// Independently schedulable container of named timers.
//
// Architecture:
//   Clock { name, auto_update, paused, slots[128] }
//   tick(dt) → every live, unpaused slot: current += dt
//            → current ≥ seconds ? TimerFired + (rewind | free slot)
//
// Timers are looked up by name; at most one live slot carries a given
// name. The pool is fixed at 128 slots to match the binary save format.
//
//=========================================================================

//=== Submodules ==========================================================

mod format;
mod timer;

//=== Re-exports ==========================================================

pub use format::{ClockFormatError, FORMAT_VERSION};
pub use timer::{TimerFired, TimerSlot, MAX_TIMER_NAME};

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use timer::truncate_name;

//=== Constants ===========================================================

/// Timer slots per clock.
pub const MAX_TIMERS: usize = 128;

//=== Clock ===============================================================

/// A named pool of one-shot and repeating timers.
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    name: String,
    auto_update: bool,
    paused: bool,
    slots: Vec<TimerSlot>,
}

impl Clock {
    //--- Construction -----------------------------------------------------

    /// Empty, running clock that is ticked by the engine every frame.
    ///
    /// NUL bytes are stripped from `name` (with a warning); the save format
    /// terminates names with NUL.
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if name.contains('\0') {
            warn!(target: "clock", "Stripping NUL bytes from clock name {:?}", name);
            name.retain(|c| c != '\0');
        }
        Self {
            name,
            auto_update: true,
            paused: false,
            slots: vec![TimerSlot::default(); MAX_TIMERS],
        }
    }

    //--- Clock State ------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the clock. A name containing NUL is refused with a warning.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name.contains('\0') {
            warn!(target: "clock", "Refusing clock name {:?} containing NUL", name);
            return;
        }
        self.name = name;
    }

    /// `true` if the engine ticks this clock from its frame callback.
    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.auto_update = auto_update;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes every timer; `tick` becomes a no-op.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    //--- Timer Management -------------------------------------------------

    /// Starts a timer firing after `seconds`, replacing any timer of the
    /// same name.
    ///
    /// Names longer than [`MAX_TIMER_NAME`] bytes are truncated. An empty
    /// name, or one containing NUL, is refused with a warning.
    ///
    /// # Panics
    ///
    /// Panics if all [`MAX_TIMERS`] slots are in use.
    pub fn add_timer(&mut self, name: &str, seconds: f64, repeat: bool) {
        if name.is_empty() {
            warn!(target: "clock", "Refusing unnamed timer on clock '{}'", self.name);
            return;
        }
        if name.contains('\0') {
            warn!(target: "clock", "Refusing timer name {:?} containing NUL on clock '{}'", name, self.name);
            return;
        }
        let stored = truncate_name(name);
        if stored.len() != name.len() {
            warn!(
                target: "clock",
                "Timer name truncated to {} bytes on clock '{}'",
                MAX_TIMER_NAME, self.name
            );
        }

        let index = match self.position(stored) {
            Some(existing) => existing,
            None => match self.slots.iter().position(|s| !s.is_live()) {
                Some(free) => free,
                None => panic!(
                    "clock '{}' has no free timer slot ({} in use)",
                    self.name, MAX_TIMERS
                ),
            },
        };

        self.slots[index] = TimerSlot::new(stored.to_string(), seconds, repeat);
        trace!(target: "clock", "Timer '{}' set to {}s (repeat: {})", stored, seconds, repeat);
    }

    /// Stops and frees a timer. Returns `false` (with a warning) if the
    /// clock has no timer of that name.
    pub fn remove_timer(&mut self, name: &str) -> bool {
        match self.slot_mut(name, "remove") {
            Some(slot) => {
                slot.clear();
                true
            }
            None => false,
        }
    }

    pub fn has_timer(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn timer(&self, name: &str) -> Option<&TimerSlot> {
        self.position(name).map(|i| &self.slots[i])
    }

    /// Renames a timer, replacing any timer already called `new_name`.
    pub fn rename_timer(&mut self, old_name: &str, new_name: &str) -> bool {
        if new_name.is_empty() {
            warn!(target: "clock", "Refusing to rename timer '{}' to empty name", old_name);
            return false;
        }
        if new_name.contains('\0') {
            warn!(target: "clock", "Refusing to rename timer '{}' to {:?} containing NUL", old_name, new_name);
            return false;
        }
        let Some(index) = self.position(old_name) else {
            warn!(target: "clock", "No timer '{}' to rename on clock '{}'", old_name, self.name);
            return false;
        };
        let new_name = truncate_name(new_name);
        if let Some(clash) = self.position(new_name) {
            if clash != index {
                self.slots[clash].clear();
            }
        }
        self.slots[index].name = new_name.to_string();
        true
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }

    /// Live timers in slot order.
    pub fn timers(&self) -> impl Iterator<Item = &TimerSlot> {
        self.slots.iter().filter(|s| s.is_live())
    }

    pub fn timer_names(&self) -> Vec<&str> {
        self.timers().map(TimerSlot::name).collect()
    }

    /// Frees every timer.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(TimerSlot::clear);
    }

    //--- Per-Timer Accessors ----------------------------------------------
    //
    // Missing timers read as zero/false and ignore writes, with a warning.
    //

    pub fn timer_current(&self, name: &str) -> f64 {
        self.slot(name, "read").map_or(0.0, |s| s.current)
    }

    pub fn set_timer_current(&mut self, name: &str, current: f64) {
        if let Some(slot) = self.slot_mut(name, "write") {
            slot.current = current;
        }
    }

    pub fn timer_seconds(&self, name: &str) -> f64 {
        self.slot(name, "read").map_or(0.0, |s| s.seconds)
    }

    pub fn set_timer_seconds(&mut self, name: &str, seconds: f64) {
        if let Some(slot) = self.slot_mut(name, "write") {
            slot.seconds = seconds;
        }
    }

    pub fn timer_paused(&self, name: &str) -> bool {
        self.slot(name, "read").is_some_and(|s| s.paused)
    }

    pub fn set_timer_paused(&mut self, name: &str, paused: bool) {
        if let Some(slot) = self.slot_mut(name, "write") {
            slot.paused = paused;
        }
    }

    pub fn timer_repeat(&self, name: &str) -> i32 {
        self.slot(name, "read").map_or(0, |s| s.repeat)
    }

    pub fn set_timer_repeat(&mut self, name: &str, repeat: i32) {
        if let Some(slot) = self.slot_mut(name, "write") {
            slot.repeat = repeat.max(0);
        }
    }

    //--- Scheduling -------------------------------------------------------

    /// Advances every running timer by `dt` and returns those that fired,
    /// in slot order.
    ///
    /// Each timer fires at most once per tick. Repeating timers keep their
    /// overshoot; one-shot timers are freed as they fire.
    pub fn tick(&mut self, dt: f64) -> Vec<TimerFired> {
        if self.paused {
            return Vec::new();
        }

        let mut fired = Vec::new();
        for slot in self.slots.iter_mut().filter(|s| s.is_live() && !s.paused) {
            slot.current += dt;
            if slot.current < slot.seconds {
                continue;
            }

            fired.push(TimerFired {
                name: slot.name.clone(),
                seconds: slot.current - slot.seconds,
                repeat: slot.repeat,
            });

            if slot.repeat > 0 {
                slot.current -= slot.seconds;
                slot.repeat = slot.repeat.saturating_add(1);
            } else {
                slot.clear();
            }
        }
        fired
    }

    //--- Internal Helpers -------------------------------------------------

    fn position(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.slots.iter().position(|s| s.name == name)
    }

    fn slot(&self, name: &str, access: &str) -> Option<&TimerSlot> {
        let slot = self.position(name).map(|i| &self.slots[i]);
        if slot.is_none() {
            warn!(target: "clock", "Cannot {} missing timer '{}' on clock '{}'", access, name, self.name);
        }
        slot
    }

    fn slot_mut(&mut self, name: &str, access: &str) -> Option<&mut TimerSlot> {
        match self.position(name) {
            Some(index) => Some(&mut self.slots[index]),
            None => {
                warn!(target: "clock", "Cannot {} missing timer '{}' on clock '{}'", access, name, self.name);
                None
            }
        }
    }

    pub(crate) fn slots(&self) -> &[TimerSlot] {
        &self.slots
    }

    pub(crate) fn from_parts(name: String, auto_update: bool, paused: bool, timers: Vec<TimerSlot>) -> Self {
        let mut clock = Self::new(name);
        clock.auto_update = auto_update;
        clock.paused = paused;
        for (slot, timer) in clock.slots.iter_mut().zip(timers) {
            *slot = timer;
        }
        clock
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
