//=========================================================================
// Timer Slots
//=========================================================================

//=== Constants ===========================================================

/// Longest timer name kept, in bytes (one byte short of the 128-byte
/// on-disk field, which stays NUL-terminated).
pub const MAX_TIMER_NAME: usize = 127;

//=== TimerSlot ===========================================================

/// One named countdown inside a clock.
///
/// A slot is live while its name is non-empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimerSlot {
    pub(crate) name: String,
    pub(crate) current: f64,
    pub(crate) seconds: f64,
    pub(crate) paused: bool,
    pub(crate) repeat: i32,
}

impl TimerSlot {
    pub(crate) fn new(name: String, seconds: f64, repeating: bool) -> Self {
        Self {
            name,
            current: 0.0,
            seconds,
            paused: false,
            repeat: i32::from(repeating),
        }
    }

    pub fn is_live(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time accumulated toward the next firing.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Firing threshold.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `0` for one-shot timers; otherwise one more than the number of
    /// times the timer has fired.
    pub fn repeat(&self) -> i32 {
        self.repeat
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat > 0
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

//=== TimerFired ==========================================================

/// Outcome of one timer crossing its threshold during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerFired {
    pub name: String,

    /// Time accumulated past the threshold.
    pub seconds: f64,

    /// Repeat counter at the moment of firing (`0` for one-shot).
    pub repeat: i32,
}

//=== Name Helpers ========================================================

/// Cuts `name` to at most [`MAX_TIMER_NAME`] bytes on a char boundary.
pub(crate) fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_TIMER_NAME {
        return name;
    }
    let mut end = MAX_TIMER_NAME;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

//=========================================================================
// Unit Tests
//=========================================================================
