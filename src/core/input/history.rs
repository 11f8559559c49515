//=========================================================================
// Input History
//=========================================================================
//
// Fixed-depth ring buffer of composite input snapshots, one per press
// edge, used for sequence (combo / cheat-code) detection.
//
// Architecture:
//   press edge → record(snapshot) → slots[cursor], cursor = (cursor+1) % 64
//   matches(masks) walks backward from cursor-1, masks[0] first
//
//=========================================================================

//=== Constants ===========================================================

/// Number of press snapshots retained per device.
pub const HISTORY_DEPTH: usize = 64;

//=== InputHistory ========================================================

/// Circular log of the last [`HISTORY_DEPTH`] press snapshots.
#[derive(Clone)]
pub struct InputHistory<S> {
    slots: [S; HISTORY_DEPTH],
    cursor: usize,
}

impl<S: Copy + Default + PartialEq> InputHistory<S> {
    pub fn new() -> Self {
        Self {
            slots: [S::default(); HISTORY_DEPTH],
            cursor: 0,
        }
    }

    /// Appends `snapshot`, evicting the oldest entry once full.
    pub fn record(&mut self, snapshot: S) {
        self.slots[self.cursor] = snapshot;
        self.cursor = (self.cursor + 1) % HISTORY_DEPTH;
    }

    /// Returns `true` if the most recent `masks.len()` snapshots equal
    /// `masks`, with `masks[0]` compared against the newest snapshot.
    ///
    /// An empty pattern always matches. Patterns longer than the buffer
    /// wrap around it.
    pub fn matches(&self, masks: &[S]) -> bool {
        masks
            .iter()
            .enumerate()
            .all(|(age, mask)| self.slots[self.slot_for_age(age)] == *mask)
    }

    /// Snapshots from newest to oldest (always `HISTORY_DEPTH` entries;
    /// never-written slots read as `S::default()`).
    pub fn recent(&self) -> impl Iterator<Item = S> + '_ {
        (0..HISTORY_DEPTH).map(move |age| self.slots[self.slot_for_age(age)])
    }

    fn slot_for_age(&self, age: usize) -> usize {
        let back = age % HISTORY_DEPTH + 1;
        (self.cursor + HISTORY_DEPTH - back) % HISTORY_DEPTH
    }
}

impl<S: Copy + Default + PartialEq> Default for InputHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
