//=========================================================================
// Atlas Animation
//=========================================================================
//
// Frame clock for a sprite atlas: maps accumulated time onto a discrete
// frame index and reports the end of each traversal exactly once.
//
// Architecture:
//   advance(dt) → elapsed += dt
//              → elapsed ≥ total_time ? completion (+ wrap | clamp)
//   current_frame = first_frame + floor(elapsed / period)
//   frame_rect(i) → row-major cell i of the atlas
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== FrameRect ===========================================================

/// Source rectangle of one frame inside the atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub const EMPTY: Self = Self { x: 0, y: 0, width: 0, height: 0 };

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

//=== Animation ===========================================================

/// Timing state of one atlas animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    atlas_width: u32,
    atlas_height: u32,
    frame_width: u32,
    frame_height: u32,
    period: f64,
    first_frame: i32,
    frame_count: i32,
    loops: bool,
    elapsed: f64,
    fired: bool,
}

impl Animation {
    //--- Construction -----------------------------------------------------

    /// Animation over every `frame_width × frame_height` cell of an
    /// `atlas_width × atlas_height` atlas, `period` seconds per frame.
    ///
    /// # Panics
    ///
    /// Panics if `period` is not positive.
    pub fn new(
        atlas_width: u32,
        atlas_height: u32,
        frame_width: u32,
        frame_height: u32,
        period: f64,
    ) -> Self {
        assert!(period > 0.0, "Animation period must be positive, got {}", period);
        Self {
            atlas_width,
            atlas_height,
            frame_width,
            frame_height,
            period,
            first_frame: 0,
            frame_count: 0,
            loops: false,
            elapsed: 0.0,
            fired: false,
        }
    }

    /// Starts the animation at atlas cell `first_frame`.
    pub fn with_first_frame(mut self, first_frame: i32) -> Self {
        self.first_frame = first_frame.max(0);
        self
    }

    /// Caps the frame count. `0` uses every cell from the first frame on.
    pub fn with_frame_count(mut self, frame_count: i32) -> Self {
        self.frame_count = frame_count.max(0);
        self
    }

    pub fn looping(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    //--- Configuration ----------------------------------------------------

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Changes the per-frame period; non-positive values are ignored.
    pub fn set_period(&mut self, period: f64) {
        if period > 0.0 {
            self.period = period;
        } else {
            warn!(target: "animation", "Ignoring non-positive period {}", period);
        }
    }

    pub fn first_frame(&self) -> i32 {
        self.first_frame
    }

    pub fn loops(&self) -> bool {
        self.loops
    }

    pub fn set_loops(&mut self, loops: bool) {
        self.loops = loops;
    }

    /// Frames played per traversal.
    ///
    /// Derived from the atlas and frame sizes, capped by an explicit
    /// frame count when one is set. Zero-area frames yield zero.
    pub fn effective_frame_count(&self) -> i32 {
        let cells = self.cell_columns() as i64 * self.cell_rows() as i64;
        let derived = (cells - self.first_frame as i64).clamp(0, i32::MAX as i64) as i32;
        if self.frame_count > 0 {
            self.frame_count.min(derived)
        } else {
            derived
        }
    }

    /// Duration of one traversal.
    pub fn total_time(&self) -> f64 {
        self.period * self.effective_frame_count() as f64
    }

    //--- Playback ---------------------------------------------------------

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances by `dt` seconds and returns how many traversals completed.
    ///
    /// A non-looping animation completes once, clamps at its last frame and
    /// stays there. A looping one wraps and completes once per traversal.
    pub fn advance(&mut self, dt: f64) -> u32 {
        let total = self.total_time();
        if total <= 0.0 {
            return 0;
        }
        if !dt.is_finite() {
            warn!(target: "animation", "Ignoring non-finite time step {}", dt);
            return 0;
        }

        self.elapsed += dt.max(0.0);
        let mut completed = 0;

        if self.loops {
            if self.elapsed >= total {
                let remainder = self.elapsed.rem_euclid(total);
                // Float to int casts saturate at u32::MAX.
                completed = ((self.elapsed - remainder) / total).round() as u32;
                self.elapsed = remainder;
            }
            self.fired = false;
        } else if self.elapsed >= total {
            self.elapsed = total;
            if !self.fired {
                self.fired = true;
                completed = 1;
            }
        }

        if completed > 0 {
            trace!(target: "animation", "Traversal complete ({}x)", completed);
        }
        completed
    }

    /// Moves the playhead to `time` seconds into the traversal.
    ///
    /// Landing inside `[0, total_time)` re-arms the completion event.
    pub fn seek(&mut self, time: f64) {
        let total = self.total_time();
        let time = time.max(0.0);
        self.elapsed = if self.loops && total > 0.0 {
            time % total
        } else {
            time.min(total)
        };
        if self.elapsed < total {
            self.fired = false;
        }
    }

    /// Rewinds to the first frame.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.fired = false;
    }

    /// Jumps to the start of atlas frame `frame`, clamped to the played range.
    pub fn set_frame(&mut self, frame: i32) {
        let count = self.effective_frame_count();
        if count == 0 {
            return;
        }
        let offset = (frame - self.first_frame).clamp(0, count - 1);
        self.seek(offset as f64 * self.period);
    }

    /// Atlas cell currently shown.
    pub fn current_frame(&self) -> i32 {
        let count = self.effective_frame_count();
        if count == 0 {
            return self.first_frame;
        }
        let step = (self.elapsed / self.period).floor() as i64;
        self.first_frame + step.clamp(0, count as i64 - 1) as i32
    }

    /// `true` once a non-looping animation has completed its traversal.
    pub fn is_finished(&self) -> bool {
        !self.loops && self.fired
    }

    //--- Frame Geometry ---------------------------------------------------

    /// Source rectangle of atlas cell `frame` (row-major).
    ///
    /// Empty for zero-area frames or cells outside the atlas.
    pub fn frame_rect(&self, frame: i32) -> FrameRect {
        let columns = self.cell_columns();
        if columns == 0 || self.cell_rows() == 0 || frame < 0 {
            return FrameRect::EMPTY;
        }
        let frame = frame as u32;
        let (column, row) = (frame % columns, frame / columns);
        if row >= self.cell_rows() {
            return FrameRect::EMPTY;
        }
        FrameRect {
            x: column * self.frame_width,
            y: row * self.frame_height,
            width: self.frame_width,
            height: self.frame_height,
        }
    }

    /// Source rectangle of [`current_frame`](Self::current_frame).
    pub fn current_rect(&self) -> FrameRect {
        if self.effective_frame_count() == 0 {
            return FrameRect::EMPTY;
        }
        self.frame_rect(self.current_frame())
    }

    //--- Internal Helpers -------------------------------------------------

    fn cell_columns(&self) -> u32 {
        if self.frame_width == 0 || self.frame_height == 0 {
            return 0;
        }
        self.atlas_width / self.frame_width
    }

    fn cell_rows(&self) -> u32 {
        if self.frame_width == 0 || self.frame_height == 0 {
            return 0;
        }
        self.atlas_height / self.frame_height
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    /// Four 32×32 frames in a single row, half a second each.
    fn strip(loops: bool) -> Animation {
        Animation::new(128, 32, 32, 32, 0.5).looping(loops)
    }

    //=====================================================================
    // Completion Tests
    //=====================================================================

    #[test]
    fn non_looping_fires_once_and_clamps() {
        let mut a = strip(false);
        let mut fired = 0;
        for _ in 0..5 {
            fired += a.advance(0.5);
        }
        assert_eq!(fired, 1);
        assert_eq!(a.current_frame(), 3);
        assert!(a.is_finished());

        assert_eq!(a.advance(1.0), 0, "no further completion");
        assert_eq!(a.current_frame(), 3);
    }

    #[test]
    fn looping_wraps_and_fires_per_traversal() {
        let mut a = strip(true);
        assert_eq!(a.advance(2.1), 1);
        assert!((a.elapsed() - 0.1).abs() < 1e-9);
        assert_eq!(a.current_frame(), 0);
        assert!(!a.is_finished());
    }

    #[test]
    fn looping_large_step_counts_every_traversal() {
        let mut a = strip(true);
        assert_eq!(a.advance(6.5), 3);
        assert!((a.elapsed() - 0.5).abs() < 1e-9);
        assert_eq!(a.current_frame(), 1);
    }

    #[test]
    fn seek_backward_rearms_completion() {
        let mut a = strip(false);
        assert_eq!(a.advance(3.0), 1);
        a.seek(0.25);
        assert!(!a.is_finished());
        assert_eq!(a.advance(2.0), 1);
    }

    #[test]
    fn reset_rewinds() {
        let mut a = strip(false);
        a.advance(5.0);
        a.reset();
        assert_eq!(a.elapsed(), 0.0);
        assert_eq!(a.current_frame(), 0);
        assert!(!a.is_finished());
    }

    //=====================================================================
    // Frame Count Tests
    //=====================================================================

    #[test]
    fn frame_count_derives_from_atlas() {
        let a = Animation::new(128, 64, 32, 32, 0.1);
        assert_eq!(a.effective_frame_count(), 8);
    }

    #[test]
    fn explicit_count_caps_derived() {
        let a = Animation::new(128, 64, 32, 32, 0.1).with_frame_count(3);
        assert_eq!(a.effective_frame_count(), 3);

        let b = Animation::new(64, 32, 32, 32, 0.1).with_frame_count(10);
        assert_eq!(b.effective_frame_count(), 2);
    }

    #[test]
    fn first_frame_offsets_playback() {
        let mut a = Animation::new(128, 64, 32, 32, 0.5).with_first_frame(5);
        assert_eq!(a.effective_frame_count(), 3);
        assert_eq!(a.current_frame(), 5);
        a.advance(0.6);
        assert_eq!(a.current_frame(), 6);
        assert_eq!(a.current_rect(), FrameRect { x: 64, y: 32, width: 32, height: 32 });
    }

    #[test]
    fn zero_area_frame_is_permanently_at_rest() {
        let mut a = Animation::new(128, 32, 0, 32, 0.5);
        assert_eq!(a.effective_frame_count(), 0);
        assert_eq!(a.advance(10.0), 0);
        assert!(a.current_rect().is_empty());
    }

    #[test]
    fn huge_step_wraps_in_constant_time() {
        let mut a = strip(true);
        assert_eq!(a.advance(1e20), u32::MAX);
        assert!(a.elapsed() >= 0.0 && a.elapsed() < a.total_time());

        let mut b = strip(true);
        assert_eq!(b.advance(2.0 * 1000.0 + 0.25), 1000);
        assert!((b.elapsed() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn non_finite_step_is_ignored() {
        let mut a = strip(true);
        a.advance(0.75);
        assert_eq!(a.advance(f64::INFINITY), 0);
        assert_eq!(a.advance(f64::NAN), 0);
        assert_eq!(a.elapsed(), 0.75);
    }

    //=====================================================================
    // Geometry Tests
    //=====================================================================

    #[test]
    fn frame_rect_is_row_major() {
        let a = Animation::new(96, 64, 32, 32, 0.1);
        assert_eq!(a.frame_rect(0), FrameRect { x: 0, y: 0, width: 32, height: 32 });
        assert_eq!(a.frame_rect(4), FrameRect { x: 32, y: 32, width: 32, height: 32 });
        assert_eq!(a.frame_rect(6), FrameRect::EMPTY);
    }

    #[test]
    fn set_frame_moves_playhead() {
        let mut a = strip(false);
        a.set_frame(2);
        assert_eq!(a.current_frame(), 2);
        a.set_frame(99);
        assert_eq!(a.current_frame(), 3);
    }

    #[test]
    #[should_panic(expected = "period must be positive")]
    fn zero_period_panics() {
        Animation::new(32, 32, 32, 32, 0.0);
    }
}
