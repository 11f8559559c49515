//=========================================================================
// Deadzone Shaping
//=========================================================================
//
// Maps a raw two-axis potentiometer sample onto the unit circle and
// suppresses or rescales the region around rest.
//
// Pipeline:
//   (i16, i16) → normalize to [-1,1] → polar, clamp magnitude to 1
//              → mode-specific shaping → StickState { x, y, magnitude, angle }
//
// The magnitude clamp is what turns the square raw input space into a
// circular one: raw diagonals reach ~1.414 before it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

//=== Constants ===========================================================

/// Positive extreme of the raw range; also the normalization divisor.
/// The negative extreme (-32768) overshoots by one count and is clamped.
const RAW_AXIS_MAX: f64 = i16::MAX as f64;

//=== DeadzoneMode ========================================================

/// Shape of the suppressed region around the stick's rest position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadzoneMode {
    /// No suppression.
    None,

    /// Each axis zeroed independently below the threshold (cross shape).
    Axial,

    /// Whole vector zeroed below the threshold (circle).
    Radial,

    /// Radial, then `[threshold, 1]` remapped linearly onto `[0, 1]`.
    ScaledRadial,

    /// X threshold scales with |y|, then X is rescaled (bowtie along X).
    XBowtie,

    /// Y threshold scales with |x|, then Y is rescaled (bowtie along Y).
    YBowtie,
}

impl DeadzoneMode {
    pub const ALL: [DeadzoneMode; 6] = [
        DeadzoneMode::None,
        DeadzoneMode::Axial,
        DeadzoneMode::Radial,
        DeadzoneMode::ScaledRadial,
        DeadzoneMode::XBowtie,
        DeadzoneMode::YBowtie,
    ];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            DeadzoneMode::None => "none",
            DeadzoneMode::Axial => "axial",
            DeadzoneMode::Radial => "radial",
            DeadzoneMode::ScaledRadial => "scaled_radial",
            DeadzoneMode::XBowtie => "x_bowtie",
            DeadzoneMode::YBowtie => "y_bowtie",
        }
    }
}

impl fmt::Display for DeadzoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a deadzone mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deadzone mode {0:?}")]
pub struct UnknownDeadzoneMode(pub String);

impl FromStr for DeadzoneMode {
    type Err = UnknownDeadzoneMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeadzoneMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownDeadzoneMode(s.to_string()))
    }
}

//=== Deadzone ============================================================

/// Per-stick deadzone configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadzone {
    pub mode: DeadzoneMode,

    /// Fraction of full deflection, in `[0, 1]`.
    pub threshold: f64,
}

impl Deadzone {
    pub const fn new(mode: DeadzoneMode, threshold: f64) -> Self {
        Self { mode, threshold }
    }

    /// Same configuration with the threshold clamped into `[0, 1]`.
    ///
    /// NaN collapses to zero.
    pub fn clamped(self) -> Self {
        let threshold = if self.threshold.is_nan() {
            0.0
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        Self { mode: self.mode, threshold }
    }

    /// Shapes a raw sample with this configuration.
    pub fn shape(&self, raw_x: i16, raw_y: i16) -> StickState {
        shape(raw_x, raw_y, self.mode, self.threshold)
    }
}

impl Default for Deadzone {
    /// Radial, 10% of full deflection.
    fn default() -> Self {
        Self::new(DeadzoneMode::Radial, 0.1)
    }
}

//=== StickState ==========================================================

/// Shaped stick position in cartesian and polar form.
///
/// `x`, `y` in `[-1, 1]`; `magnitude` in `[0, 1]`; `angle` in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickState {
    pub x: f64,
    pub y: f64,
    pub magnitude: f64,
    pub angle: f64,
}

impl StickState {
    /// Stick at rest.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, magnitude: 0.0, angle: 0.0 };

    fn from_cartesian(x: f64, y: f64) -> Self {
        let magnitude = x.hypot(y);
        if magnitude == 0.0 {
            return Self::ZERO;
        }
        let (x, y, magnitude) = if magnitude > 1.0 {
            (x / magnitude, y / magnitude, 1.0)
        } else {
            (x, y, magnitude)
        };
        Self { x, y, magnitude, angle: wrap_angle(y.atan2(x)) }
    }

    fn from_polar(magnitude: f64, angle: f64) -> Self {
        if magnitude <= 0.0 {
            return Self::ZERO;
        }
        let magnitude = magnitude.min(1.0);
        Self {
            x: magnitude * angle.cos(),
            y: magnitude * angle.sin(),
            magnitude,
            angle,
        }
    }
}

//=== shape() =============================================================

/// Maps a raw stick sample to deadzone-shaped unit-circle coordinates.
pub fn shape(raw_x: i16, raw_y: i16, mode: DeadzoneMode, threshold: f64) -> StickState {
    let input = StickState::from_cartesian(normalize(raw_x), normalize(raw_y));

    match mode {
        DeadzoneMode::None => input,

        DeadzoneMode::Axial => {
            let x = if input.x.abs() < threshold { 0.0 } else { input.x };
            let y = if input.y.abs() < threshold { 0.0 } else { input.y };
            StickState::from_cartesian(x, y)
        }

        DeadzoneMode::Radial => {
            if input.magnitude < threshold {
                StickState::ZERO
            } else {
                input
            }
        }

        DeadzoneMode::ScaledRadial => {
            if input.magnitude < threshold {
                return StickState::ZERO;
            }
            let span = 1.0 - threshold;
            let magnitude = if span <= 0.0 {
                1.0
            } else {
                (input.magnitude - threshold) / span
            };
            StickState::from_polar(magnitude, input.angle)
        }

        DeadzoneMode::XBowtie => {
            let x = bowtie_axis(input.x, input.y, threshold);
            StickState::from_cartesian(x, input.y)
        }

        DeadzoneMode::YBowtie => {
            let y = bowtie_axis(input.y, input.x, threshold);
            StickState::from_cartesian(input.x, y)
        }
    }
}

//--- Internal Helpers ----------------------------------------------------

fn normalize(raw: i16) -> f64 {
    (raw as f64 / RAW_AXIS_MAX).clamp(-1.0, 1.0)
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = if angle < 0.0 { angle + TAU } else { angle };
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Thresholds `value` by a deadzone proportional to `|other|`, then
/// remaps the surviving range `[dz, 1]` onto `[0, 1]`.
fn bowtie_axis(value: f64, other: f64, threshold: f64) -> f64 {
    let dz = threshold * other.abs();
    if value.abs() < dz {
        return 0.0;
    }
    let span = 1.0 - dz;
    if span <= 0.0 {
        return value.signum();
    }
    value.signum() * ((value.abs() - dz) / span).min(1.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
