//=========================================================================
// Core Systems
//=========================================================================
//
// Platform-agnostic input and timing logic.
//
// Architecture:
//   registry   → arenas of device/resource records behind checked handles
//   input      → keyboard, mouse and controller records + press tracking
//   deadzone   → analog stick shaping
//   pipeline   → raw record → normalized event → handler
//   event      → the normalized event enum
//   clock      → named timers, binary save/load
//   animation  → sprite-atlas frame timing
//
//=========================================================================

//=== Submodules ==========================================================

pub mod animation;
pub mod clock;
pub mod deadzone;
pub mod event;
pub mod input;
pub mod pipeline;
pub mod registry;
