//=========================================================================
// Aetheric Input: Library Root
//
// Input-device and timing core: device registry, event normalization,
// deadzone shaping, clocks and animation timers.
//
// Responsibilities:
// - Expose the top-level `Engine` and its builder
// - Expose `core` for direct access to devices, events and clocks
// - Expose `platform` so producers can feed raw records in
//
// Typical usage:
// ```no_run
// use aetheric_input::EngineBuilder;
//
// let mut engine = EngineBuilder::new().build();
// let sender = engine.event_sender(); // hand to the platform thread
// while let Some(event) = engine.wait() {
//     // react to event
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds all platform-agnostic logic. `platform` defines the raw
// record that producers send and the winit adapter that builds them.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
