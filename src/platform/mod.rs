//=========================================================================
// Platform Subsystem
//
// Raw event records and the producer side of the platform → core channel.
//
// Architecture:
// ```text
//  Producer (any thread):               Consumer (poll thread):
//  ┌──────────────────────────┐        ┌──────────────────────────┐
//  │  winit / gamepad / audio │        │  EventPipeline           │
//  │   ↓                      │        │   ├─ translate (pure)    │
//  │  WinitTranslator         │        │   └─ apply (mutating)    │
//  │   ↓ RawEventKind         │        │   ↓                      │
//  │  EventSender::send       │        │  Event → handler         │
//  │   ↓ stamps timestamp     │        │                          │
//  │  bounded channel ────────┼───────>│  RawQueue                │
//  └──────────────────────────┘        └──────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Opaque records**: producers describe what happened in platform
//   terms (instance ids, raw axis values); device handles exist only on
//   the consumer side.
// - **Lossy high-rate records**: a full channel drops motion, axis and
//   similar records with a warning instead of stalling the producer.
// - **Lossless control records**: insertions, removals, quit and wake
//   block until the consumer makes room.
// - **Wake record**: lets a producer release a thread blocked in
//   `Engine::wait` without inventing an application event.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod winit_adapter;

pub use winit_adapter::WinitTranslator;

//=== External Dependencies ===============================================

use std::time::Instant;

use crossbeam_channel::{SendError, Sender, TrySendError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{ControllerAxis, ControllerButton, KeyCode, Modifiers, MouseButton, MouseButtons};

//=== RawEvent ============================================================

/// Platform notification as delivered by a producer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Seconds on the producer's clock.
    pub timestamp: f64,
    pub kind: RawEventKind,
}

impl RawEvent {
    pub fn new(timestamp: f64, kind: RawEventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// Discriminant and payload of a raw notification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEventKind {
    Quit,

    /// Releases a blocked `wait` without producing an event.
    Wake,

    Window {
        window: u32,
        change: WindowChange,
    },

    //--- Keyboard ---------------------------------------------------------
    Key {
        key: KeyCode,
        mods: Modifiers,
        pressed: bool,
        /// Set on auto-repeat notifications for a held key.
        repeat: bool,
    },
    KeyboardAdded,

    //--- Mouse ------------------------------------------------------------
    MouseAdded {
        mouse: u32,
    },
    MouseMotion {
        mouse: u32,
        window: Option<u32>,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        buttons: MouseButtons,
    },
    MouseButton {
        mouse: u32,
        button: MouseButton,
        pressed: bool,
    },
    MouseWheel {
        mouse: u32,
        x: f32,
        y: f32,
    },

    //--- Controller -------------------------------------------------------
    ControllerAdded {
        instance: u32,
        name: String,
    },
    ControllerRemoved {
        instance: u32,
    },
    ControllerAxis {
        instance: u32,
        axis: ControllerAxis,
        value: i16,
    },
    ControllerButton {
        instance: u32,
        button: ControllerButton,
        pressed: bool,
    },

    //--- Audio ------------------------------------------------------------
    SoundFinished {
        sound: u32,
    },
    MusicFinished,

    /// Discriminant the producer could not classify.
    Unknown(u32),
}

impl RawEventKind {
    /// Lifecycle and control records: device insertion and removal, quit
    /// and wake. Losing one of these desynchronizes the registry from the
    /// stream or strands a blocked `wait`, so they are never dropped.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            RawEventKind::Quit
                | RawEventKind::Wake
                | RawEventKind::KeyboardAdded
                | RawEventKind::MouseAdded { .. }
                | RawEventKind::ControllerAdded { .. }
                | RawEventKind::ControllerRemoved { .. }
        )
    }
}

/// Window state change reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    Shown,
    Hidden,
    Exposed,
    Moved { x: i32, y: i32 },
    Resized { width: u32, height: u32 },
    Minimized,
    Maximized,
    Restored,
    Enter,
    Leave,
    FocusGained,
    FocusLost,
    Close,
    TakeFocus,
}

//=== EventSender =========================================================

/// Cloneable producer endpoint of the raw event channel.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<RawEvent>,
    epoch: Instant,
}

impl EventSender {
    pub(crate) fn new(sender: Sender<RawEvent>, epoch: Instant) -> Self {
        Self { sender, epoch }
    }

    /// Seconds since the engine was built.
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Queues a pre-stamped record.
    ///
    /// Control records (see [`RawEventKind::is_control`]) wait for room in
    /// a full channel. Every other record is dropped with a warning while
    /// the channel is full. Returns `false` if the record was dropped or
    /// the engine is gone.
    pub fn post(&self, event: RawEvent) -> bool {
        trace!(target: "platform", "Posting {:?}", event.kind);
        if event.kind.is_control() {
            return match self.sender.send(event) {
                Ok(()) => true,
                Err(SendError(event)) => {
                    warn!(target: "platform", "Engine gone, dropping {:?}", event.kind);
                    false
                }
            };
        }

        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(target: "platform", "Raw event channel full, dropping {:?}", event.kind);
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(target: "platform", "Engine gone, dropping {:?}", event.kind);
                false
            }
        }
    }

    /// Queues `kind` stamped with the current time.
    pub fn send(&self, kind: RawEventKind) -> bool {
        self.post(RawEvent::new(self.now(), kind))
    }

    pub fn post_quit(&self) -> bool {
        self.send(RawEventKind::Quit)
    }

    /// Wakes a thread blocked in `Engine::wait`.
    pub fn wake(&self) -> bool {
        self.send(RawEventKind::Wake)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
