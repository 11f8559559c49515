//=========================================================================
// Event Normalization Pipeline
//=========================================================================
//
// Turns raw platform records into normalized events and delivers them.
//
// Architecture:
// ```text
//   channel ──> RawQueue ──pop──> translate (pure) ──> apply (mutating)
//                                                          │
//   synthetic (frame/timer/animation events) ──────────────┤
//                                                          ↓
//                                           handler(&Event, &DeviceRegistry)
//                                                          ↓
//                                                 returned to the caller
// ```
//
// Stage 1 may run any number of times on the same record (peeking in
// `pending_count`); stage 2 runs exactly once per record that is popped.
// `Nothing` results are consumed silently and never dispatched.
//
//=========================================================================

//=== Submodules ==========================================================

mod apply;
mod collector;
mod translate;

//=== Re-exports ==========================================================

pub use apply::apply;
pub use translate::{translate, try_translate, Divergence};

use collector::RawQueue;

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use crossbeam_channel::Receiver;
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::deadzone::Deadzone;
use crate::core::event::Event;
use crate::core::registry::DeviceRegistry;
use crate::platform::{RawEvent, RawEventKind};

//=== Handler =============================================================

/// Global event handler. Receives every meaningful event after its state
/// changes have been committed, with read-only access to the registry.
pub type EventHandler = Box<dyn FnMut(&Event, &DeviceRegistry)>;

/// Outcome of draining the raw queue.
enum Drained {
    Event(Event),
    Woken,
    Empty,
}

//=== EventPipeline =======================================================

pub struct EventPipeline {
    queue: RawQueue,
    synthetic: VecDeque<Event>,
    handler: Option<EventHandler>,
    default_deadzone: Deadzone,
}

impl EventPipeline {
    pub(crate) fn new(receiver: Receiver<RawEvent>, default_deadzone: Deadzone) -> Self {
        Self {
            queue: RawQueue::new(receiver),
            synthetic: VecDeque::new(),
            handler: None,
            default_deadzone,
        }
    }

    pub fn default_deadzone(&self) -> Deadzone {
        self.default_deadzone
    }

    //--- Handler ----------------------------------------------------------

    /// Installs the global handler, replacing any previous one.
    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Event, &DeviceRegistry) + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    //--- Synthetic Events -------------------------------------------------

    /// Queues an engine-generated event ahead of any raw record.
    pub fn push_synthetic(&mut self, event: Event) {
        if !event.is_nothing() {
            self.synthetic.push_back(event);
        }
    }

    /// Runs both stages on `raw` right away and queues the result.
    ///
    /// Used for start-up insertions, which must exist before the first
    /// platform record is translated.
    pub fn inject(&mut self, registry: &mut DeviceRegistry, raw: RawEvent) {
        if let Some(event) = self.consume(registry, &raw) {
            self.synthetic.push_back(event);
        }
    }

    //--- Polling ----------------------------------------------------------

    /// Returns the next meaningful event without blocking.
    ///
    /// Raw records that normalize to `Nothing` are consumed on the way,
    /// including wake records, until a meaningful one turns up or the
    /// channel is empty.
    pub fn poll(&mut self, registry: &mut DeviceRegistry) -> Option<Event> {
        if let Some(event) = self.next_synthetic(registry) {
            return Some(event);
        }
        match self.next_queued(registry, false) {
            Drained::Event(event) => Some(event),
            Drained::Woken | Drained::Empty => None,
        }
    }

    /// Blocks until a meaningful event is available.
    ///
    /// Returns `None` as soon as a wake record is reached, whether it was
    /// queued before the call or arrives during it, or when the channel
    /// has no senders left.
    pub fn wait(&mut self, registry: &mut DeviceRegistry) -> Option<Event> {
        if let Some(event) = self.next_synthetic(registry) {
            return Some(event);
        }

        loop {
            match self.next_queued(registry, true) {
                Drained::Event(event) => return Some(event),
                Drained::Woken => return None,
                Drained::Empty => {}
            }

            let raw = self.queue.block()?;
            if raw.kind == RawEventKind::Wake {
                trace!(target: "pipeline", "Woken");
                return None;
            }
            if let Some(event) = self.consume(registry, &raw) {
                self.dispatch(&event, registry);
                return Some(event);
            }
        }
    }

    /// Number of queued records that would produce a meaningful event.
    ///
    /// Runs stage 1 only. A record that cannot be translated yet (it
    /// refers to a device an earlier record inserts) is counted.
    pub fn pending_count(&mut self, registry: &DeviceRegistry) -> usize {
        self.queue.pull_all();

        let raw = self
            .queue
            .iter()
            .filter(|raw| match try_translate(registry, raw) {
                Ok(event) => !event.is_nothing(),
                Err(_) => true,
            })
            .count();

        self.synthetic.len() + raw
    }

    /// `true` once every producer endpoint has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.queue.is_disconnected()
    }

    //--- Internals --------------------------------------------------------

    fn next_synthetic(&mut self, registry: &DeviceRegistry) -> Option<Event> {
        let event = self.synthetic.pop_front()?;
        self.dispatch(&event, registry);
        Some(event)
    }

    /// Consumes queued records until one is meaningful, the channel is
    /// empty, or (with `stop_on_wake`) a wake record is reached.
    fn next_queued(&mut self, registry: &mut DeviceRegistry, stop_on_wake: bool) -> Drained {
        loop {
            let Some(raw) = self.queue.pop() else {
                if self.queue.pull() == 0 {
                    return Drained::Empty;
                }
                continue;
            };

            if stop_on_wake && raw.kind == RawEventKind::Wake {
                trace!(target: "pipeline", "Woken");
                return Drained::Woken;
            }
            if let Some(event) = self.consume(registry, &raw) {
                self.dispatch(&event, registry);
                return Drained::Event(event);
            }
        }
    }

    fn consume(&mut self, registry: &mut DeviceRegistry, raw: &RawEvent) -> Option<Event> {
        let event = translate(registry, raw);
        let event = apply(registry, self.default_deadzone, raw, event);
        trace!(target: "pipeline", "{:?} -> {}", raw.kind, event.name());

        (!event.is_nothing()).then_some(event)
    }

    fn dispatch(&mut self, event: &Event, registry: &DeviceRegistry) {
        if let Some(handler) = self.handler.as_mut() {
            handler(event, registry);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
