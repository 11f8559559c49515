//=========================================================================
// Raw Event Queue
//=========================================================================
//
// Consumer side of the platform → core channel.
//
// Architecture:
//   Receiver<RawEvent> → pull() → pending (VecDeque) → pop() / iter()
//                      → block() (waits for one record)
//
// Each pull moves at most one batch and warns when the batch is full;
// callers that need the channel emptied keep pulling until a short batch.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::platform::RawEvent;

//=== Constants ===========================================================

/// Upper bound on records moved out of the channel per pull.
const MAX_EVENTS_PER_PULL: usize = 256;

//=== RawQueue ============================================================

/// Buffers raw records between the channel and the pipeline.
pub(crate) struct RawQueue {
    receiver: Receiver<RawEvent>,
    pending: VecDeque<RawEvent>,
    disconnected: bool,
}

impl RawQueue {
    pub(crate) fn new(receiver: Receiver<RawEvent>) -> Self {
        Self {
            receiver,
            pending: VecDeque::with_capacity(64),
            disconnected: false,
        }
    }

    /// Moves queued records into the pending buffer (bounded).
    pub(crate) fn pull(&mut self) -> usize {
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_PULL {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.pending.push_back(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_PULL {
            warn!(target: "pipeline", "Event queue backlog: drained {} events this pull", drained);
        }

        drained
    }

    /// Pulls batch after batch until the channel reports empty.
    pub(crate) fn pull_all(&mut self) -> usize {
        let mut total = 0;
        loop {
            let drained = self.pull();
            total += drained;
            if drained < MAX_EVENTS_PER_PULL {
                return total;
            }
        }
    }

    /// Next buffered record, oldest first.
    pub(crate) fn pop(&mut self) -> Option<RawEvent> {
        self.pending.pop_front()
    }

    /// Buffered records, oldest first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &RawEvent> {
        self.pending.iter()
    }

    /// Blocks until a record is available and returns it.
    ///
    /// Buffered records are returned first. `None` once every sender is
    /// gone and nothing is buffered.
    pub(crate) fn block(&mut self) -> Option<RawEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.receiver.recv() {
            Ok(event) => Some(event),
            Err(_) => {
                self.disconnected = true;
                None
            }
        }
    }

    /// `true` once the channel has reported that every sender is gone.
    pub(crate) fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
