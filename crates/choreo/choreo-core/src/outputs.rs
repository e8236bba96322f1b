//! Per-tick output contracts.
//!
//! Outputs carry the value changes produced by sequences this tick, keyed
//! by a stable target string, plus a list of semantic events. The host
//! applies changes and transports events; the core keeps no history.

use serde::Serialize;

use crate::error::ChoreoError;
use crate::ids::{BlendId, ClipId, EventId, SeqId};
use crate::value::Value;

/// One changed target value this tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Change {
    pub target: String,
    pub value: Value,
}

/// Discrete semantic signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub enum ChoreoEvent {
    BlendStarted { blend: BlendId },
    BlendCompleted { blend: BlendId },
    BlendAborted { blend: BlendId, error: ChoreoError },
    EventFired { clip: ClipId, event: EventId, frame: u32 },
    ActionFailed { clip: ClipId, event: EventId, reason: String },
    /// A timeline lost its clip handle and was pruned.
    TimelineDropped { clip: ClipId },
    SequenceStarted { sequence: SeqId },
    SequenceCompleted { sequence: SeqId },
    SequenceCancelled { sequence: SeqId },
}

/// Outputs returned by `Choreographer::tick()`.
#[derive(Clone, Debug, Serialize)]
pub struct Outputs {
    pub changes: Vec<Change>,
    pub events: Vec<ChoreoEvent>,
    /// Per-tick event cap; events past it are dropped with a log line.
    #[serde(skip)]
    max_events: usize,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
            events: Vec::new(),
            max_events: usize::MAX,
        }
    }
}

impl Outputs {
    pub fn with_event_limit(max_events: usize) -> Self {
        Self {
            max_events,
            ..Self::default()
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: ChoreoEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::debug!("per-tick event limit reached, dropping {event:?}");
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
