//! Frame-indexed event timelines.
//!
//! A timeline watches one clip's playback frame and fires registered
//! actions when the frame crosses their triggers. Firing requires an
//! upward crossing between consecutive ticks, so a single forward frame
//! cannot double-fire and backward seeks fire nothing.
//!
//! Loop boundaries rearm non-`once` events. From frames alone a wrap is
//! indistinguishable from a backward seek, so the rule is: a frame
//! decrease while the clip reports playing is a wrap; a frame decrease on
//! a stopped clip is a scrub and rearms nothing.

use core::fmt;

use crate::clip::ClipSet;
use crate::error::ChoreoError;
use crate::ids::{ClipId, EventId};
use crate::outputs::{ChoreoEvent, Outputs};

/// Side-effecting callback invoked when an event fires. Receives the clip
/// registry so it can stop/play other entities' clips.
pub type EventAction = Box<dyn FnMut(&mut ClipSet) -> anyhow::Result<()>>;

/// A registered (frame, action) pair on one clip.
pub struct TimedEvent {
    pub id: EventId,
    pub trigger_frame: u32,
    pub once: bool,
    fired: bool,
    action: EventAction,
}

impl TimedEvent {
    pub(crate) fn new(id: EventId, trigger_frame: u32, once: bool, action: EventAction) -> Self {
        Self {
            id,
            trigger_frame,
            once,
            fired: false,
            action,
        }
    }

    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl fmt::Debug for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedEvent")
            .field("id", &self.id)
            .field("trigger_frame", &self.trigger_frame)
            .field("once", &self.once)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}

/// Ordered event schedule for a single clip.
#[derive(Debug)]
pub struct EventTimeline {
    pub clip: ClipId,
    /// Kept sorted by (trigger_frame, id) so same-frame events fire in
    /// registration order.
    events: Vec<TimedEvent>,
    last_frame: Option<u32>,
}

impl EventTimeline {
    pub(crate) fn new(clip: ClipId) -> Self {
        Self {
            clip,
            events: Vec::new(),
            last_frame: None,
        }
    }

    pub(crate) fn attach(&mut self, event: TimedEvent) {
        let key = (event.trigger_frame, event.id.0);
        let idx = self
            .events
            .partition_point(|e| (e.trigger_frame, e.id.0) <= key);
        self.events.insert(idx, event);
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Check this clip's frame against every registered event.
    ///
    /// Fails with `ClipUnavailable` when the clip handle is gone; the
    /// caller prunes the timeline. A failing action is reported and does
    /// not stop the remaining checks.
    pub(crate) fn advance(
        &mut self,
        clips: &mut ClipSet,
        outputs: &mut Outputs,
    ) -> Result<(), ChoreoError> {
        let (current, playing) = {
            let handle = clips
                .get(self.clip)
                .ok_or(ChoreoError::ClipUnavailable { clip: self.clip })?;
            (handle.current_frame(), handle.is_playing())
        };

        let wrapped = matches!(self.last_frame, Some(last) if current < last && playing);
        if wrapped {
            for event in &mut self.events {
                if !event.once {
                    event.fired = false;
                }
            }
        }

        if playing {
            // After a wrap the previous frame belongs to the old cycle.
            let prev = if wrapped { None } else { self.last_frame };
            for event in &mut self.events {
                if event.fired {
                    continue;
                }
                let crossed = match prev {
                    Some(p) => p < event.trigger_frame && current >= event.trigger_frame,
                    None => current >= event.trigger_frame,
                };
                if !crossed {
                    continue;
                }
                event.fired = true;
                outputs.push_event(ChoreoEvent::EventFired {
                    clip: self.clip,
                    event: event.id,
                    frame: event.trigger_frame,
                });
                if let Err(err) = (event.action)(clips) {
                    log::warn!(
                        "timeline action for event {:?} on clip {:?} failed: {err:#}",
                        event.id,
                        self.clip
                    );
                    outputs.push_event(ChoreoEvent::ActionFailed {
                        clip: self.clip,
                        event: event.id,
                        reason: format!("{err:#}"),
                    });
                }
            }
        }

        self.last_frame = Some(current);
        Ok(())
    }
}
