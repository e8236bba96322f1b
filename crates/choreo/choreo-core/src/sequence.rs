//! Keyframed sequence playback with awaitable completion.
//!
//! A sequence steps a track over an explicit frame range, one
//! frame-rate-normalized increment per tick, and emits the evaluated value
//! as a per-tick change against its bound target. Non-looping runs resolve
//! a one-shot completion signal when they reach the end; cancelled runs
//! never do.

use core::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::clip::ClipSet;
use crate::error::ChoreoError;
use crate::ids::{SeqId, TrackId};
use crate::outputs::{Change, ChoreoEvent, Outputs};
use crate::signal::CompletionSignal;
use crate::track::KeyframeTrack;

/// Lifecycle of a sequence run.
/// `Running` is the only tick-consuming state; nothing leaves
/// `Completed`/`Cancelled`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SequenceState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl SequenceState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Options for starting a sequence run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SequenceOptions {
    pub start_frame: u32,
    /// Defaults to the track's last keyframe.
    pub end_frame: Option<u32>,
    pub looped: bool,
    /// Playback rate multiplier on top of the track's frame rate.
    pub speed: f32,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: None,
            looped: false,
            speed: 1.0,
        }
    }
}

/// Continuation invoked exactly once when a run completes (never on
/// cancellation). Receives the clip registry so cutscene endings can swap
/// animations before control returns to the user.
pub type CompletionAction = Box<dyn FnOnce(&mut ClipSet)>;

/// Transient execution state of one sequence playback.
pub struct SequenceRun {
    pub id: SeqId,
    pub track: TrackId,
    pub target: String,
    pub start_frame: u32,
    pub end_frame: u32,
    pub looped: bool,
    pub speed: f32,
    current_frame: f32,
    state: SequenceState,
    signal: CompletionSignal,
    on_complete: Option<CompletionAction>,
    /// Whether a cancellation event has been emitted for this run.
    pub(crate) reported: bool,
}

impl SequenceRun {
    pub(crate) fn new(
        id: SeqId,
        track: TrackId,
        target: String,
        start_frame: u32,
        end_frame: u32,
        looped: bool,
        speed: f32,
    ) -> Self {
        Self {
            id,
            track,
            target,
            start_frame,
            end_frame,
            looped,
            speed,
            current_frame: start_frame as f32,
            state: SequenceState::Idle,
            signal: CompletionSignal::new(),
            on_complete: None,
            reported: false,
        }
    }

    #[inline]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    #[inline]
    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    /// Normalized position in [0, 1] over the run's frame range.
    pub fn progress(&self) -> f32 {
        let span = (self.end_frame - self.start_frame) as f32;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.current_frame - self.start_frame as f32) / span).clamp(0.0, 1.0)
    }

    /// A poll handle onto this run's one-shot completion.
    #[inline]
    pub fn signal(&self) -> CompletionSignal {
        self.signal.clone()
    }

    pub(crate) fn set_on_complete(&mut self, action: CompletionAction) {
        self.on_complete = Some(action);
    }

    /// Cancel the run: tick consumption halts immediately and the
    /// completion signal stays unresolved.
    pub(crate) fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = SequenceState::Cancelled;
        }
    }

    /// Step the run by one tick and emit the evaluated value.
    pub(crate) fn advance(
        &mut self,
        tracks: &HashMap<TrackId, KeyframeTrack>,
        clips: &mut ClipSet,
        dt: f32,
        outputs: &mut Outputs,
    ) -> Result<(), ChoreoError> {
        match self.state {
            SequenceState::Idle => {
                self.state = SequenceState::Running;
                outputs.push_event(ChoreoEvent::SequenceStarted { sequence: self.id });
            }
            SequenceState::Running => {}
            _ => return Ok(()),
        }
        let track = tracks
            .get(&self.track)
            .ok_or(ChoreoError::TrackNotFound { track: self.track })?;

        self.current_frame += dt * track.frames_per_second * self.speed;
        if self.current_frame >= self.end_frame as f32 {
            if self.looped {
                let span = (self.end_frame - self.start_frame) as f32;
                self.current_frame =
                    self.start_frame as f32 + fmod(self.current_frame - self.start_frame as f32, span);
            } else {
                self.current_frame = self.end_frame as f32;
                outputs.push_change(Change {
                    target: self.target.clone(),
                    value: track.evaluate(self.current_frame),
                });
                self.state = SequenceState::Completed;
                self.signal.resolve();
                if let Some(action) = self.on_complete.take() {
                    action(clips);
                }
                outputs.push_event(ChoreoEvent::SequenceCompleted { sequence: self.id });
                return Ok(());
            }
        }

        outputs.push_change(Change {
            target: self.target.clone(),
            value: track.evaluate(self.current_frame),
        });
        Ok(())
    }
}

impl fmt::Debug for SequenceRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceRun")
            .field("id", &self.id)
            .field("track", &self.track)
            .field("target", &self.target)
            .field("start_frame", &self.start_frame)
            .field("end_frame", &self.end_frame)
            .field("looped", &self.looped)
            .field("speed", &self.speed)
            .field("current_frame", &self.current_frame)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Positive remainder of `a / b`.
fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_and_terminality() {
        assert_eq!(SequenceState::Idle.name(), "idle");
        assert_eq!(SequenceState::Running.name(), "running");
        assert_eq!(SequenceState::Completed.name(), "completed");
        assert_eq!(SequenceState::Cancelled.name(), "cancelled");
        assert!(!SequenceState::Running.is_terminal());
        assert!(SequenceState::Completed.is_terminal());
        assert!(SequenceState::Cancelled.is_terminal());
    }

    #[test]
    fn fmod_positive_remainder() {
        assert_eq!(fmod(5.0, 3.0), 2.0);
        assert_eq!(fmod(-1.0, 3.0), 2.0);
        assert_eq!(fmod(1.0, 0.0), 0.0);
    }
}
