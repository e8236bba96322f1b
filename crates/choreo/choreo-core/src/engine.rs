//! Choreographer: data ownership and the per-tick drive loop.
//!
//! Owns the clip registry, the loaded tracks, and every active blend,
//! timeline, and sequence. One `tick(dt)` per rendered frame advances all
//! of them in a stable order (blends, then timelines, then sequences;
//! registration order within each) so outputs are reproducible.

use hashbrown::HashMap;

use crate::blend::{BlendController, BlendState};
use crate::clip::{Clip, ClipSet};
use crate::config::Config;
use crate::error::ChoreoError;
use crate::ids::{BlendId, ClipId, EventId, IdAllocator, SeqId, TrackId};
use crate::outputs::{ChoreoEvent, Outputs};
use crate::sequence::{SequenceOptions, SequenceRun, SequenceState};
use crate::signal::CompletionSignal;
use crate::timeline::{EventTimeline, TimedEvent};
use crate::track::KeyframeTrack;

/// Single-threaded, frame-stepped animation coordinator.
#[derive(Debug)]
pub struct Choreographer {
    cfg: Config,
    ids: IdAllocator,
    clips: ClipSet,
    tracks: HashMap<TrackId, KeyframeTrack>,
    blends: Vec<BlendController>,
    timelines: Vec<EventTimeline>,
    sequences: Vec<SequenceRun>,
    outputs: Outputs,
}

impl Choreographer {
    pub fn new(cfg: Config) -> Self {
        Self {
            ids: IdAllocator::new(),
            clips: ClipSet::new(),
            tracks: HashMap::new(),
            blends: Vec::with_capacity(cfg.blend_capacity),
            timelines: Vec::with_capacity(cfg.timeline_capacity),
            sequences: Vec::with_capacity(cfg.sequence_capacity),
            outputs: Outputs::with_event_limit(cfg.max_events_per_tick),
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Register a host-owned clip handle, returning its id.
    pub fn register_clip(&mut self, handle: Box<dyn Clip>) -> ClipId {
        let id = self.ids.alloc_clip();
        self.clips.insert(id, handle);
        id
    }

    /// Drop a clip handle. Blends and timelines still referencing it abort
    /// on their next tick and are pruned; siblings are unaffected.
    pub fn remove_clip(&mut self, clip: ClipId) -> Option<Box<dyn Clip>> {
        self.clips.take(clip)
    }

    #[inline]
    pub fn clips(&self) -> &ClipSet {
        &self.clips
    }

    /// Direct clip control (stop one group, play another) outside any
    /// blend or timeline.
    #[inline]
    pub fn clips_mut(&mut self) -> &mut ClipSet {
        &mut self.clips
    }

    /// Load an authored track, returning its id. Tracks are immutable once
    /// loaded.
    pub fn load_track(&mut self, track: KeyframeTrack) -> TrackId {
        let id = self.ids.alloc_track();
        self.tracks.insert(id, track);
        id
    }

    #[inline]
    pub fn track(&self, id: TrackId) -> Option<&KeyframeTrack> {
        self.tracks.get(&id)
    }

    /// Start a cross-fade from one clip to another.
    ///
    /// `step` is the per-tick weight increment and must lie in (0, 1];
    /// rejected synchronously otherwise, with nothing applied. The target
    /// clip starts playing (looping) on the blend's first tick.
    pub fn begin_blend(
        &mut self,
        from: ClipId,
        to: ClipId,
        step: f32,
    ) -> Result<BlendId, ChoreoError> {
        if !(step.is_finite() && step > 0.0 && step <= 1.0) {
            return Err(ChoreoError::InvalidStepSize { step });
        }
        for clip in [from, to] {
            if !self.clips.contains(clip) {
                return Err(ChoreoError::ClipNotFound { clip });
            }
        }
        let id = self.ids.alloc_blend();
        self.blends.push(BlendController::new(id, from, to, step));
        Ok(id)
    }

    /// Number of blends still ramping.
    #[inline]
    pub fn active_blends(&self) -> usize {
        self.blends.len()
    }

    /// Register a frame-indexed event on a clip.
    ///
    /// Events sharing a clip are checked independently each tick, in
    /// ascending trigger-frame order (registration order on ties). With
    /// `once` unset the event rearms on every loop of the clip.
    pub fn attach_event(
        &mut self,
        clip: ClipId,
        trigger_frame: u32,
        action: impl FnMut(&mut ClipSet) -> anyhow::Result<()> + 'static,
        once: bool,
    ) -> Result<EventId, ChoreoError> {
        let duration = self
            .clips
            .get(clip)
            .ok_or(ChoreoError::ClipNotFound { clip })?
            .duration();
        if trigger_frame > duration {
            return Err(ChoreoError::TriggerOutOfRange {
                frame: trigger_frame,
                duration,
            });
        }
        let id = self.ids.alloc_event();
        let event = TimedEvent::new(id, trigger_frame, once, Box::new(action));
        match self.timelines.iter_mut().find(|t| t.clip == clip) {
            Some(timeline) => timeline.attach(event),
            None => {
                let mut timeline = EventTimeline::new(clip);
                timeline.attach(event);
                self.timelines.push(timeline);
            }
        }
        Ok(id)
    }

    /// Play a track over a frame range against a target key.
    ///
    /// The per-tick frame increment is `dt * frames_per_second * speed`,
    /// so real-time duration is independent of the rendering frame rate.
    pub fn play_sequence(
        &mut self,
        track: TrackId,
        target: impl Into<String>,
        opts: SequenceOptions,
    ) -> Result<SeqId, ChoreoError> {
        let data = self
            .tracks
            .get(&track)
            .ok_or(ChoreoError::TrackNotFound { track })?;
        let end_frame = opts.end_frame.unwrap_or_else(|| data.end_frame());
        if opts.start_frame >= end_frame || end_frame > data.end_frame() {
            return Err(ChoreoError::InvalidFrameRange {
                start: opts.start_frame,
                end: end_frame,
            });
        }
        if !(opts.speed.is_finite() && opts.speed > 0.0) {
            return Err(ChoreoError::InvalidSpeed { speed: opts.speed });
        }
        let id = self.ids.alloc_seq();
        self.sequences.push(SequenceRun::new(
            id,
            track,
            target.into(),
            opts.start_frame,
            end_frame,
            opts.looped,
            opts.speed,
        ));
        Ok(id)
    }

    /// Cancel a run. Tick consumption halts immediately; the completion
    /// signal stays unresolved, so a cancelled run is distinguishable from
    /// a completed one.
    pub fn stop_sequence(&mut self, sequence: SeqId) -> Result<(), ChoreoError> {
        self.sequence_mut(sequence)?.cancel();
        Ok(())
    }

    pub fn sequence_state(&self, sequence: SeqId) -> Result<SequenceState, ChoreoError> {
        Ok(self.sequence(sequence)?.state())
    }

    /// Poll handle onto a run's one-shot completion.
    pub fn completion_signal(&self, sequence: SeqId) -> Result<CompletionSignal, ChoreoError> {
        Ok(self.sequence(sequence)?.signal())
    }

    /// Register a continuation to run when the sequence completes. If the
    /// run already completed the continuation is invoked immediately; on a
    /// cancelled run it never runs.
    pub fn on_sequence_complete(
        &mut self,
        sequence: SeqId,
        action: impl FnOnce(&mut ClipSet) + 'static,
    ) -> Result<(), ChoreoError> {
        let run = self
            .sequences
            .iter_mut()
            .find(|s| s.id == sequence)
            .ok_or(ChoreoError::SequenceNotFound { sequence })?;
        match run.state() {
            SequenceState::Completed => action(&mut self.clips),
            SequenceState::Cancelled => {}
            _ => run.set_on_complete(Box::new(action)),
        }
        Ok(())
    }

    pub fn sequence(&self, sequence: SeqId) -> Result<&SequenceRun, ChoreoError> {
        self.sequences
            .iter()
            .find(|s| s.id == sequence)
            .ok_or(ChoreoError::SequenceNotFound { sequence })
    }

    fn sequence_mut(&mut self, sequence: SeqId) -> Result<&mut SequenceRun, ChoreoError> {
        self.sequences
            .iter_mut()
            .find(|s| s.id == sequence)
            .ok_or(ChoreoError::SequenceNotFound { sequence })
    }

    /// Advance simulated time by one frame.
    ///
    /// The only entry point that moves components. Within the tick, blends
    /// advance first, then timelines, then sequences, each in registration
    /// order; failed components are reported and pruned without affecting
    /// siblings.
    pub fn tick(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        let clips = &mut self.clips;
        let outputs = &mut self.outputs;

        self.blends.retain_mut(|blend| {
            let first = !blend.has_started();
            match blend.advance(clips) {
                Ok(state) => {
                    if first {
                        outputs.push_event(ChoreoEvent::BlendStarted { blend: blend.id });
                    }
                    if state == BlendState::Completed {
                        outputs.push_event(ChoreoEvent::BlendCompleted { blend: blend.id });
                        false
                    } else {
                        true
                    }
                }
                Err(error) => {
                    log::warn!("blend {:?} aborted: {error}", blend.id);
                    outputs.push_event(ChoreoEvent::BlendAborted {
                        blend: blend.id,
                        error,
                    });
                    false
                }
            }
        });

        self.timelines.retain_mut(|timeline| {
            match timeline.advance(clips, outputs) {
                Ok(()) => true,
                Err(error) => {
                    log::warn!("timeline on clip {:?} dropped: {error}", timeline.clip);
                    outputs.push_event(ChoreoEvent::TimelineDropped {
                        clip: timeline.clip,
                    });
                    false
                }
            }
        });

        let tracks = &self.tracks;
        for run in &mut self.sequences {
            match run.state() {
                SequenceState::Idle | SequenceState::Running => {
                    if let Err(error) = run.advance(tracks, clips, dt, outputs) {
                        log::warn!("sequence {:?} halted: {error}", run.id);
                        run.cancel();
                    }
                }
                SequenceState::Cancelled if !run.reported => {
                    run.reported = true;
                    outputs.push_event(ChoreoEvent::SequenceCancelled { sequence: run.id });
                }
                _ => {}
            }
        }

        &self.outputs
    }
}
