//! Shared fixtures for choreo-core tests: a scripted clip handle with
//! inspectable state, and a few authored tracks.

use std::cell::RefCell;
use std::rc::Rc;

use choreo_core::{Clip, Keyframe, KeyframeTrack, Value};

#[derive(Debug, Default)]
struct ClipInner {
    weight: f32,
    playing: bool,
    looping: bool,
    frame: u32,
    duration: u32,
    play_calls: u32,
    stop_calls: u32,
    last_played_looping: bool,
    weight_log: Vec<f32>,
}

/// Stand-in for a host-engine clip. Cloning shares the underlying state,
/// so a test can hand one clone to the choreographer as `Box<dyn Clip>`
/// and keep another to drive frames and inspect writes.
///
/// `play` restarts playback from frame 0, the way the host engines this
/// models do; use [`ScriptedClip::resume`] to continue without a rewind.
#[derive(Clone, Debug)]
pub struct ScriptedClip {
    inner: Rc<RefCell<ClipInner>>,
}

impl ScriptedClip {
    pub fn new(duration: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClipInner {
                weight: 1.0,
                duration,
                ..ClipInner::default()
            })),
        }
    }

    /// Start playback without going through the `Clip` trait.
    pub fn start(&self, looping: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.playing = true;
        inner.looping = looping;
        inner.frame = 0;
    }

    /// Resume playback at the current frame (no rewind).
    pub fn resume(&self) {
        self.inner.borrow_mut().playing = true;
    }

    /// Move the playhead without firing anything (a host-side scrub).
    pub fn seek(&self, frame: u32) {
        self.inner.borrow_mut().frame = frame;
    }

    /// Advance the playhead as the host's render loop would. Looping clips
    /// wrap modulo the duration; one-shot clips clamp at the end.
    pub fn advance(&self, frames: u32) {
        let mut inner = self.inner.borrow_mut();
        if !inner.playing {
            return;
        }
        let next = inner.frame + frames;
        inner.frame = if inner.looping && inner.duration > 0 {
            next % inner.duration
        } else {
            next.min(inner.duration)
        };
    }

    pub fn weight(&self) -> f32 {
        self.inner.borrow().weight
    }

    pub fn frame(&self) -> u32 {
        self.inner.borrow().frame
    }

    pub fn playing(&self) -> bool {
        self.inner.borrow().playing
    }

    pub fn play_calls(&self) -> u32 {
        self.inner.borrow().play_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.inner.borrow().stop_calls
    }

    pub fn last_played_looping(&self) -> bool {
        self.inner.borrow().last_played_looping
    }

    /// Every weight ever written through the `Clip` trait, in order.
    pub fn weight_log(&self) -> Vec<f32> {
        self.inner.borrow().weight_log.clone()
    }
}

impl Clip for ScriptedClip {
    fn set_weight(&mut self, weight: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.weight = weight;
        inner.weight_log.push(weight);
    }

    fn play(&mut self, looping: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.playing = true;
        inner.looping = looping;
        inner.frame = 0;
        inner.play_calls += 1;
        inner.last_played_looping = looping;
    }

    fn stop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.playing = false;
        inner.stop_calls += 1;
    }

    fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    fn current_frame(&self) -> u32 {
        self.inner.borrow().frame
    }

    fn duration(&self) -> u32 {
        self.inner.borrow().duration
    }
}

/// Two-key scalar ramp from `from` to `to` over `[0, end_frame]`.
pub fn scalar_ramp(name: &str, fps: f32, end_frame: u32, from: f32, to: f32) -> KeyframeTrack {
    KeyframeTrack::new(
        name,
        fps,
        vec![
            Keyframe {
                frame: 0,
                value: Value::Float(from),
            },
            Keyframe {
                frame: end_frame,
                value: Value::Float(to),
            },
        ],
    )
    .expect("ramp fixture should validate")
}

/// A 12-second camera move at 60 fps: glide across the set, hold on the
/// far mark, then pull back. 720 frames end to end.
pub fn camera_flythrough() -> KeyframeTrack {
    let fps = 60.0;
    KeyframeTrack::new(
        "camera-flythrough",
        fps,
        vec![
            Keyframe {
                frame: 0,
                value: Value::Vec3([10.0, 2.0, -10.0]),
            },
            Keyframe {
                frame: 300,
                value: Value::Vec3([-6.0, 2.0, -10.0]),
            },
            Keyframe {
                frame: 480,
                value: Value::Vec3([-6.0, 2.0, -10.0]),
            },
            Keyframe {
                frame: 720,
                value: Value::Vec3([0.0, 3.0, -16.0]),
            },
        ],
    )
    .expect("camera fixture should validate")
}
