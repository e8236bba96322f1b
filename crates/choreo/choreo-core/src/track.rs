//! Keyframed property tracks.
//!
//! A track is authored once, validated on construction, and immutable
//! afterwards. Frames are integers; evaluation accepts fractional frames
//! and interpolates linearly between keys, holding the ends outside the
//! authored range.

use serde::{Deserialize, Serialize};

use crate::error::ChoreoError;
use crate::value::Value;

/// A single (frame, value) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub value: Value,
}

/// Ordered keyframe sequence with an authored frame rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    pub name: String,
    /// Authored playback rate; sequence stepping is normalized against it.
    pub frames_per_second: f32,
    keys: Vec<Keyframe>,
    /// When set, the final segment holds its left key's value instead of
    /// interpolating (constant end mode).
    pub hold_final: bool,
}

impl KeyframeTrack {
    /// Build a validated track. Keys must be non-empty, strictly increasing
    /// in frame, and uniform in value kind; the frame rate must be finite
    /// and positive.
    pub fn new(
        name: impl Into<String>,
        frames_per_second: f32,
        keys: Vec<Keyframe>,
    ) -> Result<Self, ChoreoError> {
        let name = name.into();
        if !(frames_per_second.is_finite() && frames_per_second > 0.0) {
            return Err(ChoreoError::InvalidFrameRate {
                rate: frames_per_second,
            });
        }
        if keys.is_empty() {
            return Err(ChoreoError::EmptyTrack { name });
        }
        let kind = keys[0].value.kind();
        for pair in keys.windows(2) {
            if pair[1].frame <= pair[0].frame {
                return Err(ChoreoError::NonMonotonicTrack { name });
            }
        }
        if keys.iter().any(|k| k.value.kind() != kind) {
            return Err(ChoreoError::MixedKindTrack { name });
        }
        Ok(Self {
            name,
            frames_per_second,
            keys,
            hold_final: false,
        })
    }

    /// Same as [`KeyframeTrack::new`] with constant end mode enabled.
    pub fn with_hold_final(
        name: impl Into<String>,
        frames_per_second: f32,
        keys: Vec<Keyframe>,
    ) -> Result<Self, ChoreoError> {
        let mut track = Self::new(name, frames_per_second, keys)?;
        track.hold_final = true;
        Ok(track)
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Frame of the last key.
    #[inline]
    pub fn end_frame(&self) -> u32 {
        self.keys[self.keys.len() - 1].frame
    }

    /// Evaluate the track at a (possibly fractional) frame.
    /// Outside the authored range the end values are held.
    pub fn evaluate(&self, frame: f32) -> Value {
        let n = self.keys.len();
        if n == 1 || frame <= self.keys[0].frame as f32 {
            return self.keys[0].value.clone();
        }
        if frame >= self.keys[n - 1].frame as f32 {
            return self.keys[n - 1].value.clone();
        }
        // Linear scan; tracks here are a handful of keys.
        for i in 0..(n - 1) {
            let f0 = self.keys[i].frame as f32;
            let f1 = self.keys[i + 1].frame as f32;
            if frame >= f0 && frame <= f1 {
                if self.hold_final && i + 2 == n {
                    return self.keys[i].value.clone();
                }
                let t = ((frame - f0) / (f1 - f0).max(f32::EPSILON)).clamp(0.0, 1.0);
                return Value::lerp(&self.keys[i].value, &self.keys[i + 1].value, t)
                    .unwrap_or_else(|| self.keys[i].value.clone());
            }
        }
        self.keys[n - 1].value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> KeyframeTrack {
        KeyframeTrack::new(
            "ramp",
            60.0,
            vec![
                Keyframe {
                    frame: 0,
                    value: Value::Float(0.0),
                },
                Keyframe {
                    frame: 100,
                    value: Value::Float(10.0),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn evaluate_linear_and_held_ends() {
        let track = ramp();
        assert_eq!(track.evaluate(50.0), Value::Float(5.0));
        assert_eq!(track.evaluate(-5.0), Value::Float(0.0));
        assert_eq!(track.evaluate(500.0), Value::Float(10.0));
        assert_eq!(track.end_frame(), 100);
    }

    #[test]
    fn hold_final_keeps_left_value_in_last_segment() {
        let track = KeyframeTrack::with_hold_final(
            "hold",
            60.0,
            vec![
                Keyframe {
                    frame: 0,
                    value: Value::Float(0.0),
                },
                Keyframe {
                    frame: 50,
                    value: Value::Float(5.0),
                },
                Keyframe {
                    frame: 100,
                    value: Value::Float(10.0),
                },
            ],
        )
        .unwrap();
        // First segment still interpolates.
        assert_eq!(track.evaluate(25.0), Value::Float(2.5));
        // Final segment holds.
        assert_eq!(track.evaluate(75.0), Value::Float(5.0));
        assert_eq!(track.evaluate(100.0), Value::Float(10.0));
    }

    #[test]
    fn validation_rejects_bad_tracks() {
        assert!(matches!(
            KeyframeTrack::new("e", 60.0, vec![]),
            Err(ChoreoError::EmptyTrack { .. })
        ));
        assert!(matches!(
            KeyframeTrack::new(
                "m",
                60.0,
                vec![
                    Keyframe {
                        frame: 10,
                        value: Value::Float(0.0)
                    },
                    Keyframe {
                        frame: 10,
                        value: Value::Float(1.0)
                    },
                ],
            ),
            Err(ChoreoError::NonMonotonicTrack { .. })
        ));
        assert!(matches!(
            KeyframeTrack::new(
                "k",
                60.0,
                vec![
                    Keyframe {
                        frame: 0,
                        value: Value::Float(0.0)
                    },
                    Keyframe {
                        frame: 10,
                        value: Value::Vec3([0.0; 3])
                    },
                ],
            ),
            Err(ChoreoError::MixedKindTrack { .. })
        ));
        assert!(matches!(
            KeyframeTrack::new("r", 0.0, vec![]),
            Err(ChoreoError::InvalidFrameRate { .. })
        ));
    }
}
