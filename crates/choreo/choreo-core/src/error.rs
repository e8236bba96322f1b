//! Error types for the choreography core.

use serde::{Deserialize, Serialize};

use crate::ids::{ClipId, EventId, SeqId, TrackId};

/// Error type covering every fallible core operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ChoreoError {
    /// Cross-fade step size outside (0, 1]
    #[error("Invalid blend step size: {step} (expected 0 < step <= 1)")]
    InvalidStepSize { step: f32 },

    /// Inverted or out-of-track frame range
    #[error("Invalid frame range: [{start}, {end}]")]
    InvalidFrameRange { start: u32, end: u32 },

    /// Sequence speed must be finite and positive
    #[error("Invalid sequence speed: {speed}")]
    InvalidSpeed { speed: f32 },

    /// Track authored with no keyframes
    #[error("Track '{name}' has no keyframes")]
    EmptyTrack { name: String },

    /// Keyframe frames must be strictly increasing
    #[error("Track '{name}' keyframes are not strictly increasing")]
    NonMonotonicTrack { name: String },

    /// All keyframes of a track must hold the same value kind
    #[error("Track '{name}' mixes value kinds")]
    MixedKindTrack { name: String },

    /// Track frame rate must be finite and positive
    #[error("Invalid track frame rate: {rate}")]
    InvalidFrameRate { rate: f32 },

    /// Event trigger frame past the end of the owning clip
    #[error("Trigger frame {frame} is past the end of the clip (duration {duration})")]
    TriggerOutOfRange { frame: u32, duration: u32 },

    /// No clip registered under this id
    #[error("Clip not found: {clip:?}")]
    ClipNotFound { clip: ClipId },

    /// A registered clip handle disappeared while a component still referenced it
    #[error("Clip no longer available: {clip:?}")]
    ClipUnavailable { clip: ClipId },

    /// No track loaded under this id
    #[error("Track not found: {track:?}")]
    TrackNotFound { track: TrackId },

    /// No sequence run under this id
    #[error("Sequence not found: {sequence:?}")]
    SequenceNotFound { sequence: SeqId },

    /// A timeline action callback reported a failure
    #[error("Action failed for event {event:?}: {reason}")]
    ActionFailed { event: EventId, reason: String },
}

impl ChoreoError {
    /// Error category for logging/metrics.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidStepSize { .. }
            | Self::InvalidFrameRange { .. }
            | Self::InvalidSpeed { .. }
            | Self::EmptyTrack { .. }
            | Self::NonMonotonicTrack { .. }
            | Self::MixedKindTrack { .. }
            | Self::InvalidFrameRate { .. }
            | Self::TriggerOutOfRange { .. } => "validation",
            Self::ClipNotFound { .. }
            | Self::TrackNotFound { .. }
            | Self::SequenceNotFound { .. } => "registry",
            Self::ClipUnavailable { .. } | Self::ActionFailed { .. } => "runtime",
        }
    }

    /// Runtime errors are reported and dropped; the tick loop keeps going.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ClipUnavailable { .. } | Self::ActionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let validation = ChoreoError::InvalidStepSize { step: -0.5 };
        assert_eq!(validation.category(), "validation");
        assert!(!validation.is_recoverable());

        let registry = ChoreoError::ClipNotFound { clip: ClipId(3) };
        assert_eq!(registry.category(), "registry");

        let runtime = ChoreoError::ClipUnavailable { clip: ClipId(3) };
        assert_eq!(runtime.category(), "runtime");
        assert!(runtime.is_recoverable());
    }

    #[test]
    fn serde_roundtrip() {
        let err = ChoreoError::ActionFailed {
            event: EventId(7),
            reason: "boom".to_string(),
        };
        let s = serde_json::to_string(&err).unwrap();
        let back: ChoreoError = serde_json::from_str(&s).unwrap();
        assert_eq!(err, back);
    }
}
