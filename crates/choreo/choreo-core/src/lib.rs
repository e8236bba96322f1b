//! Choreo Core (engine-agnostic)
//!
//! Frame-stepped coordination for independently animated entities:
//! cross-fade blending between clips, frame-indexed side-effect events,
//! and awaitable keyframed sequences. The host engine owns clips, assets,
//! and rendering; this crate only advances state one tick per rendered
//! frame and reports value changes and semantic events.

pub mod blend;
pub mod clip;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod sequence;
pub mod signal;
pub mod timeline;
pub mod track;
pub mod value;

// Re-exports for consumers (host adapters)
pub use blend::{BlendController, BlendState};
pub use clip::{Clip, ClipSet};
pub use config::Config;
pub use engine::Choreographer;
pub use error::ChoreoError;
pub use ids::{BlendId, ClipId, EventId, IdAllocator, SeqId, TrackId};
pub use outputs::{Change, ChoreoEvent, Outputs};
pub use sequence::{CompletionAction, SequenceOptions, SequenceRun, SequenceState};
pub use signal::CompletionSignal;
pub use timeline::{EventAction, EventTimeline, TimedEvent};
pub use track::{Keyframe, KeyframeTrack};
pub use value::{Value, ValueKind};

/// Choreography result type
pub type Result<T> = core::result::Result<T, ChoreoError>;
