//! Core configuration.

use serde::{Deserialize, Serialize};

/// Sizing knobs for the choreographer.
/// Kept minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity hints for the component lists.
    pub blend_capacity: usize,
    pub timeline_capacity: usize,
    pub sequence_capacity: usize,

    /// Maximum events retained per tick; the rest are dropped and logged.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blend_capacity: 8,
            timeline_capacity: 16,
            sequence_capacity: 8,
            max_events_per_tick: 1024,
        }
    }
}
