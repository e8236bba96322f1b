//! Cross-fade blending between two clips.
//!
//! A blend ramps the target clip's weight from 0 to 1 and the source
//! clip's from 1 to 0, one fixed step per tick. The ramp is monotonic and
//! linear, not eased. On the first step the target clip is started in
//! looping mode; when the ramp tops out the source clip is left at weight
//! zero for the host to stop (or not).

use serde::{Deserialize, Serialize};

use crate::clip::ClipSet;
use crate::error::ChoreoError;
use crate::ids::{BlendId, ClipId};

/// Weights within this distance of the ramp ends snap to exactly 0/1.
/// Wide enough to absorb f32 accumulation drift over long ramps.
const WEIGHT_SNAP: f32 = 1e-4;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BlendState {
    Running,
    Completed,
    Aborted,
}

impl BlendState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// One in-flight cross-fade. Created by `Choreographer::begin_blend`,
/// destroyed when terminal.
#[derive(Debug)]
pub struct BlendController {
    pub id: BlendId,
    pub from: ClipId,
    pub to: ClipId,
    step: f32,
    to_weight: f32,
    from_weight: f32,
    started: bool,
    state: BlendState,
}

impl BlendController {
    pub(crate) fn new(id: BlendId, from: ClipId, to: ClipId, step: f32) -> Self {
        Self {
            id,
            from,
            to,
            step,
            to_weight: 0.0,
            from_weight: 1.0,
            started: false,
            state: BlendState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> BlendState {
        self.state
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Advance the ramp by one step and write both weights.
    ///
    /// If either clip handle is gone the blend aborts without touching the
    /// surviving clip, leaving weights wherever the last step put them.
    pub(crate) fn advance(&mut self, clips: &mut ClipSet) -> Result<BlendState, ChoreoError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        for clip in [self.from, self.to] {
            if !clips.contains(clip) {
                self.state = BlendState::Aborted;
                return Err(ChoreoError::ClipUnavailable { clip });
            }
        }

        if !self.started {
            self.started = true;
            if let Some(to) = clips.get_mut(self.to) {
                to.play(true);
            }
        }

        self.to_weight += self.step;
        self.from_weight -= self.step;
        let done = self.to_weight >= 1.0 - WEIGHT_SNAP;
        let (to_w, from_w) = if done {
            (1.0, 0.0)
        } else {
            (
                self.to_weight.clamp(0.0, 1.0),
                self.from_weight.clamp(0.0, 1.0),
            )
        };
        if let Some(to) = clips.get_mut(self.to) {
            to.set_weight(to_w);
        }
        if let Some(from) = clips.get_mut(self.from) {
            from.set_weight(from_w);
        }

        if done {
            self.state = BlendState::Completed;
        }
        Ok(self.state)
    }
}
