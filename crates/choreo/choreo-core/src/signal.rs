//! One-shot completion signals.

use std::cell::Cell;
use std::rc::Rc;

/// One-shot notification resolved exactly once when a bounded sequence
/// finishes. Clones observe the same underlying flag; a cancelled run
/// never resolves its signal.
///
/// Waiting is cooperative: consumers poll from the tick driver (or register
/// a continuation on the owning run) rather than blocking a thread.
#[derive(Clone, Debug, Default)]
pub struct CompletionSignal {
    resolved: Rc<Cell<bool>>,
}

impl CompletionSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.resolved.get()
    }

    pub(crate) fn resolve(&self) {
        self.resolved.set(true);
    }
}
