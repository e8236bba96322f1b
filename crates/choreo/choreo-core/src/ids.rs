//! Identifiers and a simple allocator for core entities.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BlendId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SeqId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EventId(pub u32);

/// Monotonic allocator for all core id kinds.
/// Dense indices keep lookups cheap; ids are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_clip: u32,
    next_track: u32,
    next_blend: u32,
    next_seq: u32,
    next_event: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_clip(&mut self) -> ClipId {
        let id = ClipId(self.next_clip);
        self.next_clip = self.next_clip.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_track(&mut self) -> TrackId {
        let id = TrackId(self.next_track);
        self.next_track = self.next_track.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_blend(&mut self) -> BlendId {
        let id = BlendId(self.next_blend);
        self.next_blend = self.next_blend.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_seq(&mut self) -> SeqId {
        let id = SeqId(self.next_seq);
        self.next_seq = self.next_seq.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_event(&mut self) -> EventId {
        let id = EventId(self.next_event);
        self.next_event = self.next_event.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
