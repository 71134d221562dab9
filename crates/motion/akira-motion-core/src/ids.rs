//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Scene element. Allocated by the scene in document order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MediaId(pub u32);

/// Registration scope. `ScopeId::ROOT` is always open and never released.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// Monotonic allocator for the registry-owned ids.
/// Element ids come from the scene instead, so documents can be built standalone.
#[derive(Debug)]
pub struct IdAllocator {
    next_animation: u32,
    next_trigger: u32,
    next_batch: u32,
    next_media: u32,
    next_scope: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_animation: 0,
            next_trigger: 0,
            next_batch: 0,
            next_media: 0,
            // 0 is the root scope
            next_scope: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_animation(&mut self) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation = self.next_animation.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_trigger(&mut self) -> TriggerId {
        let id = TriggerId(self.next_trigger);
        self.next_trigger = self.next_trigger.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_batch(&mut self) -> BatchId {
        let id = BatchId(self.next_batch);
        self.next_batch = self.next_batch.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_media(&mut self) -> MediaId {
        let id = MediaId(self.next_media);
        self.next_media = self.next_media.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope = self.next_scope.wrapping_add(1);
        id
    }
}
