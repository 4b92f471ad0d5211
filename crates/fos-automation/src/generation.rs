//! Slot Generations
//!
//! Every arena slot carries a generation counter that is bumped whenever the
//! node living in it is invalidated. A `NodeRef` remembers the generation it
//! was minted with, so a handle to a dead node never resolves to whatever node
//! reuses the slot later.

/// Generation counter - incremented on every invalidation of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Generation of a freshly allocated slot
    pub const INITIAL: Self = Generation(0);

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::INITIAL
    }
}
