use bitflags::bitflags;

pub type BlockId = u16;

/// The absence of a block. Always id 0.
pub const EMPTY: BlockId = 0;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct BlockFlags: u8 {
        /// Entities pass through; no collision and no gravity stop.
        const NO_PHYSICS = 1 << 0;
        /// Dampens vertical velocity and allows swimming up.
        const GRAVITY_WATER = 1 << 1;
        /// Invisible to picking and editing.
        const NO_RAYCAST = 1 << 2;
        /// Stacks into `id + 1` when the same block is placed onto it.
        const HALF_BLOCK = 1 << 3;
    }
}

impl BlockFlags {
    #[inline]
    pub fn collides(self) -> bool {
        !self.contains(BlockFlags::NO_PHYSICS)
    }

    #[inline]
    pub fn pickable(self) -> bool {
        !self.contains(BlockFlags::NO_RAYCAST)
    }
}
