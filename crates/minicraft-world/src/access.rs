use hashbrown::HashMap;
use minicraft_blocks::BlockId;
use minicraft_geom::IVec3;

/// Block-level read/write access to a voxel world.
///
/// `None` means the cell is not loaded; callers treat it like a cell that
/// neither collides nor can be picked.
pub trait VoxelAccess {
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId>;

    fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId);

    #[inline]
    fn block_at(&self, p: IVec3) -> Option<BlockId> {
        self.block(p.x, p.y, p.z)
    }

    #[inline]
    fn set_block_at(&mut self, p: IVec3, id: BlockId) {
        self.set_block(p.x, p.y, p.z, id)
    }
}

impl<T: VoxelAccess + ?Sized> VoxelAccess for &mut T {
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        (**self).block(x, y, z)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        (**self).set_block(x, y, z, id)
    }
}

// Unbounded map; only cells present in the map are loaded.
impl VoxelAccess for HashMap<IVec3, BlockId> {
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.get(&IVec3::new(x, y, z)).copied()
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.insert(IVec3::new(x, y, z), id);
    }
}
