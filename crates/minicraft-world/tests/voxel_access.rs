use hashbrown::HashMap;
use minicraft_blocks::EMPTY;
use minicraft_geom::IVec3;
use minicraft_world::{ChunkCoord, SparseWorld, VoxelAccess};
use proptest::prelude::*;

fn write_through<W: VoxelAccess>(mut w: W, p: IVec3, id: u16) {
    w.set_block_at(p, id);
}

#[test]
fn map_world_treats_missing_cells_as_unloaded() {
    let mut w: HashMap<IVec3, u16> = HashMap::new();
    assert_eq!(w.block(0, 0, 0), None);
    w.set_block(0, 0, 0, EMPTY);
    assert_eq!(w.block(0, 0, 0), Some(EMPTY));
    write_through(&mut w, IVec3::new(1, 2, 3), 4);
    assert_eq!(w.block_at(IVec3::new(1, 2, 3)), Some(4));
}

#[test]
fn sparse_world_forwards_through_mut_reference() {
    let mut w = SparseWorld::new(8, 2, 2, 2);
    write_through(&mut w, IVec3::new(7, 3, 3), 3);
    assert_eq!(w.block(7, 3, 3), Some(3));
    // x = 7 sits on the +X border of chunk 0.
    let mut dirty = w.dirty_chunks();
    dirty.sort();
    assert_eq!(dirty, vec![ChunkCoord::new(0, 0, 0), ChunkCoord::new(1, 0, 0)]);
}

proptest! {
    // Every in-bounds write is read back; every out-of-bounds cell reads as unloaded.
    #[test]
    fn sparse_world_reads_back_writes(x in -8i32..40, y in -8i32..40, z in -8i32..40, id in 1u16..20) {
        let mut w = SparseWorld::new(16, 2, 2, 2);
        w.set_block(x, y, z, id);
        if w.in_bounds(x, y, z) {
            prop_assert_eq!(w.block(x, y, z), Some(id));
            prop_assert_eq!(w.stats().filled_blocks, 1);
        } else {
            prop_assert_eq!(w.block(x, y, z), None);
            prop_assert_eq!(w.stats().allocated_chunks, 0);
        }
    }
}
