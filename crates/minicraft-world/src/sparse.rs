use hashbrown::HashMap;
use minicraft_blocks::{BlockId, EMPTY};
use minicraft_geom::IVec3;

use crate::access::VoxelAccess;
use crate::chunk_coord::ChunkCoord;

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldStats {
    pub allocated_chunks: usize,
    pub filled_blocks: usize,
    pub rev_entries: usize,
    pub built_entries: usize,
}

/// Chunked block storage over a fixed loaded region with simple change tracking.
///
/// The region spans `[0, chunks_x * size)` on X, and likewise on Y and Z.
/// Chunks are allocated on the first non-empty write; unallocated chunks
/// inside the region read as `EMPTY`.
pub struct SparseWorld {
    size: i32,
    chunks_x: i32,
    chunks_y: i32,
    chunks_z: i32,
    chunks: HashMap<ChunkCoord, Box<[BlockId]>>,
    // Change-tracking
    rev: HashMap<ChunkCoord, u64>, // latest write affecting chunk
    built: HashMap<ChunkCoord, u64>, // last revision a consumer rebuilt from
    counter: u64,
}

impl SparseWorld {
    pub fn new(size: i32, chunks_x: i32, chunks_y: i32, chunks_z: i32) -> Self {
        Self {
            size: size.max(1),
            chunks_x: chunks_x.max(1),
            chunks_y: chunks_y.max(1),
            chunks_z: chunks_z.max(1),
            chunks: HashMap::new(),
            rev: HashMap::new(),
            built: HashMap::new(),
            counter: 0,
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.size
    }

    /// World extent in blocks along X, Y, Z.
    pub fn extent(&self) -> IVec3 {
        IVec3::new(
            self.chunks_x * self.size,
            self.chunks_y * self.size,
            self.chunks_z * self.size,
        )
    }

    #[inline]
    pub fn in_bounds(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let e = self.extent();
        (0..e.x).contains(&wx) && (0..e.y).contains(&wy) && (0..e.z).contains(&wz)
    }

    #[inline]
    fn chunk_key(&self, wx: i32, wy: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wy, wz, self.size)
    }

    #[inline]
    fn local_index(&self, wx: i32, wy: i32, wz: i32) -> usize {
        let s = self.size;
        let lx = wx.rem_euclid(s) as usize;
        let ly = wy.rem_euclid(s) as usize;
        let lz = wz.rem_euclid(s) as usize;
        let s = s as usize;
        (ly * s + lz) * s + lx
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            allocated_chunks: self.chunks.len(),
            filled_blocks: self
                .chunks
                .values()
                .map(|c| c.iter().filter(|&&b| b != EMPTY).count())
                .sum(),
            rev_entries: self.rev.len(),
            built_entries: self.built.len(),
        }
    }

    /// Write without change tracking; used while generating terrain.
    /// Returns false when the cell is outside the loaded region.
    pub fn put(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        if !self.in_bounds(wx, wy, wz) {
            return false;
        }
        let k = self.chunk_key(wx, wy, wz);
        let idx = self.local_index(wx, wy, wz);
        let volume = (self.size * self.size * self.size) as usize;
        match self.chunks.get_mut(&k) {
            Some(chunk) => chunk[idx] = id,
            None if id == EMPTY => {}
            None => {
                let mut chunk = vec![EMPTY; volume].into_boxed_slice();
                chunk[idx] = id;
                self.chunks.insert(k, chunk);
            }
        }
        true
    }

    /// All chunk coordinates of the loaded region, in X-Z-Y order.
    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        (0..self.chunks_y).flat_map(move |cy| {
            (0..self.chunks_z)
                .flat_map(move |cz| (0..self.chunks_x).map(move |cx| ChunkCoord::new(cx, cy, cz)))
        })
    }

    /// Non-empty blocks stored in chunk `c`.
    pub fn chunk_blocks(&self, c: ChunkCoord) -> Vec<(IVec3, BlockId)> {
        let Some(chunk) = self.chunks.get(&c) else {
            return Vec::new();
        };
        let s = self.size as usize;
        let base = IVec3::new(c.cx * self.size, c.cy * self.size, c.cz * self.size);
        chunk
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != EMPTY)
            .map(|(i, &b)| {
                let lx = (i % s) as i32;
                let lz = ((i / s) % s) as i32;
                let ly = (i / (s * s)) as i32;
                (base + IVec3::new(lx, ly, lz), b)
            })
            .collect()
    }

    /// Change-tracking: mark the chunk containing the cell and any face neighbour
    /// whose border the cell touches. Returns a new monotonically increasing stamp.
    pub fn bump_region_around(&mut self, wx: i32, wy: i32, wz: i32) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        for k in self.affected_chunks(wx, wy, wz) {
            self.rev.insert(k, stamp);
        }
        stamp
    }

    /// Chunk containing the cell first, then neighbours sharing a border with it.
    pub fn affected_chunks(&self, wx: i32, wy: i32, wz: i32) -> Vec<ChunkCoord> {
        let c = self.chunk_key(wx, wy, wz);
        let s = self.size;
        let border = |w: i32| -> Vec<i32> {
            let l = w.rem_euclid(s);
            let mut v = vec![0];
            if l == 0 {
                v.push(-1);
            }
            if l == s - 1 {
                v.push(1);
            }
            v
        };
        let (ox, oy, oz) = (border(wx), border(wy), border(wz));
        let mut affected = vec![c];
        for &dx in &ox {
            for &dy in &oy {
                for &dz in &oz {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let k = c.offset(dx, dy, dz);
                    if !affected.contains(&k) {
                        affected.push(k);
                    }
                }
            }
        }
        affected
    }

    pub fn chunk_rev(&self, c: ChunkCoord) -> u64 {
        self.rev.get(&c).copied().unwrap_or(0)
    }

    pub fn built_rev(&self, c: ChunkCoord) -> u64 {
        self.built.get(&c).copied().unwrap_or(0)
    }

    pub fn mark_built(&mut self, c: ChunkCoord, rev: u64) {
        // Only update if this is a newer revision
        let e = self.built.entry(c).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn needs_rebuild(&self, c: ChunkCoord) -> bool {
        self.chunk_rev(c) > self.built_rev(c)
    }

    /// Chunks written since a consumer last marked them built.
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .rev
            .keys()
            .copied()
            .filter(|c| self.needs_rebuild(*c))
            .collect();
        out.sort();
        out
    }

    /// Highest cell in column `(wx, wz)` whose block satisfies `pred`.
    pub fn top_where(&self, wx: i32, wz: i32, pred: impl Fn(BlockId) -> bool) -> Option<i32> {
        (0..self.extent().y)
            .rev()
            .find(|&wy| self.block(wx, wy, wz).is_some_and(&pred))
    }
}

impl VoxelAccess for SparseWorld {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        if !self.in_bounds(wx, wy, wz) {
            return None;
        }
        let k = self.chunk_key(wx, wy, wz);
        Some(
            self.chunks
                .get(&k)
                .map(|c| c[self.local_index(wx, wy, wz)])
                .unwrap_or(EMPTY),
        )
    }

    fn set_block(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) {
        if !self.put(wx, wy, wz, id) {
            log::debug!(target: "world", "ignored write outside loaded region at ({wx}, {wy}, {wz})");
            return;
        }
        let stamp = self.bump_region_around(wx, wy, wz);
        log::trace!(target: "world", "set ({wx}, {wy}, {wz}) = {id} rev={stamp}");
    }
}
