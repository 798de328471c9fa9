/// Chunk grid position; world cell `c * size + local`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.cx + dx, self.cy + dy, self.cz + dz)
    }

    /// Chunk holding world cell `(wx, wy, wz)` for cubic chunks of `size`.
    #[inline]
    pub fn containing(wx: i32, wy: i32, wz: i32, size: i32) -> Self {
        Self::new(wx.div_euclid(size), wy.div_euclid(size), wz.div_euclid(size))
    }
}
