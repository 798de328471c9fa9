//! CPU-side mesh building. No Raylib types here so it can be tested headless.

use minicraft_blocks::{BlockFlags, BlockId, BlockRegistry, EMPTY};
use minicraft_geom::{IVec3, Vec3};
use minicraft_world::{ChunkCoord, SparseWorld, VoxelAccess};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    pub fn normal(self) -> Vec3 {
        match self {
            Face::PosX => Vec3::new(1.0, 0.0, 0.0),
            Face::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Face::PosY => Vec3::new(0.0, 1.0, 0.0),
            Face::NegY => Vec3::new(0.0, -1.0, 0.0),
            Face::PosZ => Vec3::new(0.0, 0.0, 1.0),
            Face::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// In-plane "up" of the face; right is `normal x up`.
    pub fn up(self) -> Vec3 {
        match self {
            Face::PosY => Vec3::new(0.0, 0.0, -1.0),
            Face::NegY => Vec3::new(0.0, 0.0, 1.0),
            _ => Vec3::UP,
        }
    }

    pub fn offset(self) -> IVec3 {
        let n = self.normal();
        IVec3::new(n.x as i32, n.y as i32, n.z as i32)
    }

    /// Fixed per-face brightness standing in for lighting.
    pub fn shade(self) -> f32 {
        match self {
            Face::PosY => 1.0,
            Face::NegY => 0.5,
            Face::PosX | Face::NegX => 0.8,
            Face::PosZ | Face::NegZ => 0.65,
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends one face of an axis-aligned box centred at `center`, `half`
    /// being the box's half extents. Triangles wind counter-clockwise seen
    /// from outside.
    pub fn add_face(&mut self, face: Face, center: Vec3, half: Vec3, rgba: [u8; 4]) {
        let n = face.normal();
        let up = face.up();
        let right = n.cross(up);
        let scale = |v: Vec3| Vec3::new(v.x * half.x, v.y * half.y, v.z * half.z);
        let pos = center + scale(n);
        let hup = scale(up);
        let hright = scale(right);
        let vs = [
            pos + hup + hright,
            pos + hup - hright,
            pos - hup - hright,
            pos - hup + hright,
        ];
        let uvs = [(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let base = self.vertex_count() as u32;
        for (v, (u, t)) in vs.iter().zip(uvs) {
            self.pos.extend_from_slice(&[v.x, v.y, v.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[u, t]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx.extend_from_slice(&[base + 1, base, base + 2, base + 2, base, base + 3]);
    }
}

fn shaded(color: [u8; 3], face: Face) -> [u8; 4] {
    let s = face.shade();
    let ch = |c: u8| (c as f32 * s).round().clamp(0.0, 255.0) as u8;
    [ch(color[0]), ch(color[1]), ch(color[2]), 255]
}

/// A centred cube with all six faces, white with per-face shading so it can
/// be tinted at draw time.
pub fn cube_mesh(center: Vec3, size: f32) -> MeshBuild {
    let mut mb = MeshBuild::default();
    let half = Vec3::splat(size * 0.5);
    for face in Face::ALL {
        mb.add_face(face, center, half, shaded([255, 255, 255], face));
    }
    mb
}

/// Half blocks fill the lower half of their cell.
fn block_box(cell: IVec3, half_block: bool) -> (Vec3, Vec3) {
    let c = cell.as_vec3();
    if half_block {
        (c - Vec3::new(0.0, 0.25, 0.0), Vec3::new(0.5, 0.25, 0.5))
    } else {
        (c, Vec3::HALF)
    }
}

fn hides_face(reg: &BlockRegistry, me: BlockId, neighbour: Option<BlockId>) -> bool {
    let Some(other) = neighbour else {
        return false;
    };
    if other == EMPTY {
        return false;
    }
    let flags = reg.flags(other);
    if flags.contains(BlockFlags::HALF_BLOCK) {
        return false;
    }
    other == me || flags.collides()
}

#[derive(Debug)]
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub mesh: MeshBuild,
    pub faces: usize,
}

/// Mesh every block of chunk `c` whose face is not covered by its neighbour.
pub fn build_chunk_mesh(world: &SparseWorld, reg: &BlockRegistry, c: ChunkCoord) -> ChunkMeshCpu {
    let mut mesh = MeshBuild::default();
    let mut faces = 0;
    for (cell, id) in world.chunk_blocks(c) {
        let Some(ty) = reg.get(id) else { continue };
        let half_block = ty.flags.contains(BlockFlags::HALF_BLOCK);
        let (center, half) = block_box(cell, half_block);
        for face in Face::ALL {
            // The top of a half block is never covered.
            let covered = !(half_block && face == Face::PosY)
                && hides_face(reg, id, world.block_at(cell + face.offset()));
            if covered {
                continue;
            }
            mesh.add_face(face, center, half, shaded(ty.color, face));
            faces += 1;
        }
    }
    ChunkMeshCpu {
        coord: c,
        mesh,
        faces,
    }
}
