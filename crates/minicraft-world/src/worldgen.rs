use std::error::Error;
use std::fs;
use std::path::Path;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use minicraft_blocks::{BlockId, BlockRegistry, EMPTY};
use minicraft_geom::Vec3;
use serde::Deserialize;

use crate::CHUNK_SIZE;
use crate::access::VoxelAccess;
use crate::sparse::SparseWorld;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorldGenMode {
    Normal,
    Flat,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub mode: WorldGenMode,
    pub seed: i32,
    pub chunks_x: i32,
    pub chunks_y: i32,
    pub chunks_z: i32,
    pub height_frequency: f32,
    pub min_height: i32,
    pub max_height: i32,
    pub sea_level: i32,
    pub dirt_depth: i32,
    pub flat_height: i32,
    pub tree_chance: f32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            mode: WorldGenMode::Normal,
            seed: 1337,
            chunks_x: 4,
            chunks_y: 2,
            chunks_z: 4,
            height_frequency: 0.03,
            min_height: 6,
            max_height: 20,
            sea_level: 9,
            dirt_depth: 3,
            flat_height: 8,
            tree_chance: 0.01,
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunks_x <= 0 || self.chunks_y <= 0 || self.chunks_z <= 0 {
            return Err("world chunk counts must be positive".into());
        }
        if self.min_height > self.max_height {
            return Err(format!(
                "min_height {} is above max_height {}",
                self.min_height, self.max_height
            )
            .into());
        }
        let (name, top) = match self.mode {
            WorldGenMode::Normal => ("max_height", self.max_height),
            WorldGenMode::Flat => ("flat_height", self.flat_height),
        };
        if top >= self.chunks_y * CHUNK_SIZE {
            return Err(format!(
                "{name} {top} does not fit in {} vertical chunks",
                self.chunks_y
            )
            .into());
        }
        Ok(())
    }
}

// Names resolved once against the registry; missing names fall back to stone.
struct Palette {
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    water: Option<BlockId>,
    log: Option<BlockId>,
    leaves: Option<BlockId>,
}

impl Palette {
    fn resolve(reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let stone = reg
            .id_by_name("stone")
            .ok_or("world generation needs a `stone` block")?;
        Ok(Self {
            stone,
            dirt: reg.id_by_name("dirt").unwrap_or(stone),
            grass: reg.id_by_name("grass").unwrap_or(stone),
            sand: reg.id_by_name("sand").unwrap_or(stone),
            water: reg.id_by_name("water"),
            log: reg.id_by_name("log"),
            leaves: reg.id_by_name("leaves"),
        })
    }
}

fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

fn rand01(seed: u32, ix: i32, iz: i32, salt: u32) -> f32 {
    let h = hash2(ix, iz, (seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

/// Build a world sized by `cfg` and fill it with terrain.
pub fn generate(reg: &BlockRegistry, cfg: &WorldGenConfig) -> Result<SparseWorld, Box<dyn Error>> {
    cfg.validate()?;
    let palette = Palette::resolve(reg)?;
    let mut world = SparseWorld::new(CHUNK_SIZE, cfg.chunks_x, cfg.chunks_y, cfg.chunks_z);
    let extent = world.extent();

    let mut terrain = FastNoiseLite::with_seed(cfg.seed);
    terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
    terrain.set_frequency(Some(cfg.height_frequency));

    let mut trees = Vec::new();
    for wz in 0..extent.z {
        for wx in 0..extent.x {
            let height = match cfg.mode {
                WorldGenMode::Flat => cfg.flat_height,
                WorldGenMode::Normal => {
                    let n = (terrain.get_noise_2d(wx as f32, wz as f32) + 1.0) * 0.5;
                    let span = (cfg.max_height - cfg.min_height) as f32;
                    cfg.min_height + (n.clamp(0.0, 1.0) * span).round() as i32
                }
            };
            let height = height.clamp(0, extent.y - 1);
            let shore = cfg.mode == WorldGenMode::Normal && height <= cfg.sea_level + 1;
            for wy in 0..=height {
                let id = if wy == height {
                    if shore { palette.sand } else { palette.grass }
                } else if wy > height - cfg.dirt_depth {
                    if shore { palette.sand } else { palette.dirt }
                } else {
                    palette.stone
                };
                world.put(wx, wy, wz, id);
            }
            if cfg.mode == WorldGenMode::Normal {
                if let Some(water) = palette.water {
                    for wy in (height + 1)..=cfg.sea_level.min(extent.y - 1) {
                        world.put(wx, wy, wz, water);
                    }
                }
                if !shore && rand01(cfg.seed as u32, wx, wz, 0xA53F9) < cfg.tree_chance {
                    trees.push((wx, height + 1, wz));
                }
            }
        }
    }

    if let (Some(log_id), Some(leaves)) = (palette.log, palette.leaves) {
        for &(x, y, z) in &trees {
            place_tree(&mut world, x, y, z, log_id, leaves, cfg.seed as u32);
        }
    }
    log::info!(
        target: "world",
        "generated {}x{}x{} world (seed {}, mode {:?}, {} trees)",
        extent.x,
        extent.y,
        extent.z,
        cfg.seed,
        cfg.mode,
        trees.len()
    );
    Ok(world)
}

fn place_tree(world: &mut SparseWorld, x: i32, y: i32, z: i32, log_id: BlockId, leaves: BlockId, seed: u32) {
    let trunk = 4 + (hash2(x, z, seed ^ 0x0051_F0A7) % 2) as i32;
    let top = y + trunk - 1;
    for dy in -2..=1 {
        let r = if dy >= 0 { 1 } else { 2 };
        for dz in -r..=r {
            for dx in -r..=r {
                let (lx, ly, lz) = (x + dx, top + dy, z + dz);
                if world.block(lx, ly, lz) == Some(EMPTY) {
                    world.put(lx, ly, lz, leaves);
                }
            }
        }
    }
    for ty in y..=top {
        world.put(x, ty, z, log_id);
    }
}

/// Feet position above the highest colliding block of the column at the
/// world's centre, or its bottom when the column is empty.
pub fn spawn_point(world: &SparseWorld, reg: &BlockRegistry) -> Vec3 {
    let e = world.extent();
    let (x, z) = (e.x / 2, e.z / 2);
    let top = world
        .top_where(x, z, |b| b != EMPTY && reg.flags(b).collides())
        .unwrap_or(0);
    // Cells are centred on integer coordinates; the top face sits at +0.5.
    Vec3::new(x as f32, top as f32 + 1.0, z as f32)
}
