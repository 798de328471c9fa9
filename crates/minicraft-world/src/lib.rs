//! Voxel storage, world access, and terrain generation.
#![forbid(unsafe_code)]

mod access;
mod chunk_coord;
mod sparse;
pub mod worldgen;

pub use access::VoxelAccess;
pub use chunk_coord::ChunkCoord;
pub use sparse::{SparseWorld, WorldStats};
pub use worldgen::{WorldGenConfig, WorldGenMode};

pub const CHUNK_SIZE: i32 = 16;
