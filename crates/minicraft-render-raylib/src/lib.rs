//! Raylib front-end: CPU cube meshes, chunk upload and the frame's draw calls.
// Unsafe is required for Raylib mesh upload and rlgl state changes in this crate.

pub mod context;
pub mod conv;
pub mod gpu;
pub mod mesh;

pub use context::{RenderContext, camera3d, draw_hud};
pub use mesh::{Face, MeshBuild, build_chunk_mesh, cube_mesh};
