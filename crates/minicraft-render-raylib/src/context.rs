use std::collections::HashMap;
use std::error::Error;

use minicraft_blocks::{BlockRegistry, EMPTY};
use minicraft_geom::Vec3;
use minicraft_player::{Camera, DepthMode, DrawCmd, DrawList};
use minicraft_world::{ChunkCoord, SparseWorld};
use raylib::prelude::*;

use crate::conv::{color_to_rl, vec3_to_rl};
use crate::gpu;
use crate::mesh::{build_chunk_mesh, cube_mesh};

// Outline is drawn slightly outside the block so the default depth test keeps
// it visible on the block's own faces.
const HIGHLIGHT_SIZE: f32 = 1.01;

pub struct ChunkRender {
    pub models: Vec<Model>,
    pub faces: usize,
}

/// GPU state owned by the app and lent to each draw call.
pub struct RenderContext {
    chunks: HashMap<ChunkCoord, ChunkRender>,
    cube: Model,
}

impl RenderContext {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread) -> Result<Self, Box<dyn Error>> {
        let cube = gpu::upload_mesh(rl, thread, &cube_mesh(Vec3::ZERO, 1.0))
            .into_iter()
            .next()
            .ok_or("failed to upload the block preview cube")?;
        Ok(Self {
            chunks: HashMap::new(),
            cube,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn face_count(&self) -> usize {
        self.chunks.values().map(|c| c.faces).sum()
    }

    /// Mesh chunks never uploaded or written since their last upload.
    /// Returns how many were rebuilt.
    pub fn sync_world(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        world: &mut SparseWorld,
        reg: &BlockRegistry,
    ) -> usize {
        let mut todo: Vec<ChunkCoord> = world
            .chunk_coords()
            .filter(|c| !self.chunks.contains_key(c))
            .collect();
        for c in world.dirty_chunks() {
            if !todo.contains(&c) {
                todo.push(c);
            }
        }
        for &c in &todo {
            let rev = world.chunk_rev(c);
            let cpu = build_chunk_mesh(world, reg, c);
            let models = gpu::upload_mesh(rl, thread, &cpu.mesh);
            self.chunks.insert(
                c,
                ChunkRender {
                    models,
                    faces: cpu.faces,
                },
            );
            world.mark_built(c, rev);
        }
        if !todo.is_empty() {
            log::debug!(
                target: "render",
                "rebuilt {} chunk meshes ({} faces total)",
                todo.len(),
                self.face_count()
            );
        }
        todo.len()
    }

    pub fn draw_world(&self, d3: &mut impl RaylibDraw3D) {
        let origin = Vector3::new(0.0, 0.0, 0.0);
        for chunk in self.chunks.values() {
            for model in &chunk.models {
                d3.draw_model(model, origin, 1.0, Color::WHITE);
            }
        }
    }

    /// Held block, drawn through the player's camera-relative transform.
    pub fn draw_preview(&self, d3: &mut impl RaylibDraw3D, cmd: &DrawCmd, reg: &BlockRegistry) {
        if cmd.block == EMPTY {
            return;
        }
        let Some(ty) = reg.get(cmd.block) else {
            return;
        };
        let m = cmd.transform.to_cols_array();
        unsafe {
            raylib::ffi::rlDrawRenderBatchActive();
            set_depth(cmd.depth);
            raylib::ffi::rlPushMatrix();
            raylib::ffi::rlMultMatrixf(m.as_ptr());
        }
        d3.draw_model(&self.cube, Vector3::new(0.0, 0.0, 0.0), 1.0, color_to_rl(ty.color));
        unsafe {
            raylib::ffi::rlDrawRenderBatchActive();
            raylib::ffi::rlPopMatrix();
            set_depth(DepthMode::Less);
        }
    }

    /// Outline around the targeted cell; raylib has no EQUAL depth function,
    /// so the outline is inflated and drawn under the regular test instead.
    pub fn draw_highlight(&self, d3: &mut impl RaylibDraw3D, cmd: &DrawCmd) {
        let center = vec3_to_rl(cmd.transform.translation());
        d3.draw_cube_wires(
            center,
            HIGHLIGHT_SIZE,
            HIGHLIGHT_SIZE,
            HIGHLIGHT_SIZE,
            Color::BLACK,
        );
    }

    pub fn draw_overlays(&self, d3: &mut impl RaylibDraw3D, list: &DrawList, reg: &BlockRegistry) {
        if list.target.is_some() {
            self.draw_highlight(d3, &list.highlight);
        }
        self.draw_preview(d3, &list.preview, reg);
    }
}

unsafe fn set_depth(mode: DepthMode) {
    match mode {
        DepthMode::Always => unsafe { raylib::ffi::rlDisableDepthTest() },
        DepthMode::Less | DepthMode::Equal => unsafe { raylib::ffi::rlEnableDepthTest() },
    }
}

pub fn camera3d(cam: &Camera, fovy: f32) -> Camera3D {
    Camera3D::perspective(
        vec3_to_rl(cam.position),
        vec3_to_rl(cam.target()),
        vec3_to_rl(cam.up()),
        fovy,
    )
}

/// Crosshair plus one text line per entry in the top-left corner.
pub fn draw_hud(d: &mut impl RaylibDraw, width: i32, height: i32, lines: &[String]) {
    let (cx, cy) = (width / 2, height / 2);
    d.draw_line(cx - 8, cy, cx + 8, cy, Color::WHITE);
    d.draw_line(cx, cy - 8, cx, cy + 8, Color::WHITE);
    for (i, line) in lines.iter().enumerate() {
        d.draw_text(line, 12, 12 + 22 * i as i32, 20, Color::RAYWHITE);
    }
    d.draw_fps(width - 90, 12);
}
