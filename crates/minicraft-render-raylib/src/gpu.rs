use raylib::prelude::*;

use crate::mesh::MeshBuild;

/// Raylib meshes index with `u16`; bigger builds are split on quad
/// boundaries.
const MAX_VERTS: usize = 65000;

/// Upload a CPU mesh as one or more models sharing the default material.
pub fn upload_mesh(rl: &mut RaylibHandle, thread: &RaylibThread, mb: &MeshBuild) -> Vec<Model> {
    let mut models = Vec::new();
    let total_verts = mb.vertex_count();
    if total_verts == 0 {
        return models;
    }
    let total_quads = total_verts / 4;
    let max_quads = MAX_VERTS / 4;
    let mut q = 0usize;
    while q < total_quads {
        let take_q = (total_quads - q).min(max_quads);
        let v_start = q * 4;
        let v_count = take_q * 4;
        let idx = &mb.idx[q * 6..(q + take_q) * 6];
        let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
        raw.vertexCount = v_count as i32;
        raw.triangleCount = (take_q * 2) as i32;
        unsafe {
            let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
            let tbytes = (v_count * 2 * std::mem::size_of::<f32>()) as u32;
            let cbytes = (v_count * 4 * std::mem::size_of::<u8>()) as u32;
            let ibytes = (idx.len() * std::mem::size_of::<u16>()) as u32;
            raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
            raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
            raw.texcoords = raylib::ffi::MemAlloc(tbytes) as *mut f32;
            raw.colors = raylib::ffi::MemAlloc(cbytes) as *mut u8;
            raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
            std::ptr::copy_nonoverlapping(
                mb.pos[v_start * 3..(v_start + v_count) * 3].as_ptr(),
                raw.vertices,
                v_count * 3,
            );
            std::ptr::copy_nonoverlapping(
                mb.norm[v_start * 3..(v_start + v_count) * 3].as_ptr(),
                raw.normals,
                v_count * 3,
            );
            std::ptr::copy_nonoverlapping(
                mb.uv[v_start * 2..(v_start + v_count) * 2].as_ptr(),
                raw.texcoords,
                v_count * 2,
            );
            std::ptr::copy_nonoverlapping(
                mb.col[v_start * 4..(v_start + v_count) * 4].as_ptr(),
                raw.colors,
                v_count * 4,
            );
            for (i, &v) in idx.iter().enumerate() {
                *raw.indices.add(i) = (v as usize - v_start) as u16;
            }
        }
        let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
        unsafe {
            mesh.upload(false);
        }
        match rl.load_model_from_mesh(thread, unsafe { mesh.make_weak() }) {
            Ok(model) => models.push(model),
            Err(e) => log::warn!(target: "render", "model upload failed: {e}"),
        }
        q += take_q;
    }
    models
}
