use std::error::Error;
use std::sync::Arc;

use minicraft_blocks::BlockRegistry;
use minicraft_player::{FrameOutcome, InputState, InputTracker, PlayerController};
use minicraft_world::{SparseWorld, VoxelAccess, worldgen};

use crate::config::GameConfig;

/// Longest frame the simulation will integrate in one step.
const MAX_FRAME_DT: f32 = 0.1;

/// Everything the game simulates, without any window.
pub struct Session {
    registry: Arc<BlockRegistry>,
    world: SparseWorld,
    player: PlayerController,
    tracker: InputTracker,
    frames: u64,
    edits: u64,
}

impl Session {
    pub fn new(cfg: &GameConfig, registry: Arc<BlockRegistry>) -> Result<Self, Box<dyn Error>> {
        let world = worldgen::generate(&registry, &cfg.world)?;
        let spawn = cfg
            .player
            .spawn()
            .unwrap_or_else(|| worldgen::spawn_point(&world, &registry));
        let player = PlayerController::new(Arc::clone(&registry), cfg.player.clone(), spawn)?;
        Ok(Self {
            registry,
            world,
            player,
            tracker: InputTracker::new(),
            frames: 0,
            edits: 0,
        })
    }

    pub fn step(&mut self, dt: f32, raw: InputState) -> FrameOutcome {
        let input = self.tracker.update(raw);
        let out = self
            .player
            .update(dt.clamp(0.0, MAX_FRAME_DT), &input, &mut self.world);
        self.frames += 1;
        if out.edit.is_some() {
            self.edits += 1;
        }
        out
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn world(&self) -> &SparseWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SparseWorld {
        &mut self.world
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn edits(&self) -> u64 {
        self.edits
    }

    pub fn hud_lines(&self, last: &FrameOutcome) -> Vec<String> {
        let p = self.player.position();
        let mut lines = vec![
            format!("holding: {}", self.registry.name(self.player.current_block())),
            format!("{} at ({:.1}, {:.1}, {:.1})", last.state.label(), p.x, p.y, p.z),
        ];
        if let Some(t) = last.target {
            let name = self.world_block_name(t.x, t.y, t.z).unwrap_or("unloaded");
            lines.push(format!("looking at {} ({}, {}, {})", name, t.x, t.y, t.z));
        }
        lines
    }

    fn world_block_name(&self, x: i32, y: i32, z: i32) -> Option<&str> {
        self.world.block(x, y, z).map(|id| self.registry.name(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minicraft_blocks::EMPTY;
    use minicraft_geom::Vec3;
    use minicraft_player::{Camera, EditKind, MovementState};
    use minicraft_world::{WorldGenConfig, WorldGenMode};

    fn flat_session() -> Session {
        let cfg = GameConfig {
            world: WorldGenConfig {
                mode: WorldGenMode::Flat,
                chunks_x: 2,
                chunks_y: 2,
                chunks_z: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let reg = Arc::new(BlockRegistry::builtin().unwrap());
        Session::new(&cfg, reg).unwrap()
    }

    #[test]
    fn idle_player_lands_on_flat_ground() {
        let mut s = flat_session();
        let ground = s.world().block(16, 8, 16);
        assert_eq!(ground, s.registry().id_by_name("grass"));
        let mut last = None;
        for _ in 0..90 {
            last = Some(s.step(1.0 / 60.0, InputState::default()));
        }
        assert_eq!(last.map(|o| o.state), Some(MovementState::Grounded));
        assert!((s.player().position().y - 9.0).abs() < 1e-3);
        assert_eq!(s.frames(), 90);
    }

    #[test]
    fn clicking_while_looking_down_digs_the_ground() {
        let mut s = flat_session();
        for _ in 0..30 {
            s.step(1.0 / 60.0, InputState::default());
        }
        let down = Camera::from_yaw_pitch(Vec3::ZERO, 0.0, -1.5).rotation;
        s.player_mut().set_rotation(down);
        let click = InputState {
            primary: true,
            ..Default::default()
        };
        let out = s.step(0.0, click);
        let edit = out.edit.unwrap();
        assert_eq!(edit.kind, EditKind::Removed);
        assert_eq!(edit.pos.y, 8);
        assert_eq!(s.world().block_at(edit.pos), Some(EMPTY));
        assert!(!s.world().dirty_chunks().is_empty());
        // Still held: no second edit.
        assert!(s.step(0.0, click).edit.is_none());
        assert_eq!(s.edits(), 1);
    }

    #[test]
    fn hud_names_the_held_block() {
        let mut s = flat_session();
        let out = s.step(1.0 / 60.0, InputState::default());
        let lines = s.hud_lines(&out);
        assert!(lines[0].contains(s.registry().name(s.player().current_block())));
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut s = flat_session();
        let y0 = s.player().position().y;
        s.step(5.0, InputState::default());
        // One clamped step of free fall moves well under a block.
        assert!(y0 - s.player().position().y < 1.0);
    }
}
