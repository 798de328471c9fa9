use std::error::Error;
use std::sync::Arc;

use minicraft_blocks::{BlockFlags, BlockId, BlockRegistry, EMPTY};
use minicraft_geom::{IVec3, Mat4, Quat, Vec3};
use minicraft_world::VoxelAccess;

use crate::camera::Camera;
use crate::collision;
use crate::config::PlayerConfig;
use crate::input::FrameInput;
use crate::physics::{self, MovementState};
use crate::raycast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Removed,
    Placed,
    /// A half block was completed into its double form in place.
    Stacked,
}

/// The single world write a frame may perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    pub pos: IVec3,
    pub kind: EditKind,
    /// Id written to `pos`.
    pub id: BlockId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOutcome {
    pub state: MovementState,
    pub target: Option<IVec3>,
    pub edit: Option<BlockEdit>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthMode {
    /// Regular depth test.
    Less,
    /// Drawn over everything.
    Always,
    /// Only where the surface already sits.
    Equal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCmd {
    pub transform: Mat4,
    pub block: BlockId,
    pub depth: DepthMode,
}

/// Player-owned overlays for the renderer: the held block and the outline of
/// the targeted cell. `highlight.transform` is identity when nothing is
/// targeted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawList {
    pub preview: DrawCmd,
    pub highlight: DrawCmd,
    pub target: Option<IVec3>,
}

pub struct PlayerController {
    registry: Arc<BlockRegistry>,
    cfg: PlayerConfig,
    position: Vec3,
    velocity_y: f32,
    camera: Camera,
    current_block: BlockId,
    highlight: Mat4,
    target: Option<(IVec3, BlockId)>,
    state: MovementState,
}

impl PlayerController {
    pub fn new(registry: Arc<BlockRegistry>, cfg: PlayerConfig, spawn: Vec3) -> Result<Self, Box<dyn Error>> {
        if registry.count() == 0 {
            return Err("player needs at least one registered block".into());
        }
        cfg.validate()?;
        let current_block = match cfg.start_block.as_deref() {
            Some(name) => registry
                .id_by_name(name)
                .ok_or_else(|| format!("start_block `{name}` is not a registered block"))?,
            None if registry.count() > 1 => 1,
            None => EMPTY,
        };
        let camera = Camera::new(spawn + Vec3::new(0.0, cfg.eye_height, 0.0));
        log::info!(
            target: "player",
            "spawned at ({:.2}, {:.2}, {:.2}) holding {}",
            spawn.x,
            spawn.y,
            spawn.z,
            registry.name(current_block)
        );
        Ok(Self {
            registry,
            cfg,
            position: spawn,
            velocity_y: 0.0,
            camera,
            current_block,
            highlight: Mat4::IDENTITY,
            target: None,
            state: MovementState::Airborne,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn set_velocity_y(&mut self, v: f32) {
        self.velocity_y = v;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.camera.rotation = rotation.normalized();
    }

    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    /// Ids outside the registry are ignored.
    pub fn set_current_block(&mut self, id: BlockId) {
        if (id as usize) < self.registry.count() {
            self.current_block = id;
        }
    }

    pub fn highlight_transform(&self) -> Mat4 {
        self.highlight
    }

    pub fn target(&self) -> Option<IVec3> {
        self.target.map(|(p, _)| p)
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Move the feet to `pos` and stop vertical motion.
    pub fn teleport(&mut self, pos: Vec3) {
        self.position = pos;
        self.velocity_y = 0.0;
        self.camera.position = pos + Vec3::new(0.0, self.cfg.eye_height, 0.0);
    }

    /// Advance one frame: walk, look, fall, collide, pick and edit, then
    /// cycle the held block.
    pub fn update<W>(&mut self, dt: f32, input: &FrameInput, world: &mut W) -> FrameOutcome
    where
        W: VoxelAccess + ?Sized,
    {
        let raw = &input.raw;

        let mut wish = Vec3::ZERO;
        if raw.forward {
            wish += Vec3::FORWARD;
        }
        if raw.back {
            wish -= Vec3::FORWARD;
        }
        if raw.left {
            wish -= Vec3::RIGHT;
        }
        if raw.right {
            wish += Vec3::RIGHT;
        }
        let mut walk = self.camera.rotation.rotate(wish);
        walk.y = 0.0;
        self.position += walk.normalized() * (self.cfg.walk_speed * dt);

        let (dx, dy) = raw.mouse_delta;
        let turn = dt * self.cfg.mouse_sensitivity;
        let pitch = Quat::from_axis_angle(self.camera.right(), -dy * turn);
        let yaw = Quat::from_axis_angle(Vec3::UP, -dx * turn);
        let rotation = (yaw * (pitch * self.camera.rotation)).normalized();

        let (vy, state) = physics::step_vertical(
            self.position,
            self.velocity_y,
            dt,
            raw.jump,
            &*world,
            &self.registry,
            &self.cfg,
        );
        self.velocity_y = vy;
        if state != self.state {
            log::debug!(target: "player", "{} -> {}", self.state.label(), state.label());
            self.state = state;
        }
        self.position.y += self.velocity_y * dt;
        self.position = collision::resolve(self.position, &*world, &self.registry);

        self.camera.rotation = rotation;
        self.camera.position = self.position + Vec3::new(0.0, self.cfg.eye_height, 0.0);

        let candidates = raycast::cast_with(
            self.cfg.ray_mode,
            self.camera.position + Vec3::HALF,
            self.camera.forward(),
            self.cfg.reach,
            self.cfg.ray_step,
        );
        let edit = self.interact(&candidates, input, world);

        self.cycle_block(raw.scroll);

        FrameOutcome {
            state,
            target: self.target(),
            edit,
        }
    }

    /// Pick the first candidate that holds a pickable block, highlight it and
    /// apply this frame's button presses to it. Removal wins over placement.
    pub fn interact<W>(&mut self, candidates: &[IVec3], input: &FrameInput, world: &mut W) -> Option<BlockEdit>
    where
        W: VoxelAccess + ?Sized,
    {
        self.highlight = Mat4::IDENTITY;
        self.target = None;

        let (i, pos, id) = candidates.iter().enumerate().find_map(|(i, &pos)| {
            let id = world.block_at(pos)?;
            (id != EMPTY && self.registry.flags(id).pickable()).then_some((i, pos, id))
        })?;
        self.highlight = Mat4::from_translation(pos.as_vec3());
        self.target = Some((pos, id));

        let edit = if input.primary.just_pressed() {
            Some(BlockEdit {
                pos,
                kind: EditKind::Removed,
                id: EMPTY,
            })
        } else if input.secondary.just_pressed() && i > 0 {
            let held = self.current_block;
            if id == held && self.registry.flags(id).contains(BlockFlags::HALF_BLOCK) {
                Some(BlockEdit {
                    pos,
                    kind: EditKind::Stacked,
                    id: held.saturating_add(1),
                })
            } else {
                Some(BlockEdit {
                    pos: candidates[i - 1],
                    kind: EditKind::Placed,
                    id: held,
                })
            }
        } else {
            None
        };

        if let Some(e) = edit {
            world.set_block_at(e.pos, e.id);
            log::info!(
                target: "player",
                "{:?} {} at ({}, {}, {})",
                e.kind,
                self.registry.name(e.id),
                e.pos.x,
                e.pos.y,
                e.pos.z
            );
        }
        edit
    }

    /// Step the held block by the sign of `scroll`, wrapping over every
    /// registered id.
    pub fn cycle_block(&mut self, scroll: i32) {
        if scroll == 0 {
            return;
        }
        let count = self.registry.count() as i64;
        let next = (self.current_block as i64 + scroll.signum() as i64).rem_euclid(count);
        self.current_block = next as BlockId;
        log::debug!(target: "player", "holding {}", self.registry.name(self.current_block));
    }

    pub fn draw_list(&self) -> DrawList {
        DrawList {
            preview: DrawCmd {
                transform: self.camera.world_matrix() * Mat4::from_translation(self.cfg.preview_offset()),
                block: self.current_block,
                depth: DepthMode::Always,
            },
            highlight: DrawCmd {
                transform: self.highlight,
                block: self.target.map_or(EMPTY, |(_, id)| id),
                depth: DepthMode::Equal,
            },
            target: self.target(),
        }
    }
}
