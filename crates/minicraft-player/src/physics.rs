use minicraft_blocks::{BlockFlags, BlockId, BlockRegistry};
use minicraft_geom::{IVec3, Vec3};
use minicraft_world::VoxelAccess;

use crate::config::PlayerConfig;

/// What the ground probe found under the feet this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementState {
    Grounded,
    #[default]
    Airborne,
    InLiquid,
}

impl MovementState {
    pub fn classify(probe: Option<BlockId>, reg: &BlockRegistry) -> Self {
        let Some(id) = probe else {
            return MovementState::Airborne;
        };
        let flags = reg.flags(id);
        if flags.collides() {
            MovementState::Grounded
        } else if flags.contains(BlockFlags::GRAVITY_WATER) {
            MovementState::InLiquid
        } else {
            MovementState::Airborne
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovementState::Grounded => "grounded",
            MovementState::Airborne => "airborne",
            MovementState::InLiquid => "in liquid",
        }
    }
}

/// Cell under a predicted feet position. X and Z are biased to the cell
/// centre, Y is not, so the probe reads the block the feet sink into.
#[inline]
pub fn probe_cell(next: Vec3) -> IVec3 {
    IVec3::new(
        (next.x + 0.5).floor() as i32,
        next.y.floor() as i32,
        (next.z + 0.5).floor() as i32,
    )
}

/// Apply gravity, probe the ground at the predicted position and return the
/// new vertical velocity with the state it was derived from. Position is not
/// touched; the caller integrates `velocity_y * dt` afterwards.
pub fn step_vertical<W>(
    position: Vec3,
    velocity_y: f32,
    dt: f32,
    jump: bool,
    world: &W,
    reg: &BlockRegistry,
    cfg: &PlayerConfig,
) -> (f32, MovementState)
where
    W: VoxelAccess + ?Sized,
{
    let mut vy = velocity_y - cfg.gravity * dt;
    let next = position + Vec3::new(0.0, vy * dt, 0.0);
    let state = MovementState::classify(world.block_at(probe_cell(next)), reg);
    match state {
        MovementState::Grounded => {
            vy = -cfg.grounded_velocity * dt;
            if jump {
                vy = cfg.jump_velocity;
            }
        }
        MovementState::InLiquid => {
            vy *= cfg.water_damping;
            if jump {
                vy = cfg.jump_velocity;
            }
        }
        MovementState::Airborne => {}
    }
    (vy, state)
}
