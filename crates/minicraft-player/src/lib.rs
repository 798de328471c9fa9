//! First-person player: movement, gravity, point collision and block picking.
#![forbid(unsafe_code)]

pub mod camera;
pub mod collision;
pub mod config;
pub mod input;
pub mod physics;
pub mod player;
pub mod raycast;

pub use camera::Camera;
pub use config::{PlayerConfig, RayMode};
pub use input::{ButtonState, FrameInput, InputState, InputTracker};
pub use physics::MovementState;
pub use player::{BlockEdit, DepthMode, DrawCmd, DrawList, EditKind, FrameOutcome, PlayerController};
