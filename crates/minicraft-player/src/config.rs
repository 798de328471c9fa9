use std::error::Error;

use minicraft_geom::Vec3;
use serde::Deserialize;

/// Most samples a sampled pick ray may take per frame.
pub const MAX_RAY_SAMPLES: f32 = 4096.0;
/// Longest pick ray, in blocks.
pub const MAX_REACH: f32 = 256.0;

/// How the pick ray walks the grid.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RayMode {
    /// Fixed-step samples floored to cells. May skip a cell at grazing angles.
    #[default]
    Sampled,
    /// Every cell the ray crosses, in order.
    Exact,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub gravity: f32,
    /// Downward speed kept while standing, scaled by frame time.
    pub grounded_velocity: f32,
    pub water_damping: f32,
    pub jump_velocity: f32,
    pub eye_height: f32,
    pub reach: f32,
    pub ray_step: f32,
    pub ray_mode: RayMode,
    pub mouse_sensitivity: f32,
    pub preview_offset: [f32; 3],
    /// Feet position; the world's spawn column is used when unset.
    pub spawn: Option<[f32; 3]>,
    /// Block selected at startup, by name.
    pub start_block: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            gravity: 30.0,
            grounded_velocity: 5.0,
            water_damping: 0.7,
            jump_velocity: 10.0,
            eye_height: 1.25,
            reach: 5.0,
            ray_step: 0.1,
            ray_mode: RayMode::Sampled,
            mouse_sensitivity: 0.25,
            preview_offset: [1.5, -1.5, -2.0],
            spawn: None,
            start_block: None,
        }
    }
}

impl PlayerConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Self = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(self.ray_step > 0.0) {
            return Err(format!("ray_step must be positive, got {}", self.ray_step).into());
        }
        if !(0.0..=MAX_REACH).contains(&self.reach) {
            return Err(format!("reach must be within 0..={MAX_REACH}, got {}", self.reach).into());
        }
        if self.reach / self.ray_step > MAX_RAY_SAMPLES {
            return Err(format!(
                "reach {} at ray_step {} needs more than {MAX_RAY_SAMPLES} samples",
                self.reach, self.ray_step
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.water_damping) {
            return Err(format!("water_damping must be within 0..=1, got {}", self.water_damping).into());
        }
        Ok(())
    }

    #[inline]
    pub fn preview_offset(&self) -> Vec3 {
        let [x, y, z] = self.preview_offset;
        Vec3::new(x, y, z)
    }

    #[inline]
    pub fn spawn(&self) -> Option<Vec3> {
        self.spawn.map(|[x, y, z]| Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let cfg = PlayerConfig::from_toml_str("walk_speed = 8.0\nray_mode = \"exact\"").unwrap();
        assert_eq!(cfg.walk_speed, 8.0);
        assert_eq!(cfg.ray_mode, RayMode::Exact);
        assert_eq!(cfg.gravity, 30.0);
        assert_eq!(cfg.eye_height, 1.25);
        assert!(cfg.spawn().is_none());
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(PlayerConfig::from_toml_str("ray_step = 0.0").is_err());
        assert!(PlayerConfig::from_toml_str("water_damping = 1.5").is_err());
    }

    #[test]
    fn reach_is_bounded() {
        assert!(PlayerConfig::from_toml_str("reach = 1e30").is_err());
        assert!(PlayerConfig::from_toml_str("reach = -1.0").is_err());
        // Within the reach limit but too many samples for the step.
        assert!(PlayerConfig::from_toml_str("reach = 200.0\nray_step = 0.01").is_err());
        assert!(PlayerConfig::from_toml_str("reach = 200.0\nray_step = 0.1").is_ok());
        assert!(PlayerConfig::from_toml_str("reach = 0.0").is_ok());
    }
}
