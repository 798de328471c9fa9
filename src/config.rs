use std::error::Error;
use std::fs;
use std::path::Path;

use minicraft_player::PlayerConfig;
use minicraft_world::WorldGenConfig;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub title: String,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Minicraft".to_string(),
            fov: 70.0,
            target_fps: 60,
        }
    }
}

/// Contents of `minicraft.toml`. Every table and field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub world: WorldGenConfig,
    pub window: WindowConfig,
}

impl GameConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Self = toml::from_str(toml_str)?;
        cfg.player.validate()?;
        cfg.world.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        Self::from_toml_str(&s).map_err(|e| format!("invalid config {}: {e}", path.display()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minicraft_player::RayMode;
    use minicraft_world::WorldGenMode;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.player.reach, 5.0);
        assert_eq!(cfg.world.seed, WorldGenConfig::default().seed);
    }

    #[test]
    fn sections_override_independently() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [player]
            ray_mode = "exact"
            spawn = [4.0, 30.0, 4.0]

            [world]
            mode = "flat"
            seed = 99

            [window]
            fov = 90.0
        "#,
        )
        .unwrap();
        assert_eq!(cfg.player.ray_mode, RayMode::Exact);
        assert_eq!(cfg.player.spawn, Some([4.0, 30.0, 4.0]));
        assert_eq!(cfg.player.walk_speed, PlayerConfig::default().walk_speed);
        assert_eq!(cfg.world.mode, WorldGenMode::Flat);
        assert_eq!(cfg.world.seed, 99);
        assert_eq!(cfg.window.fov, 90.0);
        assert_eq!(cfg.window.height, 720);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(GameConfig::from_toml_str("[player]\nray_step = -1.0").is_err());
        assert!(GameConfig::from_toml_str("[world]\nchunks_x = 0").is_err());
        assert!(GameConfig::from_toml_str("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn shipped_config_parses() {
        let s = include_str!("../minicraft.toml");
        assert!(GameConfig::from_toml_str(s).is_ok());
    }
}
