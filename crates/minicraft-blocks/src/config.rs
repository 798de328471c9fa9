use serde::Deserialize;

use crate::types::BlockFlags;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    // Positional when absent
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub flags: Vec<FlagName>,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl BlockDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            flags: Vec::new(),
            color: None,
        }
    }

    pub fn compiled_flags(&self) -> BlockFlags {
        self.flags
            .iter()
            .fold(BlockFlags::empty(), |acc, f| acc | f.flag())
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    NoPhysics,
    GravityWater,
    NoRaycast,
    HalfBlock,
}

impl FlagName {
    pub fn flag(self) -> BlockFlags {
        match self {
            FlagName::NoPhysics => BlockFlags::NO_PHYSICS,
            FlagName::GravityWater => BlockFlags::GRAVITY_WATER,
            FlagName::NoRaycast => BlockFlags::NO_RAYCAST,
            FlagName::HalfBlock => BlockFlags::HALF_BLOCK,
        }
    }
}
