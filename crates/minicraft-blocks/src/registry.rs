use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{BlockFlags, BlockId, EMPTY};

const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

// Applied to id 0 whatever the config says.
const EMPTY_FLAGS: BlockFlags = BlockFlags::NO_PHYSICS.union(BlockFlags::NO_RAYCAST);

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub flags: BlockFlags,
    pub color: [u8; 3],
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            flags: BlockFlags::empty(),
            color: [255, 0, 255],
        }
    }

    #[inline]
    pub fn is_half_block(&self) -> bool {
        self.flags.contains(BlockFlags::HALF_BLOCK)
    }
}

/// Read-only table from block id to block metadata, built once at startup.
#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// The block set shipped with the game.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| format!("reading blocks config {}: {e}", path.display()))?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        if cfg.blocks.is_empty() {
            return Err("block config defines no blocks".into());
        }
        let mut reg = BlockRegistry::new();
        let mut defined: Vec<bool> = Vec::new();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name `{}`", def.name).into());
            }
            if defined.get(id as usize).copied().unwrap_or(false) {
                return Err(format!("duplicate block id {id} (`{}`)", def.name).into());
            }
            let mut flags = def.compiled_flags();
            if id == EMPTY && !flags.contains(EMPTY_FLAGS) {
                log::warn!(
                    "block `{}` uses the empty id 0; forcing no_physics + no_raycast",
                    def.name
                );
                flags |= EMPTY_FLAGS;
            }
            let ty = BlockType {
                id,
                name: def.name.clone(),
                flags,
                color: def.color.unwrap_or([255, 255, 255]),
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize_with(id as usize + 1, || BlockType::placeholder(0));
                defined.resize(id as usize + 1, false);
            }
            reg.blocks[id as usize] = ty;
            defined[id as usize] = true;
            reg.by_name.insert(def.name, id);
        }
        // Gaps left by explicit ids keep their own index.
        for (i, ty) in reg.blocks.iter_mut().enumerate() {
            if !defined[i] {
                *ty = BlockType::placeholder(i as BlockId);
            }
        }
        if !defined[EMPTY as usize] {
            reg.blocks[EMPTY as usize].flags = EMPTY_FLAGS;
        }
        for ty in &reg.blocks {
            if ty.is_half_block() && !defined.get(ty.id as usize + 1).copied().unwrap_or(false) {
                return Err(format!(
                    "half block `{}` (id {}) has no stacked form at id {}",
                    ty.name,
                    ty.id,
                    ty.id as usize + 1
                )
                .into());
            }
        }
        log::debug!("block registry built with {} ids", reg.blocks.len());
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    /// Flags for `id`; unknown ids have no flags.
    #[inline]
    pub fn flags(&self, id: BlockId) -> BlockFlags {
        self.get(id).map(|t| t.flags).unwrap_or_default()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: BlockId) -> &str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Number of block ids, gaps included. Block cycling wraps modulo this.
    #[inline]
    pub fn count(&self) -> usize {
        self.blocks.len()
    }
}
