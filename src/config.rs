//! World configuration.
//!
//! Everything needed to build a [`World`](crate::world::World): grid size,
//! master seed, resolution knobs and profile settings. Loaded from JSON; any
//! field left out takes its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seeds::WorldSeeds;
use crate::terrain::{ProfileSettings, QualityConfig, MAX_QUALITY};

pub const DEFAULT_WORLD_WIDTH: usize = 49;
pub const DEFAULT_WORLD_HEIGHT: usize = 49;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be in 1..={max}, got {value}")]
    InvalidQuality { name: &'static str, value: u32, max: u32 },
    #[error("world size must be positive, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in tiles
    pub width: usize,
    /// World height in tiles
    pub height: usize,
    /// Master seed; random when absent
    pub seed: Option<u64>,
    /// Overrides the terrain layout seed derived from the master seed
    pub terrain_seed: Option<u64>,
    /// Overrides the per-tile noise seed base
    pub tile_seed: Option<u64>,
    /// Overrides the shuffled reveal order seed
    pub reveal_seed: Option<u64>,
    pub quality: QualityConfig,
    pub profile: ProfileSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            seed: None,
            terrain_seed: None,
            tile_seed: None,
            reveal_seed: None,
            quality: QualityConfig::default(),
            profile: ProfileSettings::default(),
        }
    }
}

impl WorldConfig {
    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sub-seeds for `master`, with any configured overrides applied.
    pub fn world_seeds(&self, master: u64) -> WorldSeeds {
        WorldSeeds::builder(master)
            .terrain(self.terrain_seed)
            .tiles(self.tile_seed)
            .reveal(self.reveal_seed)
            .build()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        check_quality("map_quality", self.quality.map_quality)?;
        check_quality("water_quality", self.quality.water_quality)?;
        Ok(())
    }
}

fn check_quality(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_QUALITY {
        return Err(ConfigError::InvalidQuality {
            name,
            value,
            max: MAX_QUALITY,
        });
    }
    Ok(())
}
