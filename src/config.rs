//! World configuration
//!
//! Loaded from a RON file, with fallback to built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::{LayoutParams, TileId, UNKNOWN_TILE};

/// Default location of the config file
pub const DEFAULT_CONFIG_PATH: &str = "assets/data/world.ron";

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Everything needed to set up a world session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in tiles
    pub width: i32,
    /// Grid height in tiles
    pub height: i32,
    /// Pixel edge length of one tile
    pub tile_size: i32,
    /// Tile the grid starts out with, and is cleared to before regenerating
    pub fill_id: TileId,
    /// File name of the world save inside the save directory
    pub save_name: String,
    /// Fixed generation seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// RON tile catalog to use instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Room-and-corridor generation parameters
    pub layout: LayoutParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
            tile_size: 32,
            fill_id: UNKNOWN_TILE,
            save_name: "world1.csv".to_string(),
            seed: None,
            catalog_path: None,
            layout: LayoutParams::default(),
        }
    }
}

impl WorldConfig {
    /// Load config from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Load config from file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the config as pretty RON
    pub fn export(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }
}
