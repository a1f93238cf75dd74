//! World session
//!
//! Owns the grid, the tile catalog and the config, and exposes the commands
//! an editor or console issues against them.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::WorldConfig;
use crate::save::{self, DecodeReport, SaveError};
use crate::world::generation::GenerationError;
use crate::world::{generate, Grid, GridError, Layout, TileCatalog, TileId};

/// Errors surfaced by session commands
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("invalid tile id {0}")]
    UnknownTile(TileId),
}

/// A world being edited
#[derive(Debug, Clone)]
pub struct WorldSession {
    config: WorldConfig,
    catalog: TileCatalog,
    grid: Grid,
    /// Layout of the last regeneration, if any
    layout: Option<Layout>,
    /// Seed of the last regeneration
    seed: Option<u64>,
}

impl WorldSession {
    /// Create a session, loading the catalog named by the config if any
    pub fn new(config: WorldConfig) -> Result<Self, SessionError> {
        let catalog = match &config.catalog_path {
            Some(path) => TileCatalog::load_or_default(path),
            None => TileCatalog::default(),
        };
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: WorldConfig, catalog: TileCatalog) -> Result<Self, SessionError> {
        let grid = Grid::new(config.width, config.height, config.fill_id)?
            .with_tile_size(config.tile_size)?;
        log::info!(
            "New world {}x{} ({} tile kinds)",
            grid.width(),
            grid.height(),
            catalog.len()
        );

        Ok(Self {
            config,
            catalog,
            grid,
            layout: None,
            seed: None,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Clear the world and generate a fresh layout
    ///
    /// Without a seed a random one is drawn; it is logged and kept so the
    /// layout can be reproduced.
    pub fn regenerate(&mut self, seed: Option<u64>) -> Result<&Layout, SessionError> {
        // reject bad params before wiping the grid
        self.config.layout.validate()?;

        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        log::info!("Regenerating world with seed {}", seed);

        self.grid.fill(self.config.fill_id);
        let layout = generate(&mut self.grid, &self.config.layout, &mut rng)?;
        self.seed = Some(seed);
        Ok(&*self.layout.insert(layout))
    }

    /// Overwrite every cell with `id`
    pub fn clear(&mut self, id: TileId) {
        self.grid.fill(id);
        self.layout = None;
        log::info!("World cleared to {}", self.catalog.name_of(id));
    }

    /// Paint one cell with a catalog tile; off-grid cells are ignored
    pub fn paint(&mut self, x: i32, y: i32, id: TileId) -> Result<(), SessionError> {
        if !self.catalog.contains(id) {
            return Err(SessionError::UnknownTile(id));
        }
        self.grid.set(x, y, id);
        Ok(())
    }

    /// One line per catalog entry, for a tile listing
    pub fn tile_listing(&self) -> Vec<String> {
        self.catalog
            .iter()
            .map(|kind| format!("ID: {} --- {}", kind.id, kind.name))
            .collect()
    }

    /// Short description of the tile at a cell
    pub fn describe(&self, x: i32, y: i32) -> String {
        let id = self.grid.get(x, y);
        format!("[{}] {}", id, self.catalog.name_of(id))
    }

    /// Path of the configured save file
    pub fn save_path(&self) -> PathBuf {
        save::world_path(&self.config.save_name)
    }

    pub fn save(&self) -> Result<(), SessionError> {
        self.save_to(&self.save_path())
    }

    pub fn load(&mut self) -> Result<DecodeReport, SessionError> {
        let path = self.save_path();
        self.load_from(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SessionError> {
        save::save_world(&self.grid, path)?;
        Ok(())
    }

    /// Load a world file over the current grid
    pub fn load_from(&mut self, path: &Path) -> Result<DecodeReport, SessionError> {
        let report = save::load_world(path, &mut self.grid)?;
        self.layout = None;

        let unknown = self.grid.unknown_cells(&self.catalog);
        if unknown > 0 {
            log::warn!("{} cells hold tile ids missing from the catalog", unknown);
        }
        Ok(report)
    }
}
