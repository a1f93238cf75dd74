//! Tile definitions
//!
//! The tile catalog: a flat, id-indexed table of tile kinds and their properties.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier stored in every grid cell
pub type TileId = u32;

/// Id reserved for "unknown/empty" cells (also returned for out-of-bounds reads)
pub const UNKNOWN_TILE: TileId = 0;

/// Id of the open floor tile carved by the layout generator
pub const FLOOR_TILE: TileId = 1;

/// A kind of tile: immutable data shared by every cell carrying its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileKind {
    pub id: TileId,
    pub name: String,
    pub walkable: bool,
    pub destructible: bool,
    /// Color used by map overviews (RGB)
    #[serde(default)]
    pub minimap_color: (u8, u8, u8),
}

impl TileKind {
    pub fn new(id: TileId, name: impl Into<String>, walkable: bool, destructible: bool) -> Self {
        Self {
            id,
            name: name.into(),
            walkable,
            destructible,
            minimap_color: (0, 0, 0),
        }
    }

    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.minimap_color = color;
        self
    }
}

/// Catalog construction/loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("tile catalog is empty")]
    Empty,
    #[error("tile kind at index {index} has id {found}; ids must match their position")]
    MisplacedId { index: usize, found: TileId },
    #[error("failed to read tile catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tile catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize tile catalog: {0}")]
    Serialize(#[from] ron::Error),
}

/// Registry of tile kinds, indexed by id
///
/// Built once and handed to whoever needs it; there is no way to mutate a
/// catalog after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCatalog {
    kinds: Vec<TileKind>,
    unknown: TileKind,
}

impl TileCatalog {
    /// Build a catalog from an ordered list where `kinds[i].id == i`
    pub fn new(kinds: Vec<TileKind>) -> Result<Self, CatalogError> {
        if kinds.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some((index, kind)) = kinds
            .iter()
            .enumerate()
            .find(|(i, k)| k.id as usize != *i)
        {
            return Err(CatalogError::MisplacedId { index, found: kind.id });
        }

        Ok(Self {
            kinds,
            unknown: unknown_kind(),
        })
    }

    /// Look up a tile kind; unknown ids resolve to the "Unknown" sentinel
    pub fn lookup(&self, id: TileId) -> &TileKind {
        self.kinds.get(id as usize).unwrap_or(&self.unknown)
    }

    /// Name of a tile kind, or `"Unknown"`
    pub fn name_of(&self, id: TileId) -> &str {
        &self.lookup(id).name
    }

    pub fn contains(&self, id: TileId) -> bool {
        (id as usize) < self.kinds.len()
    }

    pub fn is_walkable(&self, id: TileId) -> bool {
        self.lookup(id).walkable
    }

    pub fn is_destructible(&self, id: TileId) -> bool {
        self.lookup(id).destructible
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileKind> {
        self.kinds.iter()
    }

    /// Load a catalog from a RON list of tile kinds
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let kinds: Vec<TileKind> = ron::from_str(&content)?;
        Self::new(kinds)
    }

    /// Load a catalog from file, falling back to the built-in table
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                log::info!("Loaded {} tile kinds from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                log::warn!(
                    "Failed to load tile catalog {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Write the catalog as pretty RON so it can be edited by hand
    pub fn export(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(&self.kinds, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            unknown: unknown_kind(),
        }
    }
}

fn unknown_kind() -> TileKind {
    TileKind::new(UNKNOWN_TILE, "Unknown", false, false)
}

/// Built-in tile table
pub fn default_kinds() -> Vec<TileKind> {
    vec![
        unknown_kind(),
        TileKind::new(FLOOR_TILE, "Floor", true, false).with_color((110, 160, 70)),
        TileKind::new(2, "Stone", false, true).with_color((128, 128, 128)),
        TileKind::new(3, "Water", false, false).with_color((40, 90, 200)),
    ]
}
