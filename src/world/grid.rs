//! Grid data structure
//!
//! The dense 2D array of tile ids that generation, editing and saves all
//! read and write.

use thiserror::Error;

use super::tile::{TileCatalog, TileId, TileKind, UNKNOWN_TILE};

/// Default pixel edge length of a tile
pub const DEFAULT_TILE_SIZE: i32 = 32;

/// Grid construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),
}

/// A fixed-size world grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tile_size: i32,
    tiles: Vec<TileId>,
}

impl Grid {
    /// Create a new grid with every cell set to `fill`
    pub fn new(width: i32, height: i32, fill: TileId) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tile_size: DEFAULT_TILE_SIZE,
            tiles: vec![fill; width as usize * height as usize],
        })
    }

    /// Override the pixel size of a tile
    pub fn with_tile_size(mut self, tile_size: i32) -> Result<Self, GridError> {
        if tile_size <= 0 {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        self.tile_size = tile_size;
        Ok(self)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile id at position, or `UNKNOWN_TILE` outside the grid
    pub fn get(&self, x: i32, y: i32) -> TileId {
        if self.in_bounds(x, y) {
            self.tiles[self.xy_to_idx(x, y)]
        } else {
            UNKNOWN_TILE
        }
    }

    /// Set tile id at position; writes outside the grid are dropped
    pub fn set(&mut self, x: i32, y: i32, id: TileId) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.tiles[idx] = id;
        }
    }

    /// Overwrite every cell
    pub fn fill(&mut self, id: TileId) {
        self.tiles.fill(id);
    }

    /// One row of tile ids, left to right
    pub fn row(&self, y: i32) -> Option<&[TileId]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let start = self.xy_to_idx(0, y);
        Some(&self.tiles[start..start + self.width as usize])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        self.tiles.chunks(self.width as usize)
    }

    /// Number of cells holding `id`
    pub fn count(&self, id: TileId) -> usize {
        self.tiles.iter().filter(|&&t| t == id).count()
    }

    /// Resolve the kind of the tile at a position
    pub fn kind_at<'a>(&self, x: i32, y: i32, catalog: &'a TileCatalog) -> &'a TileKind {
        catalog.lookup(self.get(x, y))
    }

    /// Check if a position is walkable
    pub fn is_walkable(&self, x: i32, y: i32, catalog: &TileCatalog) -> bool {
        self.in_bounds(x, y) && catalog.is_walkable(self.get(x, y))
    }

    /// Cells whose id the catalog does not define (e.g. from a newer save)
    pub fn unknown_cells(&self, catalog: &TileCatalog) -> usize {
        self.tiles.iter().filter(|&&t| !catalog.contains(t)).count()
    }

    /// Map a pixel position to the cell under it
    pub fn cell_at_pixel(&self, px: f32, py: f32) -> Option<(i32, i32)> {
        let x = (px / self.tile_size as f32).floor() as i32;
        let y = (py / self.tile_size as f32).floor() as i32;
        self.in_bounds(x, y).then_some((x, y))
    }

    /// Pixel rectangle `(x, y, w, h)` covered by a cell
    pub fn cell_rect(&self, x: i32, y: i32) -> (i32, i32, i32, i32) {
        (x * self.tile_size, y * self.tile_size, self.tile_size, self.tile_size)
    }
}
