//! World module
//!
//! Contains the tile catalog, the grid, and procedural layout generation.

pub mod generation;
pub mod grid;
pub mod tile;

pub use generation::{generate, Layout, LayoutParams, Room};
pub use grid::{Grid, GridError};
pub use tile::{TileCatalog, TileId, TileKind, FLOOR_TILE, UNKNOWN_TILE};
