//! Whirling Realms - tile world core
//!
//! A grid of typed tiles, a room-and-corridor layout generator that writes
//! into it, and the run-length text format worlds are saved in.

pub mod config;
pub mod save;
pub mod session;
pub mod world;

// Re-export commonly used types
pub use config::WorldConfig;
pub use session::{SessionError, WorldSession};
pub use world::{generate, Grid, Layout, LayoutParams, TileCatalog, TileId, TileKind};
