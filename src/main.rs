//! Whirling Realms - Entry Point
//!
//! Headless run: builds a world from the config, generates a layout, saves
//! it and reads it back.

use std::path::Path;

use anyhow::{ensure, Result};

use whirling_realms::config::{WorldConfig, DEFAULT_CONFIG_PATH};
use whirling_realms::world::FLOOR_TILE;
use whirling_realms::WorldSession;

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting Whirling Realms v{}", env!("CARGO_PKG_VERSION"));

    let config = WorldConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH));
    let mut session = WorldSession::new(config.clone())?;

    let layout = session.regenerate(config.seed)?;
    log::info!(
        "Layout: {} rooms, {} corridors",
        layout.rooms.len(),
        layout.corridors.len()
    );

    let grid = session.grid();
    let open = grid.count(FLOOR_TILE);
    log::info!(
        "{} of {} cells open ({:.1}%)",
        open,
        grid.width() * grid.height(),
        100.0 * open as f64 / (grid.width() * grid.height()) as f64
    );

    session.save()?;

    // Read the save back into a fresh session
    let mut restored = WorldSession::new(config)?;
    let report = restored.load()?;
    log::info!("Reloaded {} rows, {} cells", report.rows_decoded, report.cells_written);
    ensure!(
        restored.grid() == session.grid(),
        "reloaded world differs from the saved one ({})",
        session.save_path().display()
    );

    log::info!(
        "World {} saved with seed {}",
        session.save_path().display(),
        session.seed().unwrap_or_default()
    );
    Ok(())
}
