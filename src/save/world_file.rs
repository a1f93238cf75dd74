//! World save files
//!
//! Writes and reads run-length encoded grids to/from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::codec::{decode, encode, DecodeReport};
use crate::world::Grid;

/// Save/load errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file {0} does not exist")]
    NotFound(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SaveError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            SaveError::NotFound(path.to_path_buf())
        } else {
            SaveError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "whirlingrealms", "WhirlingRealms") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a named world file
pub fn world_path(name: &str) -> PathBuf {
    save_directory().join(name)
}

/// Check if a world file exists
pub fn world_exists(path: &Path) -> bool {
    path.is_file()
}

/// Save a grid to `path`, creating parent directories as needed
pub fn save_world(grid: &Grid, path: &Path) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SaveError::io(parent, e))?;
    }

    fs::write(path, encode(grid)).map_err(|e| SaveError::io(path, e))?;

    log::info!("World saved to {}", path.display());
    Ok(())
}

/// Load a grid from `path`
///
/// The grid is only touched once the whole file has been read; a missing or
/// unreadable file leaves it as it was.
pub fn load_world(path: &Path, grid: &mut Grid) -> Result<DecodeReport, SaveError> {
    let text = fs::read_to_string(path).map_err(|e| SaveError::io(path, e))?;
    let report = decode(&text, grid);

    if report.is_clean() {
        log::info!("World loaded from {}", path.display());
    } else {
        log::warn!(
            "World loaded from {} with {} skipped tokens",
            path.display(),
            report.diagnostics.len()
        );
    }
    Ok(report)
}

/// Delete a world file
pub fn delete_world(path: &Path) -> Result<(), SaveError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| SaveError::io(path, e))?;
        log::info!("Deleted world file {}", path.display());
    }
    Ok(())
}
