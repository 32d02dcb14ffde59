//! Path management for kofer
//!
//! Provides XDG-compliant path resolution for the encrypted store file.
//!
//! ## Path Resolution Order
//!
//! 1. `KOFER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_DATA_HOME/kofer` or `~/.local/share/kofer`
//! 3. Windows: `%APPDATA%\kofer`

use std::path::PathBuf;

use crate::error::{KoferError, KoferResult};

/// Name of the encrypted store file inside the data directory
const STORE_FILE_NAME: &str = "kofer.dat";

/// Manages all paths used by kofer
#[derive(Debug, Clone)]
pub struct KoferPaths {
    /// Base directory for all kofer data
    base_dir: PathBuf,
}

impl KoferPaths {
    /// Create a new KoferPaths instance
    ///
    /// Path resolution:
    /// 1. `KOFER_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_DATA_HOME/kofer` or `~/.local/share/kofer`
    /// 3. Windows: `%APPDATA%\kofer`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> KoferResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var("KOFER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create KoferPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.local/share/kofer/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the encrypted store file
    pub fn store_file(&self) -> PathBuf {
        self.base_dir.join(STORE_FILE_NAME)
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> KoferResult<()> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            KoferError::Persistence(format!("Failed to create base directory: {}", e))
        })?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> KoferResult<PathBuf> {
    // Unix (Linux/macOS): Use XDG_DATA_HOME if set, otherwise ~/.local/share
    let data_base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".local").join("share")
        });
    Ok(data_base.join("kofer"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> KoferResult<PathBuf> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| KoferError::Persistence("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("kofer"))
}
