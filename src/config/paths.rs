//! Path management for kgi-trader
//!
//! ## Path Resolution Order
//!
//! 1. `KGI_TRADER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`directories::BaseDirs`) joined with `kgi-trader`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::TraderError;

/// Manages all paths used by kgi-trader
#[derive(Debug, Clone)]
pub struct TraderPaths {
    /// Base directory for all kgi-trader files
    base_dir: PathBuf,
}

impl TraderPaths {
    /// Create a new TraderPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TraderError> {
        let base_dir = if let Ok(custom) = std::env::var("KGI_TRADER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TraderPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the session journal
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("session.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), TraderError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TraderError::Io(format!("Failed to create base directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, TraderError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| TraderError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("kgi-trader"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraderPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.journal_file(), temp_dir.path().join("session.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let paths = TraderPaths::with_base_dir(nested.clone());

        paths.ensure_directories().unwrap();
        assert!(nested.exists());
    }
}
