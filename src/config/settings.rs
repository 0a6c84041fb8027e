//! User settings for kgi-trader
//!
//! Holds the login defaults, the bridge endpoint and the SDK login options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::TraderPaths;
use crate::broker::LoginOptions;
use crate::error::TraderError;
use crate::models::{AccountTypeFilter, TradingMode};

/// User settings for kgi-trader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Mode used when no `--production` flag is given
    #[serde(default)]
    pub default_mode: TradingMode,

    /// Account filter applied at login
    #[serde(default)]
    pub default_filter: AccountTypeFilter,

    /// Base URL of the SDK bridge sidecar
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// HTTP timeout for bridge calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Download contract reference data at login
    #[serde(default = "default_true")]
    pub fetch_contract: bool,

    /// Contract download timeout, in milliseconds
    #[serde(default = "default_contracts_timeout_ms")]
    pub contracts_timeout_ms: u64,

    /// Subscribe to trade reports at login
    #[serde(default = "default_true")]
    pub subscribe_trade: bool,

    /// SDK receive window, in milliseconds
    #[serde(default = "default_receive_window_ms")]
    pub receive_window_ms: u64,

    /// Offline account roster; when set, the bridge is not used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_file: Option<PathBuf>,

    /// Append session events to the journal file
    #[serde(default = "default_true")]
    pub journal_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_contracts_timeout_ms() -> u64 {
    10_000
}

fn default_receive_window_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_mode: TradingMode::default(),
            default_filter: AccountTypeFilter::default(),
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout_secs(),
            fetch_contract: true,
            contracts_timeout_ms: default_contracts_timeout_ms(),
            subscribe_trade: true,
            receive_window_ms: default_receive_window_ms(),
            fixture_file: None,
            journal_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TraderPaths) -> Result<Self, TraderError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TraderError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TraderError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TraderPaths) -> Result<(), TraderError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TraderError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            TraderError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Options passed to the SDK login call
    pub fn login_options(&self) -> LoginOptions {
        LoginOptions {
            fetch_contract: self.fetch_contract,
            contracts_timeout_ms: self.contracts_timeout_ms,
            subscribe_trade: self.subscribe_trade,
            receive_window_ms: self.receive_window_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_mode, TradingMode::Simulation);
        assert_eq!(settings.default_filter, AccountTypeFilter::All);
        assert_eq!(settings.contracts_timeout_ms, 10_000);
        assert_eq!(settings.receive_window_ms, 30_000);
        assert!(settings.fixture_file.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraderPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_filter = AccountTypeFilter::DerivativesOnly;
        settings.bridge_url = "http://10.0.0.2:9000".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_filter, AccountTypeFilter::DerivativesOnly);
        assert_eq!(loaded.bridge_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TraderPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"subscribe_trade": false}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.subscribe_trade);
        assert!(loaded.fetch_contract);
        assert_eq!(loaded.bridge_url, "http://127.0.0.1:8765");
    }

    #[test]
    fn test_login_options_follow_settings() {
        let mut settings = Settings::default();
        settings.fetch_contract = false;
        settings.receive_window_ms = 5_000;

        let options = settings.login_options();
        assert!(!options.fetch_contract);
        assert_eq!(options.receive_window_ms, 5_000);
        assert_eq!(options.contracts_timeout_ms, 10_000);
    }
}
