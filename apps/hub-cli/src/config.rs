//! Hub configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/gaming-hub/hub.toml`
//! - Windows: `%APPDATA%/gaming-hub/hub.toml`

use std::path::{Path, PathBuf};

use gaming_hub_catalog::DEFAULT_API_BASE_URL;
use gaming_hub_catalog::snapshot::default_data_dir;
use serde::{Deserialize, Serialize};

/// Hub configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the games REST resource.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// When false the catalog never contacts the backend.
    #[serde(default = "default_remote_enabled")]
    pub remote_enabled: bool,

    /// Per-request timeout for backend calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for the offline snapshot. Empty means the platform default.
    #[serde(default)]
    pub data_dir: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_remote_enabled() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            remote_enabled: default_remote_enabled(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: String::new(),
        }
    }
}

impl HubConfig {
    /// Loads configuration from `path`, or creates a default there if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: HubConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = HubConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Loads configuration from the platform path.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Snapshot directory, falling back to the platform default.
    pub fn data_dir(&self) -> Option<PathBuf> {
        if self.data_dir.trim().is_empty() {
            default_data_dir()
        } else {
            Some(PathBuf::from(&self.data_dir))
        }
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("gaming-hub")
            .join("hub.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("gaming-hub").join("hub.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/gaming-hub/hub.toml"))
    }
}
