//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/dreamhome/cli.toml`
//! - Windows: `%APPDATA%/dreamhome/cli.toml`

use std::path::{Path, PathBuf};

use dreamhome_protocol::constants::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};

const DEFAULT_CLOUD_NAME: &str = "dzl3lrrdm";
const DEFAULT_UPLOAD_PRESET: &str = "Dream Home Preset";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the listing REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Image host cloud the pictures are stored in.
    #[serde(default = "default_cloud_name")]
    pub cloud_name: String,

    /// Unsigned upload preset configured on that cloud.
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_cloud_name() -> String {
    DEFAULT_CLOUD_NAME.into()
}

fn default_upload_preset() -> String {
    DEFAULT_UPLOAD_PRESET.into()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cloud_name: default_cloud_name(),
            upload_preset: default_upload_preset(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = CliConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("dreamhome").join("cli.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dreamhome")
            .join("cli.toml"))
    }
}
