//! Configuration management for drivelink

use crate::client::{DEFAULT_BASE_URL, DEFAULT_PREVIEW_BASE_URL, DEFAULT_TOKEN_AUDIENCE};
use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration directory name
const CONFIG_DIR: &str = "drivelink";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub graph: GraphConfig,
    pub upload: Option<UploadConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Graph endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_preview_base_url")]
    pub preview_base_url: String,
    #[serde(default = "default_token_audience")]
    pub token_audience: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            preview_base_url: default_preview_base_url(),
            token_audience: default_token_audience(),
        }
    }
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Content type used when the caller does not provide one
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_content_type: default_content_type(),
        }
    }
}

/// Logging configuration, consumed by the host binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_preview_base_url() -> String {
    DEFAULT_PREVIEW_BASE_URL.to_string()
}

fn default_token_audience() -> String {
    DEFAULT_TOKEN_AUDIENCE.to_string()
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home =
        home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    let config_dir = home.join(".config").join(CONFIG_DIR);

    // Create directory if it doesn't exist
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    Ok(config_dir)
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from the default location
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from an explicit path
pub fn load_config_from(config_path: &Path) -> Result<ConfigFile> {
    if !config_path.exists() {
        return Err(Error::ConfigNotFound(config_path.to_path_buf()));
    }

    let content = fs::read_to_string(config_path)
        .map_err(|e| Error::InvalidConfig(format!("Failed to read config file: {}", e)))?;

    let config: ConfigFile = toml::from_str(&content)
        .map_err(|e| Error::InvalidConfig(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Save configuration to the default location
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

/// Save configuration to an explicit path
pub fn save_config_to(config: &ConfigFile, config_path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

    // Set secure permissions on config file (read/write for owner only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(config_path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(config_path, perms)?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    for (field, url) in [
        ("base_url", &config.graph.base_url),
        ("preview_base_url", &config.graph.preview_base_url),
    ] {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(Error::InvalidInput(format!(
                "{} must be an http(s) URL, got {:?}",
                field, url
            )));
        }
    }

    if config.graph.token_audience.is_empty() {
        return Err(Error::InvalidInput(
            "token_audience cannot be empty".to_string(),
        ));
    }

    if let Some(upload) = &config.upload {
        if upload.default_content_type.is_empty() {
            return Err(Error::InvalidInput(
                "default_content_type cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Check if configuration exists
pub fn config_exists() -> bool {
    get_config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Public alias for ConfigFile (used by lib.rs)
pub use ConfigFile as Config;
