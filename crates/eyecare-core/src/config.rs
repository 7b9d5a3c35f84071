use anyhow::{bail, Context, Result};
use eyecare_common::config::{GeneralConfig, StorageConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "eyecare";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { general: GeneralConfig::default(), storage: default_storage() }
    }
}

/// SQLite file under the user's data directory.
fn default_storage() -> StorageConfig {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join(APP_DIR);

    StorageConfig {
        path: data_dir.join("eyecare.db").to_string_lossy().to_string(),
        in_memory: false,
    }
}

impl AppConfig {
    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(APP_DIR)
            .join("eyecare.toml")
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading configuration from {:?}", config_path);

        if !config_path.exists() {
            info!(
                "Configuration file not found at {:?}, creating default configuration",
                config_path
            );
            let default_config = Self::default();
            default_config.save_to_path(config_path)?;
            return Ok(default_config);
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let mut config: AppConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        config.resolve_data_dir();

        info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default file path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        debug!("Saving configuration to {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// Relative storage paths are placed under `general.data_dir` when one is set.
    fn resolve_data_dir(&mut self) {
        let Some(data_dir) = &self.general.data_dir else {
            return;
        };

        if Path::new(&self.storage.path).is_relative() {
            let resolved = Path::new(data_dir).join(&self.storage.path);
            self.storage.path = resolved.to_string_lossy().to_string();
        }
    }

    /// Validate the configuration settings
    pub fn validate(&self) -> Result<()> {
        // Same directive syntax as RUST_LOG, e.g. "info" or "eyecare_core=debug,warn"
        EnvFilter::try_new(&self.general.log_level)
            .with_context(|| format!("Invalid log level: {}", self.general.log_level))?;

        if self.storage.in_memory {
            warn!("In-memory storage configured - data will not survive a restart");
            return Ok(());
        }

        if self.storage.path.trim().is_empty() {
            bail!("Storage path must not be empty");
        }

        if let Some(parent) = Path::new(&self.storage.path).parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create storage directory: {:?}", parent))?;
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}
