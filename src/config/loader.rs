use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::types::GlobalConfig;

const CONFIG_FILE_NAME: &str = "cyberscan.toml";

const DEFAULT_CONFIG_PATHS: &[&str] = &["./cyberscan.toml", "./config/cyberscan.toml"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an explicit path or the search list, falling
    /// back to defaults.
    pub fn load_with_custom_path(custom_path: Option<&Path>) -> Result<GlobalConfig> {
        if let Some(path) = custom_path {
            if path.exists() {
                return Self::load_from_file(path)
                    .with_context(|| format!("Failed to load config from custom path: {:?}", path));
            }
            tracing::warn!("Custom config path does not exist: {:?}, falling back to defaults", path);
        }

        for path in Self::candidate_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from: {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                        continue;
                    }
                }
            }
        }

        tracing::info!("No configuration file found, using default settings");
        Ok(GlobalConfig::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect();
        if let Some(dirs) = ProjectDirs::from("", "", "cyberscan") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load configuration from a specific file
    fn load_from_file(path: &Path) -> Result<GlobalConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: GlobalConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {:?}", path))?;

        Self::validate_config(&config)?;

        Ok(config)
    }

    fn validate_config(config: &GlobalConfig) -> Result<()> {
        if config.gemini.model.trim().is_empty() {
            anyhow::bail!("gemini.model cannot be empty");
        }

        if config.gemini.base_url.trim().is_empty() {
            anyhow::bail!("gemini.base_url cannot be empty");
        }

        if config.gemini.api_key_env.trim().is_empty() {
            anyhow::bail!("gemini.api_key_env cannot be empty");
        }

        if config.retry.initial_backoff_ms == 0 {
            anyhow::bail!("retry.initial_backoff_ms must be greater than 0");
        }

        Ok(())
    }
}
