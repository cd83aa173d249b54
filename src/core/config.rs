use crate::core::color::ContrastPalette;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Where a reference document comes from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DataSource {
    File { path: PathBuf },
    Remote { url: String },
}

impl DataSource {
    pub fn location(&self) -> String {
        match self {
            DataSource::File { path } => path.display().to_string(),
            DataSource::Remote { url } => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    pub funds: DataSource,
    pub amc: DataSource,
    #[serde(default)]
    pub overrides: Option<DataSource>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contrast: ContrastPalette,
    #[serde(default)]
    pub cache: CacheConfig,
    pub data_path: Option<String>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("in", "amcolor", "amcolor").context("Could not determine project directories")
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Directory for the persistent download cache.
    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
