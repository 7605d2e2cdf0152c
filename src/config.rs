use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{batch::DEFAULT_BATCH_SIZE, canvas::DISPLAY_SCALE};

pub const MAX_BATCH_SIZE: usize = 1024;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_display_scale() -> u32 {
    DISPLAY_SCALE
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("gardens")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A garden preset: how many flowers per batch, where to put them and how to
/// serve them.
#[derive(Debug, Clone, Deserialize)]
pub struct GardenConfig {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_display_scale")]
    pub display_scale: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub web: WebSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GardenConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: GardenConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "garden name must not be empty");
        ensure!(
            (1..=MAX_BATCH_SIZE).contains(&self.batch_size),
            "batch_size must be within 1..={MAX_BATCH_SIZE}, got {}",
            self.batch_size
        );
        ensure!(
            (1..=16).contains(&self.display_scale),
            "display_scale must be within 1..=16, got {}",
            self.display_scale
        );
        Ok(())
    }
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            name: "meadow".to_string(),
            description: None,
            seed: 42,
            batch_size: default_batch_size(),
            display_scale: default_display_scale(),
            output_dir: default_output_dir(),
            web: WebSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

pub struct GardenLoader {
    base_dir: PathBuf,
}

impl GardenLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GardenConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read garden preset {}", path.display()))?;
        GardenConfig::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_keys_fall_back_to_defaults() {
        let config = GardenConfig::from_yaml("name: tiny\nseed: 3\n").unwrap();
        assert_eq!(config.batch_size, 12);
        assert_eq!(config.display_scale, 4);
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output_dir, PathBuf::from("gardens"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = GardenConfig::from_yaml("name: tiny\nseed: 3\nbatch_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let err = GardenConfig::from_yaml("name: tiny\nseed: 3\nbatch_size: 1000000000\n")
            .unwrap_err();
        assert!(err.to_string().contains("batch_size must be within 1..=1024"));

        let mut config = GardenConfig::default();
        config.batch_size = MAX_BATCH_SIZE;
        assert!(config.validate().is_ok());
        config.batch_size = MAX_BATCH_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let loader = GardenLoader::new(std::env::temp_dir());
        let err = loader.load("no_such_garden.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("no_such_garden.yaml"));
    }
}
