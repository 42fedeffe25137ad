use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub removal: ServiceConfig,
    pub compare: ServiceConfig,
    pub storage: StorageConfig,
    pub processing: ProcessingConfig,
}

/// Listen address for one of the two services. Each service runs as its own
/// process on its own port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Upper bound on the comparison upload body, in bytes.
    pub max_upload_bytes: usize,
    /// JPEG quality used when recompressing for the size comparison.
    pub jpeg_quality: u8,
    /// Squared RGB distance below which a pixel counts as background.
    pub matte_threshold: u32,
    /// Width of the border ring sampled for the background estimate.
    pub matte_border_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            removal: ServiceConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            compare: ServiceConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            storage: StorageConfig {
                output_path: PathBuf::from("./uploads/remove"),
            },
            processing: ProcessingConfig {
                max_upload_bytes: 10 * 1024 * 1024,
                jpeg_quality: 50,
                matte_threshold: 2700,
                matte_border_width: 2,
            },
        }
    }
}

impl Config {
    /// Load configuration from the file named by `CONFIG_FILE` (default
    /// `config.toml`). When the file does not exist, a default configuration
    /// is written there so a first run leaves an editable file behind.
    pub fn load() -> Result<Self, AppError> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            Self::from_file(&config_file)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }

    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
