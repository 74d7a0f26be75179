//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`].  A missing file yields the defaults when it
//! is optional and [`ConfigError::NotFound`] when it was asked for.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
    required: bool,
}

impl JsonConfigFile {
    /// A file that must exist.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    /// A file that may be absent.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.required {
                    return Err(ConfigError::NotFound);
                }
                return Ok(MonitorConfig::default());
            }
            Err(_) => return Err(ConfigError::IoError),
        };

        let config = MonitorConfig::from_json(&text)?;
        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }
}
