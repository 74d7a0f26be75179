//! Daemon configuration parameters
//!
//! All tunable parameters for the fan control daemon.
//! Values come from the built-in defaults, an optional JSON file, and
//! finally the command line (highest precedence).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// hwmon chip driven when no name is given on the command line.
pub const DEFAULT_CHIP_NAME: &str = "axi_fan_control";

/// Configuration file read when `--config` is not given; may be absent.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fancontrold.json";

/// Core daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Target ---
    /// `name` attribute of the hwmon chip that owns `pwm1` / `fan1_fault`
    pub chip_name: String,

    // --- Timing ---
    /// Seconds between control cycles
    pub poll_interval_secs: u32,

    // --- Safety ---
    /// Consecutive faulty fan reads tolerated before shutdown; the next one triggers it
    pub fault_threshold: u32,

    // --- Logging ---
    /// Emit debug-level records
    pub verbose: bool,

    // --- Filesystem roots ---
    /// Directory holding the `hwmonN` links
    pub hwmon_root: String,
    /// Directory holding the `iio:deviceN` links
    pub iio_root: String,
    /// debugfs directory exposing `direct_reg_access` per IIO device
    pub iio_debug_root: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            chip_name: DEFAULT_CHIP_NAME.to_string(),

            poll_interval_secs: 1,

            // Five faulty reads in a row are tolerated; the sixth powers off.
            fault_threshold: 5,

            verbose: false,

            hwmon_root: "/sys/class/hwmon".to_string(),
            iio_root: "/sys/bus/iio/devices".to_string(),
            iio_debug_root: "/sys/kernel/debug/iio".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_secs must be at least 1",
            ));
        }
        if self.fault_threshold == 0 {
            return Err(ConfigError::ValidationFailed(
                "fault_threshold must be at least 1",
            ));
        }
        if self.chip_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("chip_name must not be empty"));
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_secs))
    }

    /// Parse and validate a JSON document.  Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}
