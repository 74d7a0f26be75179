//! Port traits: the hexagonal boundary between the control logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (IIO registry, hwmon fan, power control, timer, event
//! sinks, config files) implement these traits.  The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the domain core never touches sysfs directly.

use core::time::Duration;

use crate::config::MonitorConfig;
use crate::control::bands::Pwm;
use crate::error::{ReadError, Result, WaitError, WriteError};

// ───────────────────────────────────────────────────────────────
// Device registry (IIO devices: temperature sources, shutdown targets)
// ───────────────────────────────────────────────────────────────

/// Lookup and attribute access for the devices the daemon monitors or
/// disables.  Handles are opaque to the domain; adapters decide what they
/// carry (sysfs paths on the board, names in tests).
pub trait DeviceRegistry {
    /// Handle to one device.
    type Device;
    /// Handle to one channel of a device.
    type Channel;

    /// Resolve a device by its `name` attribute.
    fn find_device(&self, name: &str) -> Option<Self::Device>;

    /// Resolve a channel (e.g. `temp0`) of `device`.
    fn find_channel(&self, device: &Self::Device, name: &str) -> Option<Self::Channel>;

    /// Whether `channel` exposes attribute `attr`.
    fn channel_has_attribute(&self, channel: &Self::Channel, attr: &str) -> bool;

    /// Read the raw text of a channel attribute.
    fn read_channel_attribute(
        &self,
        channel: &Self::Channel,
        attr: &str,
    ) -> core::result::Result<String, ReadError>;

    /// Write `value` to a device-level attribute.
    fn write_device_attribute(
        &mut self,
        device: &Self::Device,
        attr: &str,
        value: &str,
    ) -> core::result::Result<(), WriteError>;

    /// Write `value` to register `address` through the debug interface.
    fn write_register(
        &mut self,
        device: &Self::Device,
        address: u32,
        value: u32,
    ) -> core::result::Result<(), WriteError>;
}

// ───────────────────────────────────────────────────────────────
// Fan port (hwmon chip: actuation target)
// ───────────────────────────────────────────────────────────────

/// The hwmon chip that drives the fan and reports its health.
pub trait FanPort {
    /// `fan1_fault`: `true` when the chip reports the fan as failed.
    fn read_fault(&mut self) -> core::result::Result<bool, ReadError>;

    /// `pwm1`: the duty currently programmed into the chip.
    fn read_pwm(&mut self) -> core::result::Result<Pwm, ReadError>;

    /// `pwm1`: program a new duty.
    fn write_pwm(&mut self, pwm: Pwm) -> core::result::Result<(), WriteError>;
}

// ───────────────────────────────────────────────────────────────
// Power port
// ───────────────────────────────────────────────────────────────

/// Irreversible platform power-off.
pub trait PowerPort {
    /// Power the platform off.  Only returns on the board if the kernel
    /// refused the request.
    fn power_off(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Wait port (the single suspension point of the control loop)
// ───────────────────────────────────────────────────────────────

/// Suspends the control loop between cycles.  The loop races this future
/// against the stop signal, so implementations need not watch for
/// cancellation themselves.
#[allow(async_fn_in_trait)]
pub trait WaitPort {
    async fn wait(&mut self, period: Duration) -> core::result::Result<(), WaitError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads daemon configuration.
///
/// Implementations MUST validate before returning; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`MonitorConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> core::result::Result<MonitorConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The named config file does not exist.
    NotFound,
    /// The stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error while reading the config.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
