//! Emergency shutdown sequencer.
//!
//! When the fan has failed for good, the RF front-ends are switched off in
//! a fixed order before the board is powered down.  Each step is
//! best-effort: a missing device or a rejected write is reported to the
//! caller and the sequence moves on.  Power-off is requested after the last step no
//! matter how the individual steps went.
//!
//! ```text
//!  adrv9009-phy   ensm_mode <- radio_off
//!  adrv9009-phy-b ensm_mode <- radio_off
//!  hmc7044        reg 0x0   <- 1          (sleep)
//!  ──────────────────────────────────────
//!  power off
//! ```

use core::fmt;

use log::error;

use crate::app::ports::{DeviceRegistry, PowerPort};
use crate::EMERGENCY_TARGET;
use crate::error::WriteError;

/// HMC7044 global sleep control.
pub const HMC7044_SLEEP_REG: u32 = 0x0;
pub const HMC7044_SLEEP_VAL: u32 = 1;

/// One device to disable.  Each variant carries only what its write
/// mechanism needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownAction {
    /// Write `value` to the device attribute `attribute`.
    Attribute {
        device: &'static str,
        attribute: &'static str,
        value: &'static str,
    },
    /// Write `value` to register `address` via direct register access.
    Register {
        device: &'static str,
        address: u32,
        value: u32,
    },
}

impl ShutdownAction {
    pub const fn device(&self) -> &'static str {
        match self {
            Self::Attribute { device, .. } | Self::Register { device, .. } => device,
        }
    }

    /// Perform the write on an already-resolved device.
    pub fn apply<R: DeviceRegistry>(
        &self,
        registry: &mut R,
        device: &R::Device,
    ) -> Result<(), WriteError> {
        match *self {
            Self::Attribute {
                attribute, value, ..
            } => registry.write_device_attribute(device, attribute, value),
            Self::Register { address, value, .. } => {
                registry.write_register(device, address, value)
            }
        }
    }
}

impl fmt::Display for ShutdownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute {
                device,
                attribute,
                value,
            } => write!(f, "{device}: {attribute} <- {value}"),
            Self::Register {
                device,
                address,
                value,
            } => write!(f, "{device}: reg {address:#x} <- {value:#x}"),
        }
    }
}

/// Devices disabled before power-off, in order.
pub const SHUTDOWN_SEQUENCE: [ShutdownAction; 3] = [
    ShutdownAction::Attribute {
        device: "adrv9009-phy",
        attribute: "ensm_mode",
        value: "radio_off",
    },
    ShutdownAction::Attribute {
        device: "adrv9009-phy-b",
        attribute: "ensm_mode",
        value: "radio_off",
    },
    ShutdownAction::Register {
        device: "hmc7044",
        address: HMC7044_SLEEP_REG,
        value: HMC7044_SLEEP_VAL,
    },
];

/// Outcome of a single step, reported to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Disabled,
    DeviceMissing,
    WriteFailed(WriteError),
}

/// Run every action in `sequence`, then power off.
///
/// Never fails and never stops early.  `on_step` is told how each action
/// went.  If the kernel refuses the power-off request the error is logged
/// and the function returns; the caller is expected to exit.
pub fn execute<H>(
    sequence: &[ShutdownAction],
    hw: &mut H,
    mut on_step: impl FnMut(&ShutdownAction, StepOutcome),
) where
    H: DeviceRegistry + PowerPort,
{
    for action in sequence {
        let outcome = match hw.find_device(action.device()) {
            None => StepOutcome::DeviceMissing,
            Some(device) => match action.apply(hw, &device) {
                Ok(()) => StepOutcome::Disabled,
                Err(e) => StepOutcome::WriteFailed(e),
            },
        };
        on_step(action, outcome);
    }

    error!(target: EMERGENCY_TARGET, "Powering off now");
    if let Err(e) = hw.power_off() {
        error!(target: EMERGENCY_TARGET, "Power-off failed: {e}");
    }
}
