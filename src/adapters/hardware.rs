//! Hardware adapter: bridges the board to the domain port traits.
//!
//! Owns the IIO registry, the hwmon fan and the power switch, exposing
//! them through [`DeviceRegistry`], [`FanPort`] and [`PowerPort`] at
//! once so the control loop can borrow a single `&mut` for a cycle.

use crate::app::ports::{DeviceRegistry, FanPort, PowerPort};
use crate::control::bands::Pwm;
use crate::error::{ReadError, Result, WriteError};

use super::hwmon::HwmonFan;
use super::iio::{IioChannel, IioDevice, IioRegistry};
use super::power::SystemPower;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P = SystemPower> {
    iio: IioRegistry,
    fan: HwmonFan,
    power: P,
}

impl<P: PowerPort> HardwareAdapter<P> {
    pub fn new(iio: IioRegistry, fan: HwmonFan, power: P) -> Self {
        Self { iio, fan, power }
    }
}

// ── DeviceRegistry implementation ─────────────────────────────

impl<P> DeviceRegistry for HardwareAdapter<P> {
    type Device = IioDevice;
    type Channel = IioChannel;

    fn find_device(&self, name: &str) -> Option<IioDevice> {
        self.iio.find_device(name)
    }

    fn find_channel(&self, device: &IioDevice, name: &str) -> Option<IioChannel> {
        self.iio.find_channel(device, name)
    }

    fn channel_has_attribute(&self, channel: &IioChannel, attr: &str) -> bool {
        self.iio.channel_has_attribute(channel, attr)
    }

    fn read_channel_attribute(
        &self,
        channel: &IioChannel,
        attr: &str,
    ) -> core::result::Result<String, ReadError> {
        self.iio.read_channel_attribute(channel, attr)
    }

    fn write_device_attribute(
        &mut self,
        device: &IioDevice,
        attr: &str,
        value: &str,
    ) -> core::result::Result<(), WriteError> {
        self.iio.write_device_attribute(device, attr, value)
    }

    fn write_register(
        &mut self,
        device: &IioDevice,
        address: u32,
        value: u32,
    ) -> core::result::Result<(), WriteError> {
        self.iio.write_register(device, address, value)
    }
}

// ── FanPort implementation ────────────────────────────────────

impl<P> FanPort for HardwareAdapter<P> {
    fn read_fault(&mut self) -> core::result::Result<bool, ReadError> {
        self.fan.read_fault()
    }

    fn read_pwm(&mut self) -> core::result::Result<Pwm, ReadError> {
        self.fan.read_pwm()
    }

    fn write_pwm(&mut self, pwm: Pwm) -> core::result::Result<(), WriteError> {
        self.fan.write_pwm(pwm)
    }
}

// ── PowerPort implementation ──────────────────────────────────

impl<P: PowerPort> PowerPort for HardwareAdapter<P> {
    fn power_off(&mut self) -> Result<()> {
        self.power.power_off()
    }
}
