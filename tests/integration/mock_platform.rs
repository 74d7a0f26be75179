//! Mock board for integration tests.
//!
//! Scripts temperatures and fan-fault reads cycle by cycle and records
//! every write so tests can assert on the full command history without
//! touching sysfs.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::ErrorKind;
use std::time::Duration;

use fancontrold::app::events::AppEvent;
use fancontrold::app::ports::{DeviceRegistry, EventSink, FanPort, PowerPort, WaitPort};
use fancontrold::app::service::StopSignal;
use fancontrold::control::bands::Pwm;
use fancontrold::error::{ReadError, Result, WaitError, WriteError};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Pwm(u8),
    Attribute {
        device: String,
        attribute: String,
        value: String,
    },
    Register {
        device: String,
        address: u32,
        value: u32,
    },
    PowerOff,
}

/// A value sequence; the last entry repeats once the rest is consumed.
struct Script<T: Clone>(VecDeque<T>);

impl<T: Clone> Script<T> {
    fn next(&mut self) -> Option<T> {
        if self.0.len() > 1 {
            self.0.pop_front()
        } else {
            self.0.front().cloned()
        }
    }
}

// ── MockPlatform ──────────────────────────────────────────────

pub struct MockPlatform {
    devices: Vec<&'static str>,
    temps: HashMap<&'static str, RefCell<Script<core::result::Result<String, ReadError>>>>,
    faults: Script<core::result::Result<bool, ReadError>>,
    failing_devices: Vec<&'static str>,
    pub reject_pwm: bool,
    pub calls: Vec<Call>,
}

#[allow(dead_code)]
impl MockPlatform {
    /// Both transceivers and the clock chip present, fan healthy.
    pub fn board() -> Self {
        Self {
            devices: vec!["adrv9009-phy", "adrv9009-phy-b", "hmc7044"],
            temps: HashMap::new(),
            faults: Script(VecDeque::from([Ok(false)])),
            failing_devices: Vec::new(),
            reject_pwm: false,
            calls: Vec::new(),
        }
    }

    /// Give `device`'s `temp0` channel a reading per cycle.
    pub fn temps(mut self, device: &'static str, values: &[i64]) -> Self {
        let script = values.iter().map(|t| Ok(format!("{t}\n"))).collect();
        self.temps.insert(device, RefCell::new(Script(script)));
        self
    }

    /// Give `device`'s `temp0` channel raw results per cycle.
    pub fn raw_temps(
        mut self,
        device: &'static str,
        values: Vec<core::result::Result<&str, ReadError>>,
    ) -> Self {
        let script = values.into_iter().map(|v| v.map(str::to_string)).collect();
        self.temps.insert(device, RefCell::new(Script(script)));
        self
    }

    /// Fault indicator per cycle.
    pub fn faults(mut self, values: &[bool]) -> Self {
        self.faults = Script(values.iter().map(|f| Ok(*f)).collect());
        self
    }

    pub fn fault_reads(mut self, values: Vec<core::result::Result<bool, ReadError>>) -> Self {
        self.faults = Script(values.into());
        self
    }

    pub fn without(mut self, device: &'static str) -> Self {
        self.devices.retain(|d| *d != device);
        self
    }

    pub fn failing(mut self, device: &'static str) -> Self {
        self.failing_devices.push(device);
        self
    }

    pub fn pwm_writes(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Pwm(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn powered_off(&self) -> bool {
        self.calls.contains(&Call::PowerOff)
    }

    /// Shutdown writes, in order, as `device` names.
    pub fn shutdown_devices(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Attribute { device, .. } | Call::Register { device, .. } => {
                    Some(device.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl DeviceRegistry for MockPlatform {
    type Device = &'static str;
    type Channel = &'static str;

    fn find_device(&self, name: &str) -> Option<&'static str> {
        self.devices.iter().copied().find(|d| *d == name)
    }

    fn find_channel(&self, device: &&'static str, name: &str) -> Option<&'static str> {
        (name == "temp0" && self.temps.contains_key(device)).then_some(*device)
    }

    fn channel_has_attribute(&self, _: &&'static str, attr: &str) -> bool {
        attr == "input"
    }

    fn read_channel_attribute(
        &self,
        channel: &&'static str,
        _: &str,
    ) -> core::result::Result<String, ReadError> {
        self.temps[channel]
            .borrow_mut()
            .next()
            .unwrap_or(Err(ReadError::Empty))
    }

    fn write_device_attribute(
        &mut self,
        device: &&'static str,
        attr: &str,
        value: &str,
    ) -> core::result::Result<(), WriteError> {
        self.calls.push(Call::Attribute {
            device: device.to_string(),
            attribute: attr.to_string(),
            value: value.to_string(),
        });
        if self.failing_devices.contains(device) {
            return Err(WriteError::Io(ErrorKind::PermissionDenied));
        }
        Ok(())
    }

    fn write_register(
        &mut self,
        device: &&'static str,
        address: u32,
        value: u32,
    ) -> core::result::Result<(), WriteError> {
        self.calls.push(Call::Register {
            device: device.to_string(),
            address,
            value,
        });
        if self.failing_devices.contains(device) {
            return Err(WriteError::Unsupported);
        }
        Ok(())
    }
}

impl FanPort for MockPlatform {
    fn read_fault(&mut self) -> core::result::Result<bool, ReadError> {
        self.faults.next().unwrap_or(Ok(false))
    }

    fn read_pwm(&mut self) -> core::result::Result<Pwm, ReadError> {
        Ok(Pwm(self.pwm_writes().last().copied().unwrap_or(0)))
    }

    fn write_pwm(&mut self, pwm: Pwm) -> core::result::Result<(), WriteError> {
        if self.reject_pwm {
            return Err(WriteError::Io(ErrorKind::PermissionDenied));
        }
        self.calls.push(Call::Pwm(pwm.raw()));
        Ok(())
    }
}

impl PowerPort for MockPlatform {
    fn power_off(&mut self) -> Result<()> {
        self.calls.push(Call::PowerOff);
        Ok(())
    }
}

// ── Timer ─────────────────────────────────────────────────────

/// What the timer does on a given wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStep {
    /// Return immediately.
    Elapse,
    /// Raise the stop signal and never finish.
    StopDuring,
    /// Raise the stop signal, then finish normally.
    StopAtEnd,
    /// Fail.
    Fail,
}

/// Timer that returns instantly and follows a per-wait script.
pub struct ScriptedTimer<'a> {
    stop: &'a StopSignal,
    plan: HashMap<usize, WaitStep>,
    pub waits: usize,
    pub periods: Vec<Duration>,
}

#[allow(dead_code)]
impl<'a> ScriptedTimer<'a> {
    pub fn new(stop: &'a StopSignal) -> Self {
        Self {
            stop,
            plan: HashMap::new(),
            waits: 0,
            periods: Vec::new(),
        }
    }

    /// Do `step` on the `n`th wait (1-based).
    pub fn on_wait(mut self, n: usize, step: WaitStep) -> Self {
        self.plan.insert(n, step);
        self
    }
}

impl WaitPort for ScriptedTimer<'_> {
    async fn wait(&mut self, period: Duration) -> core::result::Result<(), WaitError> {
        self.waits += 1;
        self.periods.push(period);
        match self.plan.get(&self.waits).copied().unwrap_or(WaitStep::Elapse) {
            WaitStep::Elapse => Ok(()),
            WaitStep::StopAtEnd => {
                self.stop.signal(());
                Ok(())
            }
            WaitStep::StopDuring => {
                self.stop.signal(());
                futures_lite::future::pending().await
            }
            WaitStep::Fail => Err(WaitError::InvalidPeriod),
        }
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
