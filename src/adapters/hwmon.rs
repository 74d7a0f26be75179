//! hwmon fan controller adapter.
//!
//! Finds the hwmon chip whose `name` matches the configured chip and
//! exposes its `pwm1` and `fan1_fault` attributes through [`FanPort`].
//!
//! ```text
//!  /sys/class/hwmon/hwmonN/
//!     name         axi_fan_control
//!     pwm1         0..=255
//!     fan1_fault   0 | 1
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::utils::{device_name, list_prefixed, read_attr, write_attr};
use crate::app::ports::FanPort;
use crate::control::bands::Pwm;
use crate::error::{Error, ReadError, WriteError};
use crate::sensors::reading::parse_reading;

const PWM_ATTR: &str = "pwm1";
const FAULT_ATTR: &str = "fan1_fault";

/// The matched hwmon chip.
#[derive(Debug, Clone)]
pub struct HwmonFan {
    dir: PathBuf,
}

/// Scan `root` for an `hwmon*` entry named `chip`.
///
/// `Ok(None)` means the root was readable but no chip matched; the caller
/// treats that as "nothing to control".  An unreadable root is an error.
pub fn discover(root: &Path, chip: &str) -> Result<Option<HwmonFan>, Error> {
    let entries =
        list_prefixed(root, "hwmon").map_err(|_| Error::Init("cannot read hwmon class directory"))?;

    for dir in entries {
        let name = device_name(&dir);
        debug!("hwmon {} name={:?}", dir.display(), name);
        if name.as_deref() == Some(chip) {
            info!("Found hwmon chip {} at {}", chip, dir.display());
            return Ok(Some(HwmonFan { dir }));
        }
    }

    Ok(None)
}

impl HwmonFan {
    fn read_int(&self, attr: &str) -> Result<i64, ReadError> {
        parse_reading(&read_attr(&self.dir.join(attr))?)
    }
}

impl FanPort for HwmonFan {
    fn read_fault(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_int(FAULT_ATTR)? != 0)
    }

    fn read_pwm(&mut self) -> Result<Pwm, ReadError> {
        let raw = self.read_int(PWM_ATTR)?;
        u8::try_from(raw).map(Pwm).map_err(|_| ReadError::Parse)
    }

    fn write_pwm(&mut self, pwm: Pwm) -> Result<(), WriteError> {
        write_attr(&self.dir.join(PWM_ATTR), &pwm.raw().to_string())
    }
}
