//! IIO device registry over sysfs and debugfs.
//!
//! ```text
//!  /sys/bus/iio/devices/iio:deviceN/
//!     name                 adrv9009-phy
//!     ensm_mode            device attribute
//!     in_temp0_input       channel temp0, attribute input
//!
//!  /sys/kernel/debug/iio/iio:deviceN/
//!     direct_reg_access    "0x<addr> 0x<val>"
//! ```
//!
//! A channel `tempN` exists when any `in_tempN_*` file does.  Devices are
//! matched by their `name` attribute, first match wins.

use std::fs;
use std::path::PathBuf;

use log::debug;

use super::utils::{device_name, list_prefixed, read_attr, write_attr};
use crate::app::ports::DeviceRegistry;
use crate::error::{ReadError, WriteError};

const DEVICE_PREFIX: &str = "iio:device";
const REG_ACCESS: &str = "direct_reg_access";

/// A resolved IIO device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IioDevice {
    dir: PathBuf,
    /// Directory name (`iio:deviceN`), also used under debugfs.
    id: String,
}

impl IioDevice {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A resolved input channel; attributes are files `<prefix>_<attr>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IioChannel {
    dir: PathBuf,
    prefix: String,
}

impl IioChannel {
    fn attr_path(&self, attr: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", self.prefix, attr))
    }
}

/// Registry rooted at the IIO bus directory and the IIO debugfs directory.
#[derive(Debug, Clone)]
pub struct IioRegistry {
    root: PathBuf,
    debug_root: PathBuf,
}

impl IioRegistry {
    pub fn new(root: impl Into<PathBuf>, debug_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debug_root: debug_root.into(),
        }
    }
}

impl DeviceRegistry for IioRegistry {
    type Device = IioDevice;
    type Channel = IioChannel;

    fn find_device(&self, name: &str) -> Option<IioDevice> {
        let entries = match list_prefixed(&self.root, DEVICE_PREFIX) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", self.root.display(), e);
                return None;
            }
        };

        entries.into_iter().find_map(|dir| {
            if device_name(&dir).as_deref() != Some(name) {
                return None;
            }
            let id = dir.file_name()?.to_string_lossy().into_owned();
            Some(IioDevice { dir, id })
        })
    }

    fn find_channel(&self, device: &IioDevice, name: &str) -> Option<IioChannel> {
        let prefix = format!("in_{name}");
        let marker = format!("{prefix}_");
        let present = fs::read_dir(&device.dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.file_name().to_string_lossy().starts_with(&marker));

        present.then(|| IioChannel {
            dir: device.dir.clone(),
            prefix,
        })
    }

    fn channel_has_attribute(&self, channel: &IioChannel, attr: &str) -> bool {
        channel.attr_path(attr).is_file()
    }

    fn read_channel_attribute(&self, channel: &IioChannel, attr: &str) -> Result<String, ReadError> {
        read_attr(&channel.attr_path(attr))
    }

    fn write_device_attribute(
        &mut self,
        device: &IioDevice,
        attr: &str,
        value: &str,
    ) -> Result<(), WriteError> {
        write_attr(&device.dir.join(attr), value)
    }

    fn write_register(&mut self, device: &IioDevice, address: u32, value: u32) -> Result<(), WriteError> {
        let path = self.debug_root.join(&device.id).join(REG_ACCESS);
        if !path.exists() {
            return Err(WriteError::Unsupported);
        }
        write_attr(&path, &format!("0x{address:x} 0x{value:x}"))
    }
}
