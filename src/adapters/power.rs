//! Platform power-off.
//!
//! Flushes filesystem buffers and asks the kernel to power the board
//! down.  Requires `CAP_SYS_BOOT`; on success the call never returns.

use crate::app::ports::PowerPort;
use crate::error::{Error, Result};

/// Powers the board off through `reboot(2)`.
#[derive(Debug, Default)]
pub struct SystemPower;

impl SystemPower {
    pub fn new() -> Self {
        Self
    }
}

impl PowerPort for SystemPower {
    fn power_off(&mut self) -> Result<()> {
        // SAFETY: sync and reboot take no pointers; reboot either does not
        // return or fails with errno set.
        let ret = unsafe {
            libc::sync();
            libc::reboot(libc::RB_POWER_OFF)
        };

        if ret == 0 {
            return Ok(());
        }

        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Err(Error::PowerOff(errno))
    }
}
