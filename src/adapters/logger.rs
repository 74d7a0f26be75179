//! syslog backend for the `log` facade.
//!
//! Records are formatted into a fixed buffer and handed to `syslog(3)`
//! under facility `LOG_DAEMON`.  Overlong messages are truncated.  Records
//! logged with target `emergency` are raised to `LOG_EMERG` so they reach
//! every console on the way down.

use core::ffi::{CStr, c_int};
use core::fmt::Write;

use heapless::String;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub use crate::EMERGENCY_TARGET;
use crate::error::Error;

const IDENT: &CStr = c"fancontrold";

/// Longest message passed to syslog, excluding the terminating NUL.
const LINE_LEN: usize = 255;

pub struct SyslogLogger;

static LOGGER: SyslogLogger = SyslogLogger;

/// Open the syslog connection and install the logger.
///
/// `verbose` lowers the level to Debug and copies records to stderr.
pub fn init(verbose: bool) -> Result<(), Error> {
    let mut options = libc::LOG_PID;
    if verbose {
        options |= libc::LOG_PERROR;
    }
    // SAFETY: IDENT is a 'static NUL-terminated string, as openlog requires.
    unsafe { libc::openlog(IDENT.as_ptr(), options, libc::LOG_DAEMON) };

    log::set_logger(&LOGGER).map_err(|_| Error::Init("logger already installed"))?;
    log::set_max_level(level_filter(verbose));
    Ok(())
}

pub fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// syslog priority for a record.
pub fn priority(level: Level, target: &str) -> c_int {
    if target == EMERGENCY_TARGET {
        return libc::LOG_EMERG;
    }
    match level {
        Level::Error => libc::LOG_ERR,
        Level::Warn => libc::LOG_WARNING,
        Level::Info => libc::LOG_INFO,
        Level::Debug | Level::Trace => libc::LOG_DEBUG,
    }
}

/// Fixed-size line that keeps whatever fits and drops the rest.
struct Line(String<LINE_LEN>);

impl Write for Line {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render `record` as a NUL-terminated line.
fn render(record: &Record) -> [u8; LINE_LEN + 1] {
    let mut line = Line(String::new());
    let _ = write!(line, "{}", record.args());
    let line = line.0;

    let mut out = [0u8; LINE_LEN + 1];
    for (dst, src) in out.iter_mut().zip(line.as_bytes()) {
        *dst = if *src == 0 { b'?' } else { *src };
    }
    out
}

impl Log for SyslogLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = render(record);
        let priority = priority(record.level(), record.target());
        // SAFETY: the format is a literal "%s" and `line` is NUL-terminated.
        unsafe { libc::syslog(priority, c"%s".as_ptr(), line.as_ptr()) };
    }

    fn flush(&self) {}
}
