//! Unified error types for the fan control daemon.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be logged, stored in events and compared in tests without allocation.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the daemon funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sysfs attribute or IIO channel could not be read or parsed.
    Read(ReadError),
    /// An attribute or register write failed.
    Write(WriteError),
    /// The suspension between poll cycles failed.
    Wait(WaitError),
    /// The platform refused to power off (carries the OS errno).
    PowerOff(i32),
    /// Startup discovery or binding failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read: {e}"),
            Self::Write(e) => write!(f, "write: {e}"),
            Self::Wait(e) => write!(f, "wait: {e}"),
            Self::PowerOff(errno) => write!(f, "power-off refused (errno {errno})"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The attribute file could not be opened or read.
    Io(io::ErrorKind),
    /// The attribute was read but held no data.
    Empty,
    /// The text did not start with a decimal integer, or it overflowed.
    Parse,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error ({kind})"),
            Self::Empty => write!(f, "attribute is empty"),
            Self::Parse => write!(f, "no integer found"),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl From<ReadError> for Error {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

// ---------------------------------------------------------------------------
// Write errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// The attribute or register file could not be opened or written.
    Io(io::ErrorKind),
    /// The device does not expose the requested attribute or register access.
    Unsupported,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error ({kind})"),
            Self::Unsupported => write!(f, "not supported by device"),
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl From<WriteError> for Error {
    fn from(e: WriteError) -> Self {
        Self::Write(e)
    }
}

// ---------------------------------------------------------------------------
// Wait errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The requested period is zero or cannot be represented by the timer.
    InvalidPeriod,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeriod => write!(f, "invalid period"),
        }
    }
}

impl From<WaitError> for Error {
    fn from(e: WaitError) -> Self {
        Self::Wait(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
