//! Application core: the control loop and its ports.
//!
//! This module holds the per-cycle rules of the daemon: fan fault
//! supervision, temperature sampling and duty selection.  All interaction
//! with the board happens through **port traits** defined in [`ports`],
//! keeping this layer testable without sysfs.

pub mod events;
pub mod ports;
pub mod service;
