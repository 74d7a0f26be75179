//! fancontrold library.
//!
//! Exposes the control logic and the sysfs adapters for the daemon binary
//! and for integration testing against mock hardware.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod control;
pub mod error;
pub mod safety;
pub mod sensors;
pub mod shutdown;

/// `log` target of records that must reach every console.
pub const EMERGENCY_TARGET: &str = "emergency";
