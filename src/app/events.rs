//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  The production
//! adapter writes them to syslog; tests record them.

use crate::control::bands::Pwm;
use crate::shutdown::StepOutcome;

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The loop is about to run its first cycle.
    Started { channels: usize, duty: Pwm },

    /// A new duty was written to the fan chip.
    DutyChanged { from: Pwm, to: Pwm, temperature: i64 },

    /// The fan reported a fault on this cycle.
    FanFault { consecutive: u32, threshold: u32 },

    /// A fault streak ended with a clean read.
    FanRecovered { after: u32 },

    /// The fault persisted past the threshold; shutdown begins.
    ShutdownTriggered { consecutive: u32 },

    /// One device of the shutdown sequence was handled.
    ShutdownStep {
        device: &'static str,
        outcome: StepOutcome,
    },

    /// The loop exited after a stop request.
    Stopped,
}
