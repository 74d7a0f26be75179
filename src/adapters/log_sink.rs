//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade, which ends up in syslog in production.

use log::{debug, error, info, warn};

use crate::EMERGENCY_TARGET;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::shutdown::StepOutcome;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { channels, duty } => {
                info!("START | channels={} pwm={}", channels, duty);
            }
            AppEvent::DutyChanged {
                from,
                to,
                temperature,
            } => {
                info!("DUTY | temp={} pwm {} -> {}", temperature, from, to);
            }
            AppEvent::FanFault {
                consecutive,
                threshold,
            } => {
                warn!("FAULT | fan faulty {}/{}", consecutive, threshold);
            }
            AppEvent::FanRecovered { after } => {
                info!("FAULT | cleared after {} reads", after);
            }
            AppEvent::ShutdownTriggered { consecutive } => {
                error!(
                    target: EMERGENCY_TARGET,
                    "FAN is faulty ({} reads). System is going to poweroff!!!", consecutive
                );
            }
            AppEvent::ShutdownStep { device, outcome } => match outcome {
                StepOutcome::Disabled => info!("SHUTDOWN | {} disabled", device),
                StepOutcome::DeviceMissing => warn!("SHUTDOWN | {} not present", device),
                StepOutcome::WriteFailed(e) => warn!("SHUTDOWN | {} failed: {}", device, e),
            },
            AppEvent::Stopped => {
                debug!("STOP");
            }
        }
    }
}
