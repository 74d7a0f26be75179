//! Fan-fault supervisor.
//!
//! The tracker runs **every cycle before the temperature logic** and reads
//! the hwmon `fan1_fault` indicator once.  A single faulty read is not
//! acted on: the fault has to persist for more than `threshold`
//! consecutive cycles before the supervisor asks for an emergency
//! shutdown.
//!
//! ## Fault lifecycle
//!
//! 1. Clean read: the streak resets to zero.
//! 2. Faulty read: the streak grows by one.
//! 3. Streak strictly above `threshold`: [`FaultAction::TriggerShutdown`].
//! 4. Unreadable indicator: nothing changes.  A flaky sysfs read must not
//!    count as a fault, nor clear a streak that is already running.
//!
//! With the default threshold of 5 the sixth consecutive faulty read
//! triggers the shutdown.

use log::warn;

use crate::app::ports::FanPort;

/// Outcome of one fault evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultAction {
    Continue,
    TriggerShutdown,
}

/// What the last evaluation observed, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultObservation {
    /// Indicator clear; carries the streak length it ended (0 if none).
    Clear { ended_streak: u32 },
    /// Indicator set; carries the streak length including this read.
    Faulty { consecutive: u32 },
    /// Indicator could not be read; streak untouched.
    Unreadable,
}

/// Consecutive fan-fault counter.
#[derive(Debug, Clone)]
pub struct FaultTracker {
    threshold: u32,
    consecutive: u32,
    last: Option<FaultObservation>,
}

impl FaultTracker {
    /// `threshold` is clamped to at least 1; config validation rejects 0
    /// before it gets here.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive: 0,
            last: None,
        }
    }

    /// Read the fault indicator and update the streak.
    pub fn on_cycle(&mut self, fan: &mut impl FanPort) -> FaultAction {
        match fan.read_fault() {
            Ok(faulty) => self.observe(faulty),
            Err(e) => {
                warn!("Failed to read fan fault indicator: {e}");
                self.last = Some(FaultObservation::Unreadable);
                FaultAction::Continue
            }
        }
    }

    /// Feed one indicator value.
    pub fn observe(&mut self, faulty: bool) -> FaultAction {
        if !faulty {
            self.last = Some(FaultObservation::Clear {
                ended_streak: self.consecutive,
            });
            self.consecutive = 0;
            return FaultAction::Continue;
        }

        self.consecutive = self.consecutive.saturating_add(1);
        self.last = Some(FaultObservation::Faulty {
            consecutive: self.consecutive,
        });

        if self.consecutive > self.threshold {
            FaultAction::TriggerShutdown
        } else {
            FaultAction::Continue
        }
    }

    /// Current streak of faulty reads.
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// What the most recent cycle observed (`None` before the first one).
    pub fn last_observation(&self) -> Option<FaultObservation> {
        self.last
    }
}
