//! Monitor service: the hexagonal core.
//!
//! [`MonitorService`] owns the bound temperature channels, the last duty
//! written to the fan and the fault tracker.  All I/O flows through port
//! traits injected at call sites, so the whole loop runs against mocks in
//! tests.
//!
//! ```text
//!  DeviceRegistry ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                     │      MonitorService      │
//!        FanPort ◀───▶│ faults · bands · shutdown│ ──▶ PowerPort
//!                     └──────────────────────────┘
//!                         ▲ WaitPort  ▲ StopSignal
//! ```
//!
//! Each cycle checks the fan first.  A fault that outlives the threshold
//! ends the loop through the shutdown sequence; otherwise the hottest
//! channel selects the duty, and the chip is written only when the duty
//! actually changes.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{debug, error, info};

use crate::config::MonitorConfig;
use crate::control::bands::{Pwm, map_temperature};
use crate::error::{Error, WriteError};
use crate::safety::{FaultAction, FaultObservation, FaultTracker};
use crate::sensors::{ChannelSet, MONITORED_CHANNELS};
use crate::shutdown::{self, SHUTDOWN_SEQUENCE};

use super::events::AppEvent;
use super::ports::{DeviceRegistry, EventSink, FanPort, PowerPort, WaitPort};

/// Raised once to ask the control loop to stop.
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

/// Why [`MonitorService::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// A stop was requested.
    Cancelled,
    /// The fan fault persisted; the board was told to power off.
    PoweredOff,
}

/// Result of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Nothing was written.
    Steady,
    /// A new duty was written.
    DutyChanged { from: Pwm, to: Pwm },
    /// The duty write was rejected; it is retried next cycle.
    WriteFailed(WriteError),
    /// The shutdown sequence ran.
    PoweredOff,
}

/// Per-loop mutable state.
#[derive(Debug, Clone)]
pub struct MonitorState<C> {
    pub channels: ChannelSet<C>,
    /// Last duty successfully written (or read at startup).
    pub last_duty: Pwm,
}

enum Wake {
    Elapsed,
    Stopped,
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService<C> {
    state: MonitorState<C>,
    faults: FaultTracker,
    poll_interval: Duration,
    cycles: u64,
}

impl<C> MonitorService<C> {
    /// Build the service around an already bound channel set.
    ///
    /// `initial_duty` is the value the chip holds at startup; the first
    /// write only happens when the mapped duty differs from it.
    pub fn new(config: &MonitorConfig, channels: ChannelSet<C>, initial_duty: Pwm) -> Self {
        Self {
            state: MonitorState {
                channels,
                last_duty: initial_duty,
            },
            faults: FaultTracker::new(config.fault_threshold),
            poll_interval: config.poll_interval(),
            cycles: 0,
        }
    }

    /// Bind the board's monitored channels through `registry`.
    pub fn bind<R>(config: &MonitorConfig, registry: &R, initial_duty: Pwm) -> Self
    where
        R: DeviceRegistry<Channel = C>,
    {
        let channels = ChannelSet::bind(registry, &MONITORED_CHANNELS);
        if channels.is_empty() {
            info!("No temperature channel bound, monitoring fan faults only");
        }
        Self::new(config, channels, initial_duty)
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle: fan fault → temperature → duty.
    ///
    /// The `hw` parameter satisfies every hardware port at once, which
    /// avoids a double mutable borrow while keeping the port boundary
    /// explicit.
    pub fn tick<H, S>(&mut self, hw: &mut H, sink: &mut S) -> Cycle
    where
        H: DeviceRegistry<Channel = C> + FanPort + PowerPort,
        S: EventSink,
    {
        self.cycles += 1;

        // 1. Fan health
        let action = self.faults.on_cycle(hw);
        match self.faults.last_observation() {
            Some(FaultObservation::Faulty { consecutive }) => sink.emit(&AppEvent::FanFault {
                consecutive,
                threshold: self.faults.threshold(),
            }),
            Some(FaultObservation::Clear { ended_streak }) if ended_streak > 0 => {
                sink.emit(&AppEvent::FanRecovered {
                    after: ended_streak,
                });
            }
            _ => {}
        }

        if action == FaultAction::TriggerShutdown {
            sink.emit(&AppEvent::ShutdownTriggered {
                consecutive: self.faults.consecutive(),
            });
            shutdown::execute(&SHUTDOWN_SEQUENCE, hw, |step, outcome| {
                sink.emit(&AppEvent::ShutdownStep {
                    device: step.device(),
                    outcome,
                });
            });
            return Cycle::PoweredOff;
        }

        // 2. Temperature
        if self.state.channels.is_empty() {
            return Cycle::Steady;
        }
        let temperature = self.state.channels.sample_max(&*hw);

        // 3. Duty
        let from = self.state.last_duty;
        let to = map_temperature(temperature, from);
        if to == from {
            debug!("temp={} pwm={} (unchanged)", temperature, from);
            return Cycle::Steady;
        }

        match hw.write_pwm(to) {
            Ok(()) => {
                self.state.last_duty = to;
                sink.emit(&AppEvent::DutyChanged {
                    from,
                    to,
                    temperature,
                });
                Cycle::DutyChanged { from, to }
            }
            Err(e) => {
                error!("Failed to set pwm1 to {}: {}", to, e);
                Cycle::WriteFailed(e)
            }
        }
    }

    /// Run cycles until stopped or powered off.
    ///
    /// Every iteration waits one poll interval first.  A stop raised
    /// before or during the wait ends the loop without another cycle; a
    /// failing wait ends it with an error.
    pub async fn run<H, W, S>(
        &mut self,
        hw: &mut H,
        timer: &mut W,
        stop: &StopSignal,
        sink: &mut S,
    ) -> Result<Exit, Error>
    where
        H: DeviceRegistry<Channel = C> + FanPort + PowerPort,
        W: WaitPort,
        S: EventSink,
    {
        sink.emit(&AppEvent::Started {
            channels: self.state.channels.len(),
            duty: self.state.last_duty,
        });

        loop {
            let period = self.poll_interval;
            let wake = future::or(
                async {
                    stop.wait().await;
                    Ok(Wake::Stopped)
                },
                async { timer.wait(period).await.map(|()| Wake::Elapsed) },
            )
            .await;

            let wake = match wake {
                Ok(wake) => wake,
                Err(e) => {
                    error!("Poll wait failed: {}", e);
                    return Err(e.into());
                }
            };

            if matches!(wake, Wake::Stopped) || stop.signaled() {
                info!("Stop requested after {} cycles", self.cycles);
                sink.emit(&AppEvent::Stopped);
                return Ok(Exit::Cancelled);
            }

            if self.tick(hw, sink) == Cycle::PoweredOff {
                return Ok(Exit::PoweredOff);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn last_duty(&self) -> Pwm {
        self.state.last_duty
    }

    pub fn channel_count(&self) -> usize {
        self.state.channels.len()
    }

    /// Current streak of faulty fan reads.
    pub fn fault_count(&self) -> u32 {
        self.faults.consecutive()
    }

    /// Cycles executed since startup.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
