//! Poll-interval wait over the `async-io-mini` reactor.
//!
//! `async_io_mini::Timer` schedules its wake-ups through the embassy time
//! driver; on the host that driver is the one `embassy-time` provides
//! with its `std` feature, linked in below.

use core::time::Duration;
use std::time::Instant;

use async_io_mini::Timer;
use embassy_time as _;

use crate::app::ports::WaitPort;
use crate::error::WaitError;

/// [`WaitPort`] backed by reactor timers.
#[derive(Debug, Default)]
pub struct ReactorTimer;

impl ReactorTimer {
    pub fn new() -> Self {
        Self
    }
}

impl WaitPort for ReactorTimer {
    async fn wait(&mut self, period: Duration) -> Result<(), WaitError> {
        // A zero period would spin; an unrepresentable deadline never fires.
        if period.is_zero() || Instant::now().checked_add(period).is_none() {
            return Err(WaitError::InvalidPeriod);
        }
        Timer::after(period).await;
        Ok(())
    }
}
