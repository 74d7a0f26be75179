//! Integration tests for the MonitorService loop: wait → fault check →
//! temperature → duty write, against the mock board.

use std::time::Duration;

use futures_lite::future::block_on;

use fancontrold::adapters::log_sink::LogEventSink;
use fancontrold::app::events::AppEvent;
use fancontrold::app::service::{Exit, MonitorService, StopSignal};
use fancontrold::config::MonitorConfig;
use fancontrold::control::bands::Pwm;
use fancontrold::error::{Error, ReadError, WaitError};

use crate::log_capture;
use crate::mock_platform::{Call, MockPlatform, RecordingSink, ScriptedTimer, WaitStep};

fn run_loop(
    hw: &mut MockPlatform,
    config: &MonitorConfig,
    initial: Pwm,
    timer: &mut ScriptedTimer<'_>,
    stop: &StopSignal,
) -> (Result<Exit, Error>, MonitorService<&'static str>, RecordingSink) {
    let mut service = MonitorService::bind(config, &*hw, initial);
    let mut sink = RecordingSink::new();
    let exit = block_on(service.run(hw, timer, stop, &mut sink));
    (exit, service, sink)
}

// ── End-to-end ────────────────────────────────────────────────

#[test]
fn end_to_end_duty_then_fault_shutdown() {
    let mut hw = MockPlatform::board()
        .temps("adrv9009-phy", &[0, 65_000, 50_000])
        .faults(&[false, false, false, true]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop);

    let (exit, service, sink) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::PoweredOff));
    // 3 clean cycles, 5 tolerated faults, the 6th triggers.
    assert_eq!(timer.waits, 9);
    assert_eq!(hw.pwm_writes(), vec![128]);
    assert_eq!(service.last_duty(), Pwm(128));
    assert_eq!(
        hw.shutdown_devices(),
        vec!["adrv9009-phy", "adrv9009-phy-b", "hmc7044"]
    );
    assert_eq!(hw.calls.last(), Some(&Call::PowerOff));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FanFault { .. })),
        6
    );
    assert!(sink
        .events
        .contains(&AppEvent::ShutdownTriggered { consecutive: 6 }));
}

#[test]
fn fifth_fault_does_not_trigger() {
    let mut hw = MockPlatform::board()
        .temps("adrv9009-phy", &[30_000])
        .faults(&[true, true, true, true, true, false]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(7, WaitStep::StopAtEnd);

    let (exit, service, sink) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert!(!hw.powered_off());
    assert_eq!(service.fault_count(), 0);
    assert!(sink.events.contains(&AppEvent::FanRecovered { after: 5 }));
}

// ── Cancellation ──────────────────────────────────────────────

#[test]
fn stop_during_wait_ends_without_write_or_shutdown() {
    let mut hw = MockPlatform::board()
        .temps("adrv9009-phy", &[100_000, 0])
        .faults(&[true]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(2, WaitStep::StopDuring);

    let (exit, service, sink) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(service.cycles(), 1);
    assert_eq!(hw.pwm_writes(), vec![255]);
    assert!(!hw.powered_off());
    assert!(hw.shutdown_devices().is_empty());
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn stop_raised_as_wait_completes_is_still_observed() {
    let mut hw = MockPlatform::board().temps("adrv9009-phy", &[100_000]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(1, WaitStep::StopAtEnd);

    let (exit, service, _) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(service.cycles(), 0);
    assert!(hw.calls.is_empty());
}

#[test]
fn wait_failure_is_fatal_without_final_write() {
    let mut hw = MockPlatform::board().temps("adrv9009-phy", &[65_000, 100_000]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(2, WaitStep::Fail);

    let (exit, _, sink) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Err(Error::Wait(WaitError::InvalidPeriod)));
    assert_eq!(hw.pwm_writes(), vec![128]);
    assert!(!sink.events.contains(&AppEvent::Stopped));
}

#[test]
fn waits_use_the_configured_interval() {
    let mut hw = MockPlatform::board();
    let config = MonitorConfig {
        poll_interval_secs: 3,
        ..MonitorConfig::default()
    };
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(4, WaitStep::StopAtEnd);

    let (exit, _, _) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(timer.periods, vec![Duration::from_secs(3); 4]);
}

// ── Duty writes ───────────────────────────────────────────────

#[test]
fn same_band_sequence_writes_exactly_once() {
    let mut hw = MockPlatform::board().temps("adrv9009-phy", &[21_000, 30_000, 39_000, 25_000, 40_000]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(6, WaitStep::StopAtEnd);

    let (exit, _, _) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(hw.pwm_writes(), vec![64]);
}

#[test]
fn startup_value_already_matching_is_not_rewritten() {
    let mut hw = MockPlatform::board().temps("adrv9009-phy", &[65_000]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(4, WaitStep::StopAtEnd);

    let (exit, _, _) = run_loop(&mut hw, &config, Pwm(128), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert!(hw.pwm_writes().is_empty());
}

#[test]
fn hottest_transceiver_wins() {
    let mut hw = MockPlatform::board()
        .temps("adrv9009-phy", &[30_000, 30_000])
        .temps("adrv9009-phy-b", &[85_000, 3_000]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(3, WaitStep::StopAtEnd);

    let (exit, service, _) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(service.channel_count(), 2);
    assert_eq!(hw.pwm_writes(), vec![191, 64]);
}

#[test]
fn failing_sensors_fall_back_to_zero() {
    let mut hw = MockPlatform::board()
        .raw_temps(
            "adrv9009-phy",
            vec![Err(ReadError::Io(std::io::ErrorKind::TimedOut))],
        )
        .raw_temps("adrv9009-phy-b", vec![Ok("not a number")]);
    let config = MonitorConfig::default();
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop).on_wait(3, WaitStep::StopAtEnd);

    let (exit, _, _) = run_loop(&mut hw, &config, Pwm(191), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::Cancelled));
    assert_eq!(hw.pwm_writes(), vec![0]);
}

#[test]
fn rejected_write_is_retried_next_cycle() {
    let mut hw = MockPlatform::board().temps("adrv9009-phy", &[100_000]);
    hw.reject_pwm = true;
    let config = MonitorConfig::default();
    let mut service = MonitorService::bind(&config, &hw, Pwm(0));
    let mut sink = RecordingSink::new();

    service.tick(&mut hw, &mut sink);
    service.tick(&mut hw, &mut sink);
    assert!(hw.pwm_writes().is_empty());
    assert_eq!(service.last_duty(), Pwm(0));

    hw.reject_pwm = false;
    service.tick(&mut hw, &mut sink);
    service.tick(&mut hw, &mut sink);
    assert_eq!(hw.pwm_writes(), vec![255]);
}

// ── Fault-only mode ───────────────────────────────────────────

#[test]
fn no_bound_channels_still_supervises_the_fan() {
    let mut hw = MockPlatform::board().faults(&[true]);
    let config = MonitorConfig {
        fault_threshold: 2,
        ..MonitorConfig::default()
    };
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop);

    let (exit, service, sink) = run_loop(&mut hw, &config, Pwm(64), &mut timer, &stop);

    assert_eq!(service.channel_count(), 0);
    assert_eq!(exit, Ok(Exit::PoweredOff));
    assert_eq!(timer.waits, 3);
    assert!(hw.pwm_writes().is_empty());
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::Started {
            channels: 0,
            duty: Pwm(64)
        })
    );
}

#[test]
fn unreadable_fault_indicator_neither_counts_nor_resets() {
    let io = || Err(ReadError::Io(std::io::ErrorKind::Other));
    let mut hw = MockPlatform::board().fault_reads(vec![Ok(true), io(), io(), Ok(true), Ok(true)]);
    let config = MonitorConfig {
        fault_threshold: 2,
        ..MonitorConfig::default()
    };
    let stop = StopSignal::new();
    let mut timer = ScriptedTimer::new(&stop);

    let (exit, _, _) = run_loop(&mut hw, &config, Pwm(0), &mut timer, &stop);

    assert_eq!(exit, Ok(Exit::PoweredOff));
    assert_eq!(timer.waits, 5);
}

#[test]
fn fault_recovery_is_logged_once() {
    let mut hw = MockPlatform::board().faults(&[true, true, false]);
    let config = MonitorConfig::default();
    let mut service = MonitorService::bind(&config, &hw, Pwm(0));
    let mut sink = LogEventSink::new();

    log_capture::start();
    for _ in 0..3 {
        service.tick(&mut hw, &mut sink);
    }
    let records = log_capture::take();

    let faults = records.iter().filter(|r| r.message.contains("fan faulty")).count();
    let cleared = records.iter().filter(|r| r.message.contains("cleared")).count();
    assert_eq!((faults, cleared), (2, 1), "{records:#?}");
    assert_eq!(service.fault_count(), 0);
}
