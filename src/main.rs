//! fancontrold: main entry point
//!
//! Hexagonal architecture around a single cancellable control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        ReactorTimer   LogEventSink            │
//! │  (IIO + hwmon + power)  (WaitPort)     (EventSink)             │
//! │  SyslogLogger           signal watcher JsonConfigFile          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  fault tracker · band mapper · shutdown sequence       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 on a clean stop, after power-off was requested, and
//! when the fan chip is not present; 1 on any startup or loop failure.
#![deny(unused_must_use)]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use futures_lite::future;
use log::{error, info};

use fancontrold::adapters::config_file::JsonConfigFile;
use fancontrold::adapters::hardware::HardwareAdapter;
use fancontrold::adapters::hwmon;
use fancontrold::adapters::iio::IioRegistry;
use fancontrold::adapters::log_sink::LogEventSink;
use fancontrold::adapters::logger;
use fancontrold::adapters::power::SystemPower;
use fancontrold::adapters::signals::{self, STOP};
use fancontrold::adapters::timer::ReactorTimer;
use fancontrold::app::ports::{ConfigPort, FanPort};
use fancontrold::app::service::{Exit, MonitorService};
use fancontrold::cli::{self, CliArgs, Command};
use fancontrold::config::{DEFAULT_CONFIG_PATH, MonitorConfig};

fn main() -> ExitCode {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "fancontrold".to_string());

    let args = match cli::parse(argv) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print!("{}", cli::usage(&program));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{program}: {e}");
            eprint!("{}", cli::usage(&program));
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{program}: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the JSON file, then the flags.
fn load_config(args: &CliArgs) -> Result<MonitorConfig> {
    let (file, path) = match &args.config_path {
        Some(path) => (JsonConfigFile::required(path), path.as_path()),
        None => (
            JsonConfigFile::optional(DEFAULT_CONFIG_PATH),
            Path::new(DEFAULT_CONFIG_PATH),
        ),
    };
    let mut config = file
        .load()
        .with_context(|| format!("loading {}", path.display()))?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(config: &MonitorConfig) -> Result<ExitCode> {
    logger::init(config.verbose).context("installing logger")?;
    // Before any other thread exists, so the mask is inherited.
    signals::spawn_watcher(&STOP).context("installing signal watcher")?;

    let Some(mut fan) = hwmon::discover(Path::new(&config.hwmon_root), &config.chip_name)
        .context("scanning hwmon devices")?
    else {
        info!("Could not find hwmon chip ({}), nothing to control", config.chip_name);
        return Ok(ExitCode::SUCCESS);
    };

    let initial = fan
        .read_pwm()
        .map_err(fancontrold::error::Error::from)
        .context("reading initial pwm1")?;
    info!("Initial pwm: {}", initial);

    let iio = IioRegistry::new(&config.iio_root, &config.iio_debug_root);
    let mut hw = HardwareAdapter::new(iio, fan, SystemPower::new());
    let mut service = MonitorService::bind(config, &hw, initial);

    let exit = future::block_on(service.run(
        &mut hw,
        &mut ReactorTimer::new(),
        &STOP,
        &mut LogEventSink::new(),
    ))
    .context("control loop")?;

    match exit {
        Exit::Cancelled => info!("Stopped"),
        Exit::PoweredOff => info!("Power-off requested"),
    }
    Ok(ExitCode::SUCCESS)
}
