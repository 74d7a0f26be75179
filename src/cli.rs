//! Command-line parsing.
//!
//! ```text
//! fancontrold [OPTIONS] [HWMON_NAME]
//!   -v, --verbose            debug logging
//!   -s, --sleep <secs>       seconds between temperature checks
//!   -f, --fault-cnt <n>      faulty fan reads tolerated before shutdown
//!   -c, --config <path>      JSON configuration file
//!   -h, --help               print usage
//! ```
//!
//! Values may be attached (`-s5`, `--sleep=5`) or separate.  Flags given
//! here override the configuration file.

use core::fmt;
use std::path::PathBuf;

use crate::config::MonitorConfig;

/// Options as given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub verbose: bool,
    pub sleep_secs: Option<u32>,
    pub fault_count: Option<u32>,
    pub config_path: Option<PathBuf>,
    pub chip_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliArgs),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    UnknownOption(String),
    MissingValue(&'static str),
    InvalidValue { option: &'static str, value: String },
    ExtraArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption(opt) => write!(f, "unknown option '{opt}'"),
            Self::MissingValue(opt) => write!(f, "option '{opt}' requires a value"),
            Self::InvalidValue { option, value } => {
                write!(f, "invalid argument '{value}' for '{option}'")
            }
            Self::ExtraArgument(arg) => write!(f, "unexpected argument '{arg}'"),
        }
    }
}

impl std::error::Error for CliError {}

#[derive(Clone, Copy)]
enum Opt {
    Verbose,
    Sleep,
    FaultCount,
    Config,
    Help,
}

impl Opt {
    fn lookup(flag: &str) -> Option<Self> {
        Some(match flag {
            "-v" | "--verbose" => Self::Verbose,
            "-s" | "--sleep" => Self::Sleep,
            "-f" | "--fault-cnt" => Self::FaultCount,
            "-c" | "--config" => Self::Config,
            "-h" | "--help" => Self::Help,
            _ => return None,
        })
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Verbose => "-v, --verbose",
            Self::Sleep => "-s, --sleep",
            Self::FaultCount => "-f, --fault-cnt",
            Self::Config => "-c, --config",
            Self::Help => "-h, --help",
        }
    }

    const fn takes_value(self) -> bool {
        matches!(self, Self::Sleep | Self::FaultCount | Self::Config)
    }
}

/// Split `--long=value` and `-sVALUE` into flag and attached value.
fn split_flag(arg: &str) -> (&str, Option<&str>) {
    if let Some(long) = arg.strip_prefix("--") {
        return match long.split_once('=') {
            Some((name, value)) => (&arg[..2 + name.len()], Some(value)),
            None => (arg, None),
        };
    }
    if arg.len() > 2 && arg.is_char_boundary(2) {
        return (&arg[..2], Some(&arg[2..]));
    }
    (arg, None)
}

fn positive(option: Opt, value: &str) -> Result<u32, CliError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidValue {
            option: option.name(),
            value: value.to_string(),
        }),
    }
}

/// Parse the arguments after the program name.
pub fn parse<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    let mut only_positional = false;

    while let Some(arg) = args.next() {
        if only_positional || arg == "-" || !arg.starts_with('-') {
            if out.chip_name.is_some() {
                return Err(CliError::ExtraArgument(arg));
            }
            out.chip_name = Some(arg);
            continue;
        }
        if arg == "--" {
            only_positional = true;
            continue;
        }

        let (flag, attached) = split_flag(&arg);
        let opt = Opt::lookup(flag).ok_or_else(|| CliError::UnknownOption(arg.clone()))?;

        let value = if opt.takes_value() {
            match attached {
                Some(v) => Some(v.to_string()),
                None => Some(args.next().ok_or(CliError::MissingValue(opt.name()))?),
            }
        } else if attached.is_some() {
            return Err(CliError::UnknownOption(arg.clone()));
        } else {
            None
        };

        match (opt, value) {
            (Opt::Help, _) => return Ok(Command::Help),
            (Opt::Verbose, _) => out.verbose = true,
            (Opt::Sleep, Some(v)) => out.sleep_secs = Some(positive(opt, &v)?),
            (Opt::FaultCount, Some(v)) => out.fault_count = Some(positive(opt, &v)?),
            (Opt::Config, Some(v)) => out.config_path = Some(PathBuf::from(v)),
            (_, None) => return Err(CliError::MissingValue(opt.name())),
        }
    }

    Ok(Command::Run(out))
}

impl CliArgs {
    /// Overlay the given flags on `config`.
    pub fn apply(&self, config: &mut MonitorConfig) {
        if self.verbose {
            config.verbose = true;
        }
        if let Some(secs) = self.sleep_secs {
            config.poll_interval_secs = secs;
        }
        if let Some(count) = self.fault_count {
            config.fault_threshold = count;
        }
        if let Some(name) = &self.chip_name {
            config.chip_name.clone_from(name);
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [OPTIONS]... [HWMON_NAME]\n\
         \n\
         \x20 -v, --verbose\t\tVerbose.\n\
         \x20 -s, --sleep <secs>\tSleep time between temperature checks.\n\
         \x20 -f, --fault-cnt <n>\tNumber of consecutive FAN FAULT reads tolerated before shutting the system down.\n\
         \x20 -c, --config <path>\tJSON configuration file.\n\
         \x20 -h, --help\t\tPrint this help.\n"
    )
}
