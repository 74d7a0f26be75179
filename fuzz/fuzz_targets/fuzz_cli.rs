//! Fuzz target: `cli::parse`
//!
//! Splits the input on NUL bytes into an argument vector and checks that
//! parsing never panics and that accepted numeric options are non-zero.
//!
//! cargo fuzz run fuzz_cli

#![no_main]

use fancontrold::cli::{Command, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let args: Vec<String> = data
        .split(|b| *b == 0)
        .map(|a| String::from_utf8_lossy(a).into_owned())
        .collect();

    if let Ok(Command::Run(cli)) = parse(args) {
        assert_ne!(cli.sleep_secs, Some(0));
        assert_ne!(cli.fault_count, Some(0));
    }
});
