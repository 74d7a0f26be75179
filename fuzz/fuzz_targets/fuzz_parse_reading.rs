//! Fuzz target: `parse_reading`
//!
//! Feeds arbitrary attribute text to the reading parser and checks that
//! it never panics and that every accepted value maps to a duty without
//! panicking either.
//!
//! cargo fuzz run fuzz_parse_reading

#![no_main]

use fancontrold::control::bands::{Pwm, map_temperature};
use fancontrold::sensors::reading::parse_reading;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(value) = parse_reading(text) {
        // Whatever parsed must survive a decimal round trip.
        assert_eq!(parse_reading(&value.to_string()), Ok(value));
        let _ = map_temperature(value, Pwm(0));
    }
});
