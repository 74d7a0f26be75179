//! Integer parsing for sysfs / IIO attribute text.
//!
//! Attributes hold a decimal integer followed by a newline, but drivers are
//! not consistent about trailing text (units, spaces).  The parser accepts
//! leading whitespace, an optional sign and a run of digits, and ignores
//! whatever follows.

use crate::error::ReadError;

/// Parse the leading decimal integer of `text`.
///
/// Fails with [`ReadError::Empty`] on blank input and [`ReadError::Parse`]
/// when no digits are present or the value overflows `i64`.
pub fn parse_reading(text: &str) -> Result<i64, ReadError> {
    let s = text.trim_start();
    if s.is_empty() {
        return Err(ReadError::Empty);
    }

    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes[0], b'+' | b'-'));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(ReadError::Parse);
    }

    s[..sign_len + digits]
        .parse::<i64>()
        .map_err(|_| ReadError::Parse)
}
