//! Shared sysfs helpers for the hwmon and IIO adapters.
//!
//! Attribute files are small text files; reads return the raw text and
//! writes never create files, so a missing attribute surfaces as
//! `NotFound` rather than silently appearing on disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ReadError, WriteError};

/// Read the full text of an attribute file.
pub(super) fn read_attr(path: &Path) -> Result<String, ReadError> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(ReadError::Empty);
    }
    Ok(text)
}

/// Write `value` to an existing attribute file in a single `write`.
pub(super) fn write_attr(path: &Path, value: &str) -> Result<(), WriteError> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(value.as_bytes())?;
    Ok(())
}

/// The trimmed `name` attribute of a device directory.
pub(super) fn device_name(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join("name"))
        .ok()
        .map(|s| s.trim_end().to_string())
}

/// Entries of `root` whose file name starts with `prefix`, sorted by name.
///
/// Sysfs class directories hold symlinks; they are returned as-is and
/// resolved by the caller's file accesses.
pub(super) fn list_prefixed(root: &Path, prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    Ok(dirs)
}
