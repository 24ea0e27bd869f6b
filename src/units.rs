//! Byte Units
//!
//! Human-readable rendering of byte counts for log output.

const SUFFIXES: [&str; 5] = ["B", "K", "M", "G", "T"];

/// Formats a byte count with a binary unit suffix.
///
/// The value is divided by 1024 while it stays above 1024, truncating, so
/// `1024` renders as `1024B` and `2048` as `2K`. `T` is the largest unit.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value > 1024 && unit < SUFFIXES.len() - 1 {
        value /= 1024;
        unit += 1;
    }
    format!("{}{}", value, SUFFIXES[unit])
}
