//! Human-readable byte counts.
//!
//! Used for the `filesize` metadata field and for the total-size error a
//! rejected batch reports.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary (1024) units and two decimals.
///
/// Picks the largest unit the value reaches at least one of, never going
/// past TB. Negative input is treated as zero.
///
/// ```
/// # use snapshelf::size::format_size;
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(0), "0.00 B");
/// ```
pub fn format_size(bytes: i64) -> String {
    let bytes = bytes.max(0) as f64;
    let mut unit = 0;
    let mut scaled = bytes;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", scaled, UNITS[unit])
}

/// [`format_size`] for unsigned sizes as reported by the filesystem.
pub fn format_size_u64(bytes: u64) -> String {
    format_size(i64::try_from(bytes).unwrap_or(i64::MAX))
}
