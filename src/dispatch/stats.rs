//! Logging of periodic broker client statistics.

use log::{info, warn};
use serde::Deserialize;

/// Subset of the client statistics document the receiver reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct ConsumerStats {
    /// Messages consumed since the client started.
    #[serde(default)]
    pub rxmsgs: u64,
    /// Message bytes consumed since the client started.
    #[serde(default)]
    pub rxmsg_bytes: u64,
}

impl ConsumerStats {
    /// Parse a statistics document.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] when `json` is not a statistics
    /// object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(json) }
}

pub(super) fn log_statistics(json: &str) {
    match ConsumerStats::from_json(json) {
        Ok(stats) => info!(
            "statistics: {} messages ({}) consumed",
            stats.rxmsgs,
            byte_count(stats.rxmsg_bytes)
        ),
        Err(err) => warn!("ignoring malformed statistics: {err}"),
    }
}

/// Format a byte count using binary units.
///
/// # Examples
///
/// ```
/// use sink_receiver::dispatch::byte_count;
/// assert_eq!(byte_count(512), "512 B");
/// assert_eq!(byte_count(1536), "1.5 KiB");
/// assert_eq!(byte_count(3 * 1024 * 1024), "3.0 MiB");
/// ```
#[must_use]
pub fn byte_count(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "one decimal place of a human readable size"
    )]
    let scaled = bytes as f64 / div as f64;
    format!("{scaled:.1} {}iB", PREFIXES[exp])
}
