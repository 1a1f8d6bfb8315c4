//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Duration in milliseconds of `frames` PCM frames at `sample_rate`
///
/// Returns `None` when the sample rate is zero (unknown or corrupt header).
pub fn frames_to_millis(frames: u64, sample_rate: u32) -> Option<u64> {
    if sample_rate == 0 {
        return None;
    }
    Some(frames * 1000 / sample_rate as u64)
}
