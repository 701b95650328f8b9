//! Countdown helpers for pool end times
//!
//! Callers pass `now` explicitly so a single render uses one consistent clock.

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds until `end_time`, clamped at zero once it has passed.
pub fn seconds_left(end_time: i64, now: i64) -> i64 {
    end_time.saturating_sub(now).max(0)
}

/// Human-readable countdown with minute granularity.
///
/// `"Ended"` for non-positive input, otherwise the two most significant units,
/// e.g. `"1d 1h left"`, `"1h 1m left"` or `"0m left"`.
pub fn format_time_left(seconds: i64) -> String {
    if seconds <= 0 {
        return "Ended".to_string();
    }

    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{}d {}h left", days, hours)
    } else if hours > 0 {
        format!("{}h {}m left", hours, minutes)
    } else {
        format!("{}m left", minutes)
    }
}
