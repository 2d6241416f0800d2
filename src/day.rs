//! Day progress derived from a local wall-clock time of day.
//!
//! Everything here is recomputed from scratch for each timestamp; nothing is
//! accumulated between ticks.

use chrono::Timelike;
use serde::Serialize;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// First hour (inclusive) that counts as daytime.
pub const DAYLIGHT_START_HOUR: u32 = 6;
/// First hour (inclusive) that counts as night again.
pub const DAYLIGHT_END_HOUR: u32 = 18;

/// Seconds since local midnight. Only hour, minute and second are read, so a
/// leap second (reported by chrono as second 59) never pushes this past 86399.
pub fn seconds_elapsed<T: Timelike>(time: &T) -> u32 {
    time.hour() * 3_600 + time.minute() * 60 + time.second()
}

pub fn is_daytime<T: Timelike>(time: &T) -> bool {
    let hour = time.hour();
    (DAYLIGHT_START_HOUR..DAYLIGHT_END_HOUR).contains(&hour)
}

/// Top of every hour: `mm:ss == 00:00`.
pub fn is_weather_refresh_due<T: Timelike>(time: &T) -> bool {
    time.minute() == 0 && time.second() == 0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DayProgress {
    pub seconds_elapsed: u32,
    pub seconds_remaining: u32,
    pub percent_remaining: f64,
}

impl DayProgress {
    pub fn at<T: Timelike>(time: &T) -> Self {
        let seconds_elapsed = seconds_elapsed(time);
        let seconds_remaining = SECONDS_PER_DAY - seconds_elapsed;
        let percent_remaining = seconds_remaining as f64 / SECONDS_PER_DAY as f64 * 100.0;
        Self {
            seconds_elapsed,
            seconds_remaining,
            percent_remaining,
        }
    }

    pub fn percent_elapsed(&self) -> f64 {
        100.0 - self.percent_remaining
    }
}
