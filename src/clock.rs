use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Source of the local wall-clock time fed into each tick.
pub trait Clock {
    /// Current local time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;

    /// Time left until the next whole second. The ticker starts its schedule
    /// there so every tick reads a distinct second.
    fn until_next_second(&self) -> Duration {
        Duration::ZERO
    }
}

/// Distance from `now` to the next whole second. A leap second's
/// nanoseconds run past one billion; only the fraction counts.
pub fn until_next_second_at(now: &NaiveDateTime) -> Duration {
    let fraction = now.nanosecond() % NANOS_PER_SECOND;
    if fraction == 0 {
        Duration::ZERO
    } else {
        Duration::from_nanos(u64::from(NANOS_PER_SECOND - fraction))
    }
}

/// Host clock in local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    fn until_next_second(&self) -> Duration {
        until_next_second_at(&Local::now().naive_local())
    }
}
