use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt::Display;

/// Local time as `2024-06-10T14:03:11.1234567+03:00`.
pub fn current_date_time() -> String {
    round_trip_format(&Local::now())
}

// seven fractional digits, 100ns ticks
pub(crate) fn round_trip_format<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let ticks = at.nanosecond().min(999_999_999) / 100;
    format!(
        "{}.{:07}{}",
        at.format("%Y-%m-%dT%H:%M:%S"),
        ticks,
        at.format("%:z")
    )
}
