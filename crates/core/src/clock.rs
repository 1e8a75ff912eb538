//! Timezone resolution and week arithmetic.
//!
//! The planner never reads the wall clock. Callers resolve one evaluation
//! instant per operation and pass it down; everything here derives local
//! dates, minutes of day, and week boundaries from that instant.

use chrono::{Datelike, Timelike};
use chrono_tz::Tz;

use crate::types::{DayDate, Timestamp};

/// Scheduling-relevant fields of a user profile.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// IANA timezone name, e.g. `Europe/Berlin`. Unknown names fall back
    /// to UTC via [`safe_timezone`].
    pub timezone: String,
    /// First day of the week, 0 (Sunday) through 6 (Saturday).
    pub first_day_of_week: i32,
}

impl UserProfile {
    pub fn tz(&self) -> Tz {
        safe_timezone(&self.timezone)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            first_day_of_week: 0,
        }
    }
}

/// Parse an IANA timezone name, falling back to UTC for anything invalid.
pub fn safe_timezone(name: &str) -> Tz {
    name.parse().unwrap_or(Tz::UTC)
}

/// The local calendar date of `instant` in `tz`.
pub fn local_date(instant: Timestamp, tz: Tz) -> DayDate {
    instant.with_timezone(&tz).date_naive()
}

/// The local minute of day of `instant` in `tz`, in `0..1440`.
pub fn minute_of_day(instant: Timestamp, tz: Tz) -> i32 {
    let local = instant.with_timezone(&tz);
    (local.hour() * 60 + local.minute()) as i32
}

/// Weekday of a date, numbered 0 (Sunday) through 6 (Saturday).
pub fn weekday_number(date: DayDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Start of the week containing `date`, given the user's first day of week.
pub fn week_start(date: DayDate, first_day_of_week: i32) -> DayDate {
    let offset = (weekday_number(date) - first_day_of_week).rem_euclid(7);
    date - chrono::Duration::days(offset as i64)
}

/// End of the week containing `date` (inclusive, start + 6 days).
pub fn week_end(date: DayDate, first_day_of_week: i32) -> DayDate {
    week_start(date, first_day_of_week) + chrono::Duration::days(6)
}

/// Whether `date` falls in the dirty-marking horizon: today through the end
/// of the week containing today, inclusive.
pub fn in_horizon(date: DayDate, today: DayDate, first_day_of_week: i32) -> bool {
    date >= today && date <= week_end(today, first_day_of_week)
}
