/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates are timezone-resolved day keys with no time component.
pub type DayDate = chrono::NaiveDate;

/// Minutes in a day. Slot and entry boundaries live in `0..=1440`.
pub const MINUTES_PER_DAY: i32 = 1440;

/// Weekdays are numbered 0 (Sunday) through 6 (Saturday).
pub const WEEKDAYS: i32 = 7;
