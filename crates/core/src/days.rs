//! Per-day schedule status: one record per (user, date).
//!
//! The day record is a status marker, not a parent of entries. It carries
//! the dirty flag that gates recomputation and, for today, a snapshot of
//! the timezone and cutoff minute used at the last evaluation.

use serde::Serialize;

use crate::types::{DayDate, DbId};

/// A `schedule_days` row.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDayRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub date: DayDate,
    /// Timezone snapshot taken when the day was last evaluated as "today".
    pub timezone: Option<String>,
    /// Minute of day at which "today" was last evaluated; `None` for any
    /// date that has never been planned as today.
    pub cutoff_minute: Option<i32>,
    pub dirty: bool,
    pub dirty_reason: Option<String>,
}

/// Why a day was marked stale. Stored as text on the day record; the enum
/// keeps the producer side closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyReason {
    TaskCreated,
    DueDateChanged,
    TaskUpdated,
    TaskCompleted,
    PinChanged,
    LockChanged,
}

impl DirtyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::DueDateChanged => "due_date_changed",
            Self::TaskUpdated => "task_updated",
            Self::TaskCompleted => "task_completed",
            Self::PinChanged => "pin_changed",
            Self::LockChanged => "lock_changed",
        }
    }
}

impl std::fmt::Display for DirtyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_reasons_serialize_to_snake_case() {
        assert_eq!(DirtyReason::TaskCreated.as_str(), "task_created");
        assert_eq!(DirtyReason::DueDateChanged.as_str(), "due_date_changed");
        assert_eq!(DirtyReason::PinChanged.as_str(), "pin_changed");
        assert_eq!(DirtyReason::LockChanged.as_str(), "lock_changed");
    }
}
