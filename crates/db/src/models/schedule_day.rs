//! Schedule day rows.

use sqlx::FromRow;

use tempo_core::days::ScheduleDayRecord;
use tempo_core::types::{DayDate, DbId, Timestamp};

/// A row from `schedule_days`.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleDayRow {
    pub id: DbId,
    pub user_id: DbId,
    pub date: DayDate,
    pub timezone: Option<String>,
    pub cutoff_minute: Option<i32>,
    pub dirty: bool,
    pub dirty_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ScheduleDayRow> for ScheduleDayRecord {
    fn from(row: ScheduleDayRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            timezone: row.timezone,
            cutoff_minute: row.cutoff_minute,
            dirty: row.dirty,
            dirty_reason: row.dirty_reason,
        }
    }
}
