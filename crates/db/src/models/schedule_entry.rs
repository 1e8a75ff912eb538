//! Schedule entry rows.

use sqlx::FromRow;

use tempo_core::entries::EntryRecord;
use tempo_core::types::{DayDate, DbId};

/// A row from `schedule_entries`, with the owning task's display fields
/// joined in for view assembly.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleEntryRow {
    pub id: DbId,
    pub user_id: DbId,
    pub date: DayDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub task_id: DbId,
    pub slot_id: DbId,
    pub pinned: bool,
    pub locked: bool,
    pub task_name: Option<String>,
    pub task_uid: Option<String>,
}

impl From<ScheduleEntryRow> for EntryRecord {
    fn from(row: ScheduleEntryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            start_minute: row.start_minute,
            end_minute: row.end_minute,
            task_id: row.task_id,
            slot_id: row.slot_id,
            pinned: row.pinned,
            locked: row.locked,
            task_name: row.task_name,
            task_uid: row.task_uid,
        }
    }
}
