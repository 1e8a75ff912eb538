//! Read-only projection of task-service rows for the planner.

use sqlx::FromRow;

use tempo_core::tasks::SchedulableTask;
use tempo_core::types::{DayDate, DbId, Timestamp};

/// A schedulable task row: top-level, in a schedulable status, with its
/// project and area display fields joined in.
#[derive(Debug, Clone, FromRow)]
pub struct SchedulableTaskRow {
    pub id: DbId,
    pub name: String,
    pub uid: Option<String>,
    pub due_date: Option<DayDate>,
    pub due_time_minutes: Option<i32>,
    pub estimated_duration_minutes: Option<i32>,
    pub defer_until: Option<Timestamp>,
    pub priority: i32,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub project_name: Option<String>,
    pub project_area_id: Option<DbId>,
    pub area_name: Option<String>,
}

impl From<SchedulableTaskRow> for SchedulableTask {
    fn from(row: SchedulableTaskRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            uid: row.uid,
            due_date: row.due_date,
            due_time_minutes: row.due_time_minutes,
            estimated_duration_minutes: row.estimated_duration_minutes,
            defer_until: row.defer_until,
            priority: row.priority,
            project_id: row.project_id,
            project_name: row.project_name,
            project_area_id: row.project_area_id,
            area_name: row.area_name,
            created_at: row.created_at,
        }
    }
}
