//! Repository for `schedule_entries`.

use sqlx::PgPool;

use tempo_core::entries::NewEntry;
use tempo_core::types::{DayDate, DbId};

use crate::models::schedule_entry::ScheduleEntryRow;

/// Column list for entry queries, with the owning task's display fields
/// joined in for view assembly.
const COLUMNS: &str = "\
    e.id, e.user_id, e.date, e.start_minute, e.end_minute, e.task_id, \
    e.slot_id, e.pinned, e.locked, t.name AS task_name, t.uid AS task_uid";

const FROM: &str = "schedule_entries e LEFT JOIN tasks t ON t.id = e.task_id";

/// Entry operations for the planner and the pin/lock surface.
pub struct ScheduleEntryRepo;

impl ScheduleEntryRepo {
    /// All of a user's entries for one date, ascending by start minute.
    pub async fn list_for_day(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
    ) -> Result<Vec<ScheduleEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE e.user_id = $1 AND e.date = $2 \
             ORDER BY e.start_minute ASC, e.id ASC"
        );
        sqlx::query_as::<_, ScheduleEntryRow>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// A task's entries in an inclusive date range. Used by dirty-marking
    /// on completion.
    pub async fn list_for_task_between(
        pool: &PgPool,
        user_id: DbId,
        task_id: DbId,
        from: DayDate,
        to: DayDate,
    ) -> Result<Vec<ScheduleEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE e.user_id = $1 AND e.task_id = $2 \
               AND e.date >= $3 AND e.date <= $4 \
             ORDER BY e.date ASC, e.start_minute ASC"
        );
        sqlx::query_as::<_, ScheduleEntryRow>(&query)
            .bind(user_id)
            .bind(task_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<ScheduleEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE e.id = $1 AND e.user_id = $2"
        );
        sqlx::query_as::<_, ScheduleEntryRow>(&query)
            .bind(entry_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a replan's freshly computed segments in one statement. All
    /// entries of a batch share the planned date, so the arrays carry only
    /// the per-segment fields.
    pub async fn insert_for_day(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
        entries: &[NewEntry],
    ) -> Result<(), sqlx::Error> {
        if entries.is_empty() {
            return Ok(());
        }
        let starts: Vec<i32> = entries.iter().map(|e| e.start_minute).collect();
        let ends: Vec<i32> = entries.iter().map(|e| e.end_minute).collect();
        let task_ids: Vec<DbId> = entries.iter().map(|e| e.task_id).collect();
        let slot_ids: Vec<DbId> = entries.iter().map(|e| e.slot_id).collect();
        sqlx::query(
            "INSERT INTO schedule_entries \
                 (user_id, date, start_minute, end_minute, task_id, slot_id) \
             SELECT $1, $2, s.start_minute, s.end_minute, s.task_id, s.slot_id \
             FROM UNNEST($3::integer[], $4::integer[], $5::bigint[], $6::bigint[]) \
                 AS s (start_minute, end_minute, task_id, slot_id)",
        )
        .bind(user_id)
        .bind(date)
        .bind(&starts)
        .bind(&ends)
        .bind(&task_ids)
        .bind(&slot_ids)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete the removable entries of a replan by id.
    pub async fn delete_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM schedule_entries WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Update pin/lock flags on an owned entry. Absent flags keep their
    /// current value. Returns whether the entry existed.
    pub async fn set_flags(
        pool: &PgPool,
        user_id: DbId,
        entry_id: DbId,
        pinned: Option<bool>,
        locked: Option<bool>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE schedule_entries \
             SET pinned = COALESCE($3, pinned), \
                 locked = COALESCE($4, locked), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(entry_id)
        .bind(user_id)
        .bind(pinned)
        .bind(locked)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
