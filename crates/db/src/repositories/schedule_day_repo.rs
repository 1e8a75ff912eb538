//! Repository for `schedule_days`.

use sqlx::PgPool;

use tempo_core::types::{DayDate, DbId};

use crate::models::schedule_day::ScheduleDayRow;

/// Column list for `schedule_days` queries.
const COLUMNS: &str = "\
    id, user_id, date, timezone, cutoff_minute, dirty, dirty_reason, \
    created_at, updated_at";

/// Day-record operations. Days are created lazily; a freshly created row
/// is dirty so the first read plans it.
pub struct ScheduleDayRepo;

impl ScheduleDayRepo {
    /// Find the day row, creating it dirty with the given snapshot fields
    /// when absent. The upsert touches only `updated_at` on conflict, so
    /// an existing row's state is returned unchanged.
    pub async fn find_or_create(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
        timezone: Option<&str>,
        cutoff_minute: Option<i32>,
    ) -> Result<ScheduleDayRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_days (user_id, date, timezone, cutoff_minute, dirty) \
             VALUES ($1, $2, $3, $4, TRUE) \
             ON CONFLICT (user_id, date) DO UPDATE SET updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleDayRow>(&query)
            .bind(user_id)
            .bind(date)
            .bind(timezone)
            .bind(cutoff_minute)
            .fetch_one(pool)
            .await
    }

    /// Refresh the timezone and cutoff snapshot when a date is evaluated
    /// as "today".
    pub async fn set_today_snapshot(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        cutoff_minute: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE schedule_days \
             SET timezone = $3, cutoff_minute = $4, updated_at = NOW() \
             WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .bind(timezone)
        .bind(cutoff_minute)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a day stale, creating it when absent. An already-dirty day
    /// keeps its flag; the reason is overwritten only when supplied.
    pub async fn mark_dirty(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
        timezone: Option<&str>,
        reason: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO schedule_days (user_id, date, timezone, dirty, dirty_reason) \
             VALUES ($1, $2, $3, TRUE, $4) \
             ON CONFLICT (user_id, date) DO UPDATE SET \
                 dirty = TRUE, \
                 dirty_reason = COALESCE($4, schedule_days.dirty_reason), \
                 updated_at = NOW()",
        )
        .bind(user_id)
        .bind(date)
        .bind(timezone)
        .bind(reason)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the dirty flag after a successful replan.
    pub async fn mark_clean(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE schedule_days \
             SET dirty = FALSE, dirty_reason = NULL, updated_at = NOW() \
             WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        date: DayDate,
    ) -> Result<Option<ScheduleDayRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM schedule_days WHERE user_id = $1 AND date = $2");
        sqlx::query_as::<_, ScheduleDayRow>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }
}
