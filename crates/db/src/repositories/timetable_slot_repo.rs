//! Repository for `timetable_slots` and their allowed-project sets.

use std::collections::HashMap;

use sqlx::PgPool;

use tempo_core::slots::SlotRecord;
use tempo_core::types::DbId;

use crate::models::timetable_slot::{CreateTimetableSlot, TimetableSlotRow, UpdateTimetableSlot};

/// Column list for `timetable_slots` queries.
const COLUMNS: &str = "\
    id, user_id, weekday, start_minute, end_minute, label, area_id, \
    created_at, updated_at";

/// CRUD and planner-read operations for timetable slots.
pub struct TimetableSlotRepo;

impl TimetableSlotRepo {
    /// All of a user's slots for one weekday, ascending by start minute,
    /// with capability filters resolved. This is the planner's read path.
    pub async fn list_for_weekday(
        pool: &PgPool,
        user_id: DbId,
        weekday: i32,
    ) -> Result<Vec<SlotRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timetable_slots \
             WHERE user_id = $1 AND weekday = $2 \
             ORDER BY start_minute ASC"
        );
        let rows = sqlx::query_as::<_, TimetableSlotRow>(&query)
            .bind(user_id)
            .bind(weekday)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
        let mut projects = Self::project_sets(pool, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let project_ids = projects.remove(&row.id).unwrap_or_default();
                row.into_record(project_ids)
            })
            .collect())
    }

    /// Allowed-project sets for a batch of slots.
    async fn project_sets(
        pool: &PgPool,
        slot_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<DbId>>, sqlx::Error> {
        if slot_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pairs: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT timetable_slot_id, project_id FROM timetable_slot_projects \
             WHERE timetable_slot_id = ANY($1) \
             ORDER BY project_id ASC",
        )
        .bind(slot_ids)
        .fetch_all(pool)
        .await?;

        let mut sets: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (slot_id, project_id) in pairs {
            sets.entry(slot_id).or_default().push(project_id);
        }
        Ok(sets)
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        slot_id: DbId,
    ) -> Result<Option<TimetableSlotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timetable_slots WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, TimetableSlotRow>(&query)
            .bind(slot_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTimetableSlot,
    ) -> Result<TimetableSlotRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO timetable_slots \
                 (user_id, weekday, start_minute, end_minute, label, area_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TimetableSlotRow>(&query)
            .bind(user_id)
            .bind(input.weekday)
            .bind(input.start_minute)
            .bind(input.end_minute)
            .bind(&input.label)
            .bind(input.area_id)
            .fetch_one(pool)
            .await?;
        Self::replace_projects(pool, row.id, &input.project_ids).await?;
        Ok(row)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        slot_id: DbId,
        patch: &UpdateTimetableSlot,
    ) -> Result<Option<TimetableSlotRow>, sqlx::Error> {
        let query = format!(
            "UPDATE timetable_slots SET \
                 weekday = COALESCE($3, weekday), \
                 start_minute = COALESCE($4, start_minute), \
                 end_minute = COALESCE($5, end_minute), \
                 label = COALESCE($6, label), \
                 area_id = COALESCE($7, area_id), \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TimetableSlotRow>(&query)
            .bind(slot_id)
            .bind(user_id)
            .bind(patch.weekday)
            .bind(patch.start_minute)
            .bind(patch.end_minute)
            .bind(&patch.label)
            .bind(patch.area_id)
            .fetch_optional(pool)
            .await?;
        if row.is_some() {
            if let Some(project_ids) = &patch.project_ids {
                Self::replace_projects(pool, slot_id, project_ids).await?;
            }
        }
        Ok(row)
    }

    /// Delete a slot the user owns. Returns whether a row was removed;
    /// entries hosted by the slot cascade away.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        slot_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM timetable_slots WHERE id = $1 AND user_id = $2",
        )
        .bind(slot_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a slot's allowed-project set wholesale.
    pub async fn replace_projects(
        pool: &PgPool,
        slot_id: DbId,
        project_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM timetable_slot_projects WHERE timetable_slot_id = $1")
            .bind(slot_id)
            .execute(pool)
            .await?;
        if project_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO timetable_slot_projects (timetable_slot_id, project_id) \
             SELECT $1, project_id FROM UNNEST($2::bigint[]) AS p (project_id)",
        )
        .bind(slot_id)
        .bind(project_ids)
        .execute(pool)
        .await?;
        Ok(())
    }
}
