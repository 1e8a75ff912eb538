//! Postgres store adapter over the `tempo-db` repositories.
//!
//! Thin delegation layer: every driver error is classified into the
//! engine taxonomy here, so the service and retry wrapper never see
//! backend-specific error codes.

use async_trait::async_trait;
use sqlx::PgPool;

use tempo_core::clock::UserProfile;
use tempo_core::days::{DirtyReason, ScheduleDayRecord};
use tempo_core::entries::{EntryRecord, NewEntry};
use tempo_core::error::CoreError;
use tempo_core::slots::SlotRecord;
use tempo_core::tasks::SchedulableTask;
use tempo_core::types::{DayDate, DbId};

use tempo_db::contention::map_sqlx_err;
use tempo_db::repositories::{
    ScheduleDayRepo, ScheduleEntryRepo, TaskRepo, TimetableSlotRepo, UserRepo,
};

use crate::store::{DayDefaults, ProfileStore, ScheduleStore, TaskStore, TimetableStore};

/// Production store backed by Postgres.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn profile(&self, user_id: DbId) -> Result<UserProfile, CoreError> {
        let row = UserRepo::profile(&self.pool, user_id)
            .await
            .map_err(map_sqlx_err)?;
        row.map(UserProfile::from).ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn schedulable_tasks(&self, user_id: DbId) -> Result<Vec<SchedulableTask>, CoreError> {
        let rows = TaskRepo::schedulable(&self.pool, user_id)
            .await
            .map_err(map_sqlx_err)?;
        Ok(rows.into_iter().map(SchedulableTask::from).collect())
    }
}

#[async_trait]
impl TimetableStore for PgStore {
    async fn slots_for_weekday(
        &self,
        user_id: DbId,
        weekday: i32,
    ) -> Result<Vec<SlotRecord>, CoreError> {
        TimetableSlotRepo::list_for_weekday(&self.pool, user_id, weekday)
            .await
            .map_err(map_sqlx_err)
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn find_or_create_day(
        &self,
        user_id: DbId,
        date: DayDate,
        defaults: &DayDefaults,
    ) -> Result<ScheduleDayRecord, CoreError> {
        let row = ScheduleDayRepo::find_or_create(
            &self.pool,
            user_id,
            date,
            defaults.timezone.as_deref(),
            defaults.cutoff_minute,
        )
        .await
        .map_err(map_sqlx_err)?;
        Ok(row.into())
    }

    async fn set_today_snapshot(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        cutoff_minute: i32,
    ) -> Result<(), CoreError> {
        ScheduleDayRepo::set_today_snapshot(&self.pool, user_id, date, timezone, cutoff_minute)
            .await
            .map_err(map_sqlx_err)
    }

    async fn mark_day_dirty(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        reason: DirtyReason,
    ) -> Result<(), CoreError> {
        ScheduleDayRepo::mark_dirty(
            &self.pool,
            user_id,
            date,
            Some(timezone),
            Some(reason.as_str()),
        )
        .await
        .map_err(map_sqlx_err)
    }

    async fn mark_day_clean(&self, user_id: DbId, date: DayDate) -> Result<(), CoreError> {
        ScheduleDayRepo::mark_clean(&self.pool, user_id, date)
            .await
            .map_err(map_sqlx_err)
    }

    async fn entries_for_day(
        &self,
        user_id: DbId,
        date: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError> {
        let rows = ScheduleEntryRepo::list_for_day(&self.pool, user_id, date)
            .await
            .map_err(map_sqlx_err)?;
        Ok(rows.into_iter().map(EntryRecord::from).collect())
    }

    async fn entries_for_task_between(
        &self,
        user_id: DbId,
        task_id: DbId,
        from: DayDate,
        to: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError> {
        let rows =
            ScheduleEntryRepo::list_for_task_between(&self.pool, user_id, task_id, from, to)
                .await
                .map_err(map_sqlx_err)?;
        Ok(rows.into_iter().map(EntryRecord::from).collect())
    }

    async fn entry(
        &self,
        user_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<EntryRecord>, CoreError> {
        let row = ScheduleEntryRepo::find(&self.pool, user_id, entry_id)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.map(EntryRecord::from))
    }

    async fn insert_entries(
        &self,
        user_id: DbId,
        date: DayDate,
        entries: &[NewEntry],
    ) -> Result<(), CoreError> {
        ScheduleEntryRepo::insert_for_day(&self.pool, user_id, date, entries)
            .await
            .map_err(map_sqlx_err)
    }

    async fn delete_entries(&self, ids: &[DbId]) -> Result<(), CoreError> {
        ScheduleEntryRepo::delete_by_ids(&self.pool, ids)
            .await
            .map(|_| ())
            .map_err(map_sqlx_err)
    }

    async fn set_entry_flags(
        &self,
        user_id: DbId,
        entry_id: DbId,
        pinned: Option<bool>,
        locked: Option<bool>,
    ) -> Result<bool, CoreError> {
        ScheduleEntryRepo::set_flags(&self.pool, user_id, entry_id, pinned, locked)
            .await
            .map_err(map_sqlx_err)
    }
}
