//! Dirty-day tracking: which (user, date) pairs need a replan, and why.
//!
//! Task lifecycle events flow through here. The tracker only ever sets
//! the dirty flag; clearing is the day planner's job, on a successful
//! replan. Marking is scoped to the horizon: today through the end of
//! the week containing today, in the user's week convention.

use std::sync::Arc;

use tempo_core::clock::{self, UserProfile};
use tempo_core::days::DirtyReason;
use tempo_core::entries::EntryRecord;
use tempo_core::error::CoreError;
use tempo_core::tasks::TaskSnapshot;
use tempo_core::types::{DayDate, DbId, Timestamp};

use crate::store::{ProfileStore, ScheduleStore};

/// Marks days stale in response to task and entry lifecycle events.
pub struct DirtyTracker<S> {
    store: Arc<S>,
}

impl<S: ScheduleStore + ProfileStore> DirtyTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// A task was created. Marks its due date when the task is fully
    /// schedulable and due within the horizon.
    pub async fn task_created(
        &self,
        user_id: DbId,
        task: &TaskSnapshot,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        if !task.is_schedulable() {
            return Ok(());
        }
        let profile = self.store.profile(user_id).await?;
        let today = clock::local_date(now, profile.tz());
        if let Some(due) = task.due_date {
            if clock::in_horizon(due, today, profile.first_day_of_week) {
                self.mark(user_id, due, &profile, DirtyReason::TaskCreated)
                    .await?;
            }
        }
        Ok(())
    }

    /// A task was edited. A due-date move marks both the old and the new
    /// date when in horizon; otherwise a change to due time, duration, or
    /// project (which can alter slot compatibility) marks the unchanged
    /// due date.
    pub async fn task_updated(
        &self,
        user_id: DbId,
        old: &TaskSnapshot,
        new: &TaskSnapshot,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        let profile = self.store.profile(user_id).await?;
        let today = clock::local_date(now, profile.tz());
        let first_day = profile.first_day_of_week;

        if old.due_date != new.due_date {
            if let Some(due) = old.due_date {
                if clock::in_horizon(due, today, first_day) {
                    self.mark(user_id, due, &profile, DirtyReason::DueDateChanged)
                        .await?;
                }
            }
            if let Some(due) = new.due_date {
                if clock::in_horizon(due, today, first_day) {
                    self.mark(user_id, due, &profile, DirtyReason::DueDateChanged)
                        .await?;
                }
            }
            return Ok(());
        }

        let relevant_change = old.due_time_minutes != new.due_time_minutes
            || old.estimated_duration_minutes != new.estimated_duration_minutes
            || old.project_id != new.project_id;
        if relevant_change {
            if let Some(due) = new.due_date {
                if clock::in_horizon(due, today, first_day) {
                    self.mark(user_id, due, &profile, DirtyReason::TaskUpdated)
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// A task was completed. Marks the dates of its scheduled entries in
    /// the horizon, except entries on today that already started at or
    /// before the cutoff: replanning frozen history would be pointless.
    pub async fn task_completed(
        &self,
        user_id: DbId,
        task_id: DbId,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        let profile = self.store.profile(user_id).await?;
        let tz = profile.tz();
        let today = clock::local_date(now, tz);
        let week_end = clock::week_end(today, profile.first_day_of_week);
        let cutoff = clock::minute_of_day(now, tz);

        let entries = self
            .store
            .entries_for_task_between(user_id, task_id, today, week_end)
            .await?;

        let mut marked: Vec<DayDate> = Vec::new();
        for entry in &entries {
            let affects_schedule = if entry.date == today {
                entry.start_minute > cutoff
            } else {
                true
            };
            if affects_schedule && !marked.contains(&entry.date) {
                marked.push(entry.date);
                self.mark(user_id, entry.date, &profile, DirtyReason::TaskCompleted)
                    .await?;
            }
        }
        Ok(())
    }

    /// An entry's pin/lock flags changed. Marks the entry's date; the
    /// reason reflects which flag the caller supplied.
    pub async fn entry_flags_changed(
        &self,
        user_id: DbId,
        entry: &EntryRecord,
        pinned_supplied: bool,
    ) -> Result<(), CoreError> {
        let profile = self.store.profile(user_id).await?;
        let reason = if pinned_supplied {
            DirtyReason::PinChanged
        } else {
            DirtyReason::LockChanged
        };
        self.mark(user_id, entry.date, &profile, reason).await
    }

    async fn mark(
        &self,
        user_id: DbId,
        date: DayDate,
        profile: &UserProfile,
        reason: DirtyReason,
    ) -> Result<(), CoreError> {
        tracing::debug!(user_id, %date, reason = %reason, "Marking day dirty");
        self.store
            .mark_day_dirty(user_id, date, &profile.timezone, reason)
            .await
    }
}
