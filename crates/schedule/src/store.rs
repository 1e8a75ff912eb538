//! Storage capability traits.
//!
//! The planner service is generic over these four ports. Task, timetable,
//! and user data are owned by external collaborators and exposed read-only;
//! only the schedule store (days + entries) is written by the engine.

use async_trait::async_trait;

use tempo_core::clock::UserProfile;
use tempo_core::days::{DirtyReason, ScheduleDayRecord};
use tempo_core::entries::{EntryRecord, NewEntry};
use tempo_core::error::CoreError;
use tempo_core::slots::SlotRecord;
use tempo_core::tasks::SchedulableTask;
use tempo_core::types::{DayDate, DbId};

/// User profile provider: timezone and first day of week.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, user_id: DbId) -> Result<UserProfile, CoreError>;
}

/// Read-only task pool access.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// The user's tasks in a scheduling-eligible status: excludes
    /// done/archived/cancelled, sub-tasks, and recurrence templates;
    /// includes recurrence-generated instances. Ordered by due date,
    /// priority (descending), creation time.
    async fn schedulable_tasks(&self, user_id: DbId) -> Result<Vec<SchedulableTask>, CoreError>;
}

/// Read-only timetable access.
#[async_trait]
pub trait TimetableStore: Send + Sync {
    /// The user's slots for one weekday, ascending by start minute, with
    /// capability filters resolved.
    async fn slots_for_weekday(
        &self,
        user_id: DbId,
        weekday: i32,
    ) -> Result<Vec<SlotRecord>, CoreError>;
}

/// Snapshot fields applied when a day row is created lazily.
#[derive(Debug, Clone, Default)]
pub struct DayDefaults {
    pub timezone: Option<String>,
    pub cutoff_minute: Option<i32>,
}

/// Day records and schedule entries; the engine's only write surface.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Fetch the day row, creating it dirty with `defaults` when absent.
    async fn find_or_create_day(
        &self,
        user_id: DbId,
        date: DayDate,
        defaults: &DayDefaults,
    ) -> Result<ScheduleDayRecord, CoreError>;

    /// Refresh the timezone and cutoff snapshot when a date is evaluated
    /// as "today".
    async fn set_today_snapshot(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        cutoff_minute: i32,
    ) -> Result<(), CoreError>;

    /// Mark a day stale, creating it when absent. Never clears the flag;
    /// only a successful replan does, via [`Self::mark_day_clean`].
    async fn mark_day_dirty(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        reason: DirtyReason,
    ) -> Result<(), CoreError>;

    async fn mark_day_clean(&self, user_id: DbId, date: DayDate) -> Result<(), CoreError>;

    /// A user's entries for one date, ascending by start minute.
    async fn entries_for_day(
        &self,
        user_id: DbId,
        date: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError>;

    /// A task's entries in an inclusive date range.
    async fn entries_for_task_between(
        &self,
        user_id: DbId,
        task_id: DbId,
        from: DayDate,
        to: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError>;

    async fn entry(
        &self,
        user_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<EntryRecord>, CoreError>;

    /// Persist a replan's segments for one date as a single batch.
    async fn insert_entries(
        &self,
        user_id: DbId,
        date: DayDate,
        entries: &[NewEntry],
    ) -> Result<(), CoreError>;

    async fn delete_entries(&self, ids: &[DbId]) -> Result<(), CoreError>;

    /// Update pin/lock flags on an owned entry. Absent flags keep their
    /// current value. Returns whether the entry existed.
    async fn set_entry_flags(
        &self,
        user_id: DbId,
        entry_id: DbId,
        pinned: Option<bool>,
        locked: Option<bool>,
    ) -> Result<bool, CoreError>;
}

/// Everything the schedule service needs, as one bound.
pub trait Store: ProfileStore + TaskStore + TimetableStore + ScheduleStore {}

impl<T: ProfileStore + TaskStore + TimetableStore + ScheduleStore> Store for T {}
