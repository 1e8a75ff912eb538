//! In-memory store implementation.
//!
//! Backs the integration test suite and embedded callers that do not want
//! a database. Mirrors the Postgres adapter's semantics: lazily created
//! dirty days, status/recurrence task filtering, entry ordering, and the
//! task display-field join on entries. Contention can be injected to
//! exercise the retry wrapper.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use tempo_core::clock::UserProfile;
use tempo_core::days::{DirtyReason, ScheduleDayRecord};
use tempo_core::entries::{EntryRecord, NewEntry};
use tempo_core::error::CoreError;
use tempo_core::slots::SlotRecord;
use tempo_core::tasks::{SchedulableTask, SCHEDULING_EXCLUDED_STATUSES};
use tempo_core::types::{DayDate, DbId};

use crate::store::{DayDefaults, ProfileStore, ScheduleStore, TaskStore, TimetableStore};

/// A task row as the task service would hold it: the planner projection
/// plus the lifecycle fields the schedulable filter inspects.
#[derive(Debug, Clone)]
pub struct StoredTask {
    pub user_id: DbId,
    pub task: SchedulableTask,
    pub status: String,
    pub parent_task_id: Option<DbId>,
    pub recurrence_type: Option<String>,
    pub recurring_parent_id: Option<DbId>,
}

impl StoredTask {
    pub fn new(user_id: DbId, task: SchedulableTask) -> Self {
        Self {
            user_id,
            task,
            status: "open".to_string(),
            parent_task_id: None,
            recurrence_type: None,
            recurring_parent_id: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    profiles: HashMap<DbId, UserProfile>,
    tasks: Vec<StoredTask>,
    slots: Vec<SlotRecord>,
    days: Vec<ScheduleDayRecord>,
    entries: Vec<EntryRecord>,
    next_id: DbId,
    contention_budget: u32,
}

impl Inner {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn task_display(&self, task_id: DbId) -> (Option<String>, Option<String>) {
        self.tasks
            .iter()
            .find(|stored| stored.task.id == task_id)
            .map(|stored| (Some(stored.task.name.clone()), stored.task.uid.clone()))
            .unwrap_or((None, None))
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    pub fn insert_profile(&self, user_id: DbId, profile: UserProfile) {
        self.lock().profiles.insert(user_id, profile);
    }

    pub fn insert_slot(&self, mut slot: SlotRecord) -> DbId {
        let mut inner = self.lock();
        slot.id = inner.next_id();
        let id = slot.id;
        inner.slots.push(slot);
        id
    }

    pub fn insert_task(&self, mut stored: StoredTask) -> DbId {
        let mut inner = self.lock();
        stored.task.id = inner.next_id();
        let id = stored.task.id;
        inner.tasks.push(stored);
        id
    }

    /// Place an entry directly, bypassing the planner. Used to seed
    /// protected or historical segments in tests.
    #[allow(clippy::too_many_arguments)]
    pub fn seed_entry(
        &self,
        user_id: DbId,
        date: DayDate,
        start_minute: i32,
        end_minute: i32,
        task_id: DbId,
        slot_id: DbId,
        pinned: bool,
        locked: bool,
    ) -> DbId {
        let mut inner = self.lock();
        let id = inner.next_id();
        let (task_name, task_uid) = inner.task_display(task_id);
        inner.entries.push(EntryRecord {
            id,
            user_id,
            date,
            start_minute,
            end_minute,
            task_id,
            slot_id,
            pinned,
            locked,
            task_name,
            task_uid,
        });
        id
    }

    /// The day record as currently stored, if any.
    pub fn day(&self, user_id: DbId, date: DayDate) -> Option<ScheduleDayRecord> {
        self.lock()
            .days
            .iter()
            .find(|day| day.user_id == user_id && day.date == date)
            .cloned()
    }

    /// Fail the next `n` replan transactions with a contention error.
    pub fn inject_contention(&self, n: u32) {
        self.lock().contention_budget = n;
    }

    /// Flip a task's lifecycle status (e.g. to `done`).
    pub fn set_task_status(&self, task_id: DbId, status: &str) {
        let mut inner = self.lock();
        if let Some(stored) = inner.tasks.iter_mut().find(|s| s.task.id == task_id) {
            stored.status = status.to_string();
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, user_id: DbId) -> Result<UserProfile, CoreError> {
        self.lock()
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn schedulable_tasks(&self, user_id: DbId) -> Result<Vec<SchedulableTask>, CoreError> {
        let inner = self.lock();
        let mut tasks: Vec<SchedulableTask> = inner
            .tasks
            .iter()
            .filter(|stored| stored.user_id == user_id)
            .filter(|stored| {
                !SCHEDULING_EXCLUDED_STATUSES.contains(&stored.status.as_str())
            })
            .filter(|stored| stored.parent_task_id.is_none())
            .filter(|stored| {
                let is_template = stored
                    .recurrence_type
                    .as_deref()
                    .is_some_and(|kind| kind != "none")
                    && stored.recurring_parent_id.is_none();
                !is_template
            })
            .map(|stored| stored.task.clone())
            .collect();
        // Due date ascending with absent dates last, matching the SQL
        // NULLS LAST default, then priority descending, creation ascending.
        tasks.sort_by(|a, b| {
            match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(tasks)
    }
}

#[async_trait]
impl TimetableStore for MemoryStore {
    async fn slots_for_weekday(
        &self,
        user_id: DbId,
        weekday: i32,
    ) -> Result<Vec<SlotRecord>, CoreError> {
        let inner = self.lock();
        let mut slots: Vec<SlotRecord> = inner
            .slots
            .iter()
            .filter(|slot| slot.user_id == user_id && slot.weekday == weekday)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.start_minute);
        Ok(slots)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn find_or_create_day(
        &self,
        user_id: DbId,
        date: DayDate,
        defaults: &DayDefaults,
    ) -> Result<ScheduleDayRecord, CoreError> {
        let mut inner = self.lock();
        if inner.contention_budget > 0 {
            inner.contention_budget -= 1;
            return Err(CoreError::Contention("database is locked".to_string()));
        }
        if let Some(day) = inner
            .days
            .iter()
            .find(|day| day.user_id == user_id && day.date == date)
        {
            return Ok(day.clone());
        }
        let id = inner.next_id();
        let day = ScheduleDayRecord {
            id,
            user_id,
            date,
            timezone: defaults.timezone.clone(),
            cutoff_minute: defaults.cutoff_minute,
            dirty: true,
            dirty_reason: None,
        };
        inner.days.push(day.clone());
        Ok(day)
    }

    async fn set_today_snapshot(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        cutoff_minute: i32,
    ) -> Result<(), CoreError> {
        let mut inner = self.lock();
        if let Some(day) = inner
            .days
            .iter_mut()
            .find(|day| day.user_id == user_id && day.date == date)
        {
            day.timezone = Some(timezone.to_string());
            day.cutoff_minute = Some(cutoff_minute);
        }
        Ok(())
    }

    async fn mark_day_dirty(
        &self,
        user_id: DbId,
        date: DayDate,
        timezone: &str,
        reason: DirtyReason,
    ) -> Result<(), CoreError> {
        let mut inner = self.lock();
        if let Some(day) = inner
            .days
            .iter_mut()
            .find(|day| day.user_id == user_id && day.date == date)
        {
            day.dirty = true;
            day.dirty_reason = Some(reason.as_str().to_string());
            return Ok(());
        }
        let id = inner.next_id();
        inner.days.push(ScheduleDayRecord {
            id,
            user_id,
            date,
            timezone: Some(timezone.to_string()),
            cutoff_minute: None,
            dirty: true,
            dirty_reason: Some(reason.as_str().to_string()),
        });
        Ok(())
    }

    async fn mark_day_clean(&self, user_id: DbId, date: DayDate) -> Result<(), CoreError> {
        let mut inner = self.lock();
        if let Some(day) = inner
            .days
            .iter_mut()
            .find(|day| day.user_id == user_id && day.date == date)
        {
            day.dirty = false;
            day.dirty_reason = None;
        }
        Ok(())
    }

    async fn entries_for_day(
        &self,
        user_id: DbId,
        date: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError> {
        let inner = self.lock();
        let mut entries: Vec<EntryRecord> = inner
            .entries
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.date == date)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.start_minute, entry.id));
        Ok(entries)
    }

    async fn entries_for_task_between(
        &self,
        user_id: DbId,
        task_id: DbId,
        from: DayDate,
        to: DayDate,
    ) -> Result<Vec<EntryRecord>, CoreError> {
        let inner = self.lock();
        let mut entries: Vec<EntryRecord> = inner
            .entries
            .iter()
            .filter(|entry| {
                entry.user_id == user_id
                    && entry.task_id == task_id
                    && entry.date >= from
                    && entry.date <= to
            })
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.date, entry.start_minute));
        Ok(entries)
    }

    async fn entry(
        &self,
        user_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<EntryRecord>, CoreError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .find(|entry| entry.user_id == user_id && entry.id == entry_id)
            .cloned())
    }

    async fn insert_entries(
        &self,
        user_id: DbId,
        date: DayDate,
        entries: &[NewEntry],
    ) -> Result<(), CoreError> {
        let mut inner = self.lock();
        for new in entries {
            let id = inner.next_id();
            let (task_name, task_uid) = inner.task_display(new.task_id);
            inner.entries.push(EntryRecord {
                id,
                user_id,
                date,
                start_minute: new.start_minute,
                end_minute: new.end_minute,
                task_id: new.task_id,
                slot_id: new.slot_id,
                pinned: false,
                locked: false,
                task_name,
                task_uid,
            });
        }
        Ok(())
    }

    async fn delete_entries(&self, ids: &[DbId]) -> Result<(), CoreError> {
        self.lock().entries.retain(|entry| !ids.contains(&entry.id));
        Ok(())
    }

    async fn set_entry_flags(
        &self,
        user_id: DbId,
        entry_id: DbId,
        pinned: Option<bool>,
        locked: Option<bool>,
    ) -> Result<bool, CoreError> {
        let mut inner = self.lock();
        match inner
            .entries
            .iter_mut()
            .find(|entry| entry.user_id == user_id && entry.id == entry_id)
        {
            Some(entry) => {
                if let Some(pinned) = pinned {
                    entry.pinned = pinned;
                }
                if let Some(locked) = locked {
                    entry.locked = locked;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
