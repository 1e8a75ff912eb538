//! Scheduling-relevant view of tasks.
//!
//! Tasks are owned by the task service; the planner consumes a read-only
//! projection with the fields that matter for placement, plus display
//! fields for the day view.

use chrono_tz::Tz;
use serde::Serialize;

use crate::clock;
use crate::types::{DayDate, DbId, Timestamp};

/// Lifecycle statuses excluded from scheduling.
pub const SCHEDULING_EXCLUDED_STATUSES: [&str; 3] = ["done", "archived", "cancelled"];

/// A task as seen by the planner: top-level, in a schedulable status, with
/// its project/area display fields joined in.
#[derive(Debug, Clone)]
pub struct SchedulableTask {
    pub id: DbId,
    pub name: String,
    pub uid: Option<String>,
    pub due_date: Option<DayDate>,
    /// Minute of day the task is due; `None` means "all day" and makes the
    /// task ineligible for slot placement.
    pub due_time_minutes: Option<i32>,
    pub estimated_duration_minutes: Option<i32>,
    /// The task is invisible to placement before this instant.
    pub defer_until: Option<Timestamp>,
    pub priority: i32,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
    pub project_area_id: Option<DbId>,
    pub area_name: Option<String>,
    pub created_at: Timestamp,
}

/// The fields of a task that dirty-marking inspects. Callers capture one
/// snapshot before and one after a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub due_date: Option<DayDate>,
    pub due_time_minutes: Option<i32>,
    pub estimated_duration_minutes: Option<i32>,
    pub project_id: Option<DbId>,
}

impl TaskSnapshot {
    /// A task is schedulable once it has a due date, a due time, and an
    /// estimated duration.
    pub fn is_schedulable(&self) -> bool {
        self.due_date.is_some()
            && self.due_time_minutes.is_some()
            && self.estimated_duration_minutes.is_some()
    }
}

/// Display summary of a task, embedded in unassigned/incomplete records.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub task_id: DbId,
    pub name: String,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
    pub area_id: Option<DbId>,
    pub area_name: Option<String>,
    pub due_date: Option<DayDate>,
    pub due_time_minutes: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub priority: i32,
}

impl TaskSummary {
    pub fn of(task: &SchedulableTask) -> Self {
        Self {
            task_id: task.id,
            name: task.name.clone(),
            project_id: task.project_id,
            project_name: task.project_name.clone(),
            area_id: task.project_area_id,
            area_name: task.area_name.clone(),
            due_date: task.due_date,
            due_time_minutes: task.due_time_minutes,
            duration_minutes: task.estimated_duration_minutes,
            priority: task.priority,
        }
    }
}

/// A task due on the planned date but missing fields scheduling needs.
#[derive(Debug, Clone, Serialize)]
pub struct IncompleteTask {
    #[serde(flatten)]
    pub task: TaskSummary,
    /// Names of the missing fields.
    pub missing: Vec<&'static str>,
}

/// How a task's defer-until instant constrains placement on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferState {
    /// No defer, or the defer instant resolved to an earlier date.
    Unrestricted,
    /// Defer resolves to the planned date: candidate windows are floored
    /// at this minute of day.
    Floor(i32),
    /// Defer resolves to a later date: the task cannot be placed at all.
    BlocksDay,
}

/// Resolve a defer-until instant against the planned date in the user's
/// timezone.
pub fn defer_state(defer_until: Option<Timestamp>, tz: Tz, date: DayDate) -> DeferState {
    let Some(instant) = defer_until else {
        return DeferState::Unrestricted;
    };
    let defer_date = clock::local_date(instant, tz);
    if defer_date > date {
        DeferState::BlocksDay
    } else if defer_date < date {
        DeferState::Unrestricted
    } else {
        DeferState::Floor(clock::minute_of_day(instant, tz))
    }
}
