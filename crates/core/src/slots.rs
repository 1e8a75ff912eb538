//! Timetable slots: recurring weekly availability windows.
//!
//! A slot optionally carries a capability filter (an area and/or a set of
//! allowed projects) that constrains which tasks it may host. Slots are
//! user-managed rows; the planner only reads them.

use serde::Serialize;

use crate::tasks::SchedulableTask;
use crate::types::DbId;

/// A timetable slot with its capability filter resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SlotRecord {
    pub id: DbId,
    pub user_id: DbId,
    /// 0 (Sunday) through 6 (Saturday).
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub label: Option<String>,
    pub area_id: Option<DbId>,
    /// Projects explicitly allowed in this slot.
    pub project_ids: Vec<DbId>,
}

impl SlotRecord {
    pub fn capacity_minutes(&self) -> i32 {
        self.end_minute - self.start_minute
    }

    /// Whether this slot may host the given task.
    ///
    /// Matches when the slot's area equals the area of the task's project,
    /// or when the slot's allowed-project set contains the task's project.
    /// A task with no project never matches, and a slot with neither an
    /// area nor allowed projects hosts nothing.
    pub fn accepts(&self, task: &SchedulableTask) -> bool {
        if let Some(area_id) = self.area_id {
            if task.project_area_id == Some(area_id) {
                return true;
            }
        }
        match task.project_id {
            Some(project_id) => self.project_ids.contains(&project_id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::SchedulableTask;

    fn slot(area_id: Option<DbId>, project_ids: Vec<DbId>) -> SlotRecord {
        SlotRecord {
            id: 1,
            user_id: 1,
            weekday: 3,
            start_minute: 540,
            end_minute: 600,
            label: None,
            area_id,
            project_ids,
        }
    }

    fn task(project_id: Option<DbId>, project_area_id: Option<DbId>) -> SchedulableTask {
        SchedulableTask {
            id: 10,
            name: "Write report".to_string(),
            uid: None,
            due_date: None,
            due_time_minutes: None,
            estimated_duration_minutes: None,
            defer_until: None,
            priority: 0,
            project_id,
            project_name: None,
            project_area_id,
            area_name: None,
            created_at: chrono::DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn area_match_through_project() {
        assert!(slot(Some(5), vec![]).accepts(&task(Some(2), Some(5))));
    }

    #[test]
    fn area_mismatch_falls_through_to_project_set() {
        assert!(slot(Some(5), vec![2]).accepts(&task(Some(2), Some(9))));
        assert!(!slot(Some(5), vec![3]).accepts(&task(Some(2), Some(9))));
    }

    #[test]
    fn project_set_match_without_area() {
        assert!(slot(None, vec![2]).accepts(&task(Some(2), None)));
    }

    #[test]
    fn task_without_project_never_matches_area_slot() {
        assert!(!slot(Some(5), vec![]).accepts(&task(None, None)));
    }

    #[test]
    fn filterless_slot_hosts_nothing() {
        assert!(!slot(None, vec![]).accepts(&task(Some(2), Some(5))));
        assert!(!slot(None, vec![]).accepts(&task(None, None)));
    }
}
