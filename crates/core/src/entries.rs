//! Schedule entries: contiguous placements of task time inside a slot.
//!
//! A replan divides a day's existing entries into protected entries (kept,
//! their minutes count toward the owning task's requirement) and removable
//! entries (deleted and regenerated). The partition depends on whether the
//! day is in the past, today, or in the future.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{DayDate, DbId};

/// A `schedule_entries` row, with the owning task's display fields joined
/// in for view assembly.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub date: DayDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub task_id: DbId,
    pub slot_id: DbId,
    pub pinned: bool,
    pub locked: bool,
    pub task_name: Option<String>,
    pub task_uid: Option<String>,
}

impl EntryRecord {
    pub fn minutes(&self) -> i32 {
        self.end_minute - self.start_minute
    }
}

/// A freshly computed segment, not yet persisted. The owning user is
/// supplied by the store at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub date: DayDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub task_id: DbId,
    pub slot_id: DbId,
}

/// How the target date relates to the evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Past,
    /// Today carries the cutoff minute: the minute of day at evaluation
    /// time, before which existing state is frozen.
    Today { cutoff: i32 },
    Future,
}

/// Result of splitting a day's entries for a replan.
#[derive(Debug, Default)]
pub struct ProtectedSplit {
    pub protected: Vec<EntryRecord>,
    pub removable_ids: Vec<DbId>,
}

/// Partition existing entries into protected and removable sets.
///
/// Today: pinned, locked, and segments that ended before or straddle the
/// cutoff are protected; unpinned segments starting at or after the cutoff
/// are removable. Future: only pinned/locked are protected. Past days never
/// remove anything.
pub fn partition_protected(entries: &[EntryRecord], kind: DayKind) -> ProtectedSplit {
    let mut split = ProtectedSplit::default();
    for entry in entries {
        let keep = match kind {
            DayKind::Past => true,
            DayKind::Today { cutoff } => {
                entry.pinned
                    || entry.locked
                    || entry.end_minute <= cutoff
                    || (entry.start_minute <= cutoff && entry.end_minute > cutoff)
            }
            DayKind::Future => entry.pinned || entry.locked,
        };
        if keep {
            split.protected.push(entry.clone());
        } else {
            split.removable_ids.push(entry.id);
        }
    }
    split
}

/// Sum protected minutes per task. These count against each task's
/// required duration so a replan never double-books a task on its own day.
pub fn protected_minutes_by_task(protected: &[EntryRecord]) -> HashMap<DbId, i32> {
    let mut minutes = HashMap::new();
    for entry in protected {
        *minutes.entry(entry.task_id).or_insert(0) += entry.minutes();
    }
    minutes
}
