//! Why a task could not be placed on a day.
//!
//! Placement rejections are data, not errors: the plan operation succeeds
//! and each rejected task appears in the day view's unassigned list. The
//! enum is closed; wire codes and human-readable messages are derived from
//! it at the view boundary.

use crate::tasks::TaskSummary;

/// The six rejection kinds. The two defer kinds share one wire code but
/// carry distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The defer-until instant resolves to a date after the planned day.
    DeferBlocksDay,
    /// The defer floor on the planned day is at or past the due time.
    DeferAfterDeadline,
    /// The earliest compatible slot starts at or after the due time.
    DeadlineBeforeFirstSlot,
    /// No compatible slot has a usable window.
    NoMatchingSlot,
    /// Compatible free minutes before the deadline fall short of the
    /// required duration.
    NotEnoughCapacity,
    /// Greedy consumption ran out of windows with minutes still owed.
    SlotFragmentation,
}

impl RejectionReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::DeferBlocksDay | Self::DeferAfterDeadline => "DEFER_UNTIL_BLOCKS",
            Self::DeadlineBeforeFirstSlot => "DEADLINE_BEFORE_FIRST_AVAILABLE_SLOT",
            Self::NoMatchingSlot => "NO_MATCHING_SLOT",
            Self::NotEnoughCapacity => "NOT_ENOUGH_CAPACITY_BEFORE_DEADLINE",
            Self::SlotFragmentation => "SLOT_FRAGMENTATION_TOO_SMALL",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::DeferBlocksDay => "Defer date blocks scheduling on this day.",
            Self::DeferAfterDeadline => "Defer time is after the task deadline.",
            Self::DeadlineBeforeFirstSlot => "Deadline is before the first available slot.",
            Self::NoMatchingSlot => "No compatible timetable slot for this task.",
            Self::NotEnoughCapacity => "Not enough capacity before the deadline.",
            Self::SlotFragmentation => "Available slots are too fragmented to fit the task.",
        }
    }
}

/// A task the planner could not place, with the reason.
#[derive(Debug, Clone)]
pub struct RejectedTask {
    pub task: TaskSummary,
    pub reason: RejectionReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defer_kinds_share_one_code() {
        assert_eq!(RejectionReason::DeferBlocksDay.code(), "DEFER_UNTIL_BLOCKS");
        assert_eq!(
            RejectionReason::DeferAfterDeadline.code(),
            "DEFER_UNTIL_BLOCKS"
        );
        assert_ne!(
            RejectionReason::DeferBlocksDay.message(),
            RejectionReason::DeferAfterDeadline.message()
        );
    }

    #[test]
    fn codes_are_distinct_across_non_defer_kinds() {
        let codes = [
            RejectionReason::DeadlineBeforeFirstSlot.code(),
            RejectionReason::NoMatchingSlot.code(),
            RejectionReason::NotEnoughCapacity.code(),
            RejectionReason::SlotFragmentation.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
