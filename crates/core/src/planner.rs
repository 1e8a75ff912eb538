//! The day planner: a single deterministic greedy pass that allocates each
//! eligible task's minutes into compatible free windows.
//!
//! The planner is pure. It receives the day's slots, the entries that
//! survived the protected/removable partition, and the user's task pool,
//! and returns the segments to insert plus the rejection and incomplete
//! lists. Free capacity is threaded through the loop as window-set values
//! keyed by slot index; consuming a window for one task shrinks what later
//! tasks see.
//!
//! Tie-breaks are fixed: tasks are taken in due-time, then priority
//! (descending), then creation order; windows are consumed earliest-start
//! first. Filling near windows before far ones is what keeps a task from
//! scattering into a much later, fully-free slot.

use chrono_tz::Tz;

use crate::entries::{protected_minutes_by_task, EntryRecord, NewEntry};
use crate::rejection::{RejectedTask, RejectionReason};
use crate::slots::SlotRecord;
use crate::tasks::{defer_state, DeferState, IncompleteTask, SchedulableTask, TaskSummary};
use crate::types::DayDate;
use crate::windows::{clip_from, subtract_interval, Window};

/// Inputs for planning one (user, date).
pub struct PlanRequest<'a> {
    pub date: DayDate,
    pub today: DayDate,
    /// The minute of day at evaluation time; `Some` only when planning
    /// today. New segments never start before it.
    pub cutoff_minute: Option<i32>,
    pub tz: Tz,
    /// The date's slots, ascending by start minute.
    pub slots: &'a [SlotRecord],
    /// Entries that survived the protected partition for this date.
    pub protected: &'a [EntryRecord],
    /// The user's full schedulable task pool (status-filtered, top-level).
    pub tasks: &'a [SchedulableTask],
}

/// Output of a planning pass, not yet persisted.
#[derive(Debug, Default)]
pub struct DayPlan {
    pub new_entries: Vec<NewEntry>,
    pub rejected: Vec<RejectedTask>,
    pub incomplete: Vec<IncompleteTask>,
}

/// A usable stretch of one slot's free window, clipped to a task's defer
/// floor and due time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) slot_index: usize,
    pub(crate) start: i32,
    pub(crate) end: i32,
}

/// One consumed stretch: becomes a schedule entry segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Allocation {
    pub slot_index: usize,
    pub start: i32,
    pub end: i32,
}

/// Plan one day. See the module docs for the pass structure.
pub fn plan_day(req: &PlanRequest<'_>) -> DayPlan {
    let mut plan = DayPlan::default();

    // Free windows per slot: full span minus protected segments, clipped
    // to the cutoff when planning today.
    let mut slot_windows: Vec<Vec<Window>> = req
        .slots
        .iter()
        .map(|slot| {
            let mut windows = vec![Window::new(slot.start_minute, slot.end_minute)];
            for entry in req.protected.iter().filter(|e| e.slot_id == slot.id) {
                windows = subtract_interval(&windows, entry.start_minute, entry.end_minute);
            }
            if let Some(cutoff) = req.cutoff_minute {
                windows = clip_from(&windows, cutoff);
            }
            windows
        })
        .collect();

    let reserved = protected_minutes_by_task(req.protected);

    let (ordered, incomplete) = partition_eligible(req);
    plan.incomplete = incomplete;

    for task in ordered {
        let Some(due_time) = task.due_time_minutes else {
            continue;
        };
        let Some(duration) = task.estimated_duration_minutes else {
            continue;
        };

        let defer = defer_state(task.defer_until, req.tz, req.date);
        if defer == DeferState::BlocksDay {
            plan.rejected.push(RejectedTask {
                task: TaskSummary::of(task),
                reason: RejectionReason::DeferBlocksDay,
            });
            continue;
        }
        let defer_floor = match defer {
            DeferState::Floor(minute) => Some(minute),
            _ => None,
        };

        let required = duration - reserved.get(&task.id).copied().unwrap_or(0);
        if required <= 0 {
            // Fully covered by protected segments; satisfied, not unassigned.
            continue;
        }

        let mut candidates: Vec<Candidate> = Vec::new();
        for (slot_index, slot) in req.slots.iter().enumerate() {
            if !slot.accepts(task) {
                continue;
            }
            for window in &slot_windows[slot_index] {
                let start = match defer_floor {
                    Some(floor) => window.start.max(floor),
                    None => window.start,
                };
                let end = window.end.min(due_time);
                if end > start {
                    candidates.push(Candidate {
                        slot_index,
                        start,
                        end,
                    });
                }
            }
        }

        if candidates.is_empty() {
            plan.rejected.push(RejectedTask {
                task: TaskSummary::of(task),
                reason: classify_empty_candidates(req.slots, task, defer_floor, due_time),
            });
            continue;
        }

        let available: i32 = candidates.iter().map(|c| c.end - c.start).sum();
        if available < required {
            plan.rejected.push(RejectedTask {
                task: TaskSummary::of(task),
                reason: RejectionReason::NotEnoughCapacity,
            });
            continue;
        }

        candidates.sort_by_key(|c| c.start);
        let (allocations, remaining) = consume_candidates(&candidates, required);
        for allocation in &allocations {
            plan.new_entries.push(NewEntry {
                date: req.date,
                start_minute: allocation.start,
                end_minute: allocation.end,
                task_id: task.id,
                slot_id: req.slots[allocation.slot_index].id,
            });
            slot_windows[allocation.slot_index] = subtract_interval(
                &slot_windows[allocation.slot_index],
                allocation.start,
                allocation.end,
            );
        }

        if remaining > 0 {
            // Placed segments stay; there is no rollback for the task.
            plan.rejected.push(RejectedTask {
                task: TaskSummary::of(task),
                reason: RejectionReason::SlotFragmentation,
            });
        }
    }

    plan
}

/// Split the task pool into tasks to allocate on this date (ordered) and
/// tasks surfaced as incomplete.
///
/// Tasks with no due date at all are reported only when planning today.
/// Tasks due on the planned date but missing a due time or duration are
/// reported on that date with the missing field names.
fn partition_eligible<'a>(
    req: &PlanRequest<'a>,
) -> (Vec<&'a SchedulableTask>, Vec<IncompleteTask>) {
    let mut eligible: Vec<&SchedulableTask> = Vec::new();
    let mut incomplete = Vec::new();

    for task in req.tasks {
        match task.due_date {
            None => {
                if req.date == req.today {
                    incomplete.push(IncompleteTask {
                        task: TaskSummary::of(task),
                        missing: vec!["due_date"],
                    });
                }
            }
            Some(due) if due != req.date => {}
            Some(_) => {
                let mut missing = Vec::new();
                if task.due_time_minutes.is_none() {
                    missing.push("due_time_minutes");
                }
                if task.estimated_duration_minutes.is_none() {
                    missing.push("estimated_duration_minutes");
                }
                if missing.is_empty() {
                    eligible.push(task);
                } else {
                    incomplete.push(IncompleteTask {
                        task: TaskSummary::of(task),
                        missing,
                    });
                }
            }
        }
    }

    eligible.sort_by(|a, b| {
        a.due_time_minutes
            .cmp(&b.due_time_minutes)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    (eligible, incomplete)
}

/// Classify a task with zero candidate windows.
fn classify_empty_candidates(
    slots: &[SlotRecord],
    task: &SchedulableTask,
    defer_floor: Option<i32>,
    due_time: i32,
) -> RejectionReason {
    if defer_floor.is_some_and(|floor| floor >= due_time) {
        return RejectionReason::DeferAfterDeadline;
    }
    let earliest_compatible_start = slots
        .iter()
        .filter(|slot| slot.accepts(task))
        .map(|slot| slot.start_minute)
        .min();
    match earliest_compatible_start {
        Some(start) if start >= due_time => RejectionReason::DeadlineBeforeFirstSlot,
        _ => RejectionReason::NoMatchingSlot,
    }
}

/// Greedily consume sorted candidates until the requirement is met.
///
/// Each candidate contributes `min(remaining, length)` minutes from its
/// start. Returns the allocations and any minutes still owed; a positive
/// remainder means the sufficiency pre-check was defeated by consumption
/// order and the caller rejects the task as fragmentation.
pub(crate) fn consume_candidates(
    candidates: &[Candidate],
    required: i32,
) -> (Vec<Allocation>, i32) {
    let mut remaining = required;
    let mut allocations = Vec::new();
    for candidate in candidates {
        if remaining <= 0 {
            break;
        }
        let available = candidate.end - candidate.start;
        if available <= 0 {
            continue;
        }
        let take = remaining.min(available);
        allocations.push(Allocation {
            slot_index: candidate.slot_index,
            start: candidate.start,
            end: candidate.start + take,
        });
        remaining -= take;
    }
    (allocations, remaining)
}
