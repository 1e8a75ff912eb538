//! Day and week view models handed to renderers (REST JSON, ICS builder,
//! UI). Shapes only; transport lives elsewhere.

use std::collections::HashMap;

use serde::Serialize;

use crate::clock;
use crate::entries::EntryRecord;
use crate::rejection::RejectedTask;
use crate::slots::SlotRecord;
use crate::tasks::IncompleteTask;
use crate::types::{DayDate, DbId};

/// One scheduled segment as rendered inside a slot item.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub entry_id: DbId,
    pub task_id: DbId,
    pub task_name: Option<String>,
    pub task_uid: Option<String>,
    pub pinned: bool,
    pub locked: bool,
    pub start_minute: i32,
    pub end_minute: i32,
    pub slot_id: DbId,
}

impl SegmentView {
    fn of(entry: &EntryRecord) -> Self {
        Self {
            entry_id: entry.id,
            task_id: entry.task_id,
            task_name: entry.task_name.clone(),
            task_uid: entry.task_uid.clone(),
            pinned: entry.pinned,
            locked: entry.locked,
            start_minute: entry.start_minute,
            end_minute: entry.end_minute,
            slot_id: entry.slot_id,
        }
    }
}

/// A slot with its booked segments and remaining headroom.
#[derive(Debug, Clone, Serialize)]
pub struct SlotItem {
    pub slot: SlotRecord,
    pub capacity_minutes: i32,
    pub used_minutes: i32,
    pub segments: Vec<SegmentView>,
}

/// Time-ordered day timeline: slots interleaved with synthesized pauses.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayItem {
    Slot(SlotItem),
    Pause { start_minute: i32, end_minute: i32 },
}

/// A task the planner could not place, with its wire code and message.
#[derive(Debug, Clone, Serialize)]
pub struct UnassignedTask {
    #[serde(flatten)]
    pub task: crate::tasks::TaskSummary,
    pub reason_code: &'static str,
    pub reason_message: &'static str,
}

impl From<RejectedTask> for UnassignedTask {
    fn from(rejected: RejectedTask) -> Self {
        Self {
            task: rejected.task,
            reason_code: rejected.reason.code(),
            reason_message: rejected.reason.message(),
        }
    }
}

/// The assembled schedule for one date.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: DayDate,
    pub weekday: i32,
    pub cutoff_minute: Option<i32>,
    pub items: Vec<DayItem>,
    #[serde(rename = "unassignedEligible")]
    pub unassigned_eligible: Vec<UnassignedTask>,
    #[serde(rename = "incompleteForScheduling")]
    pub incomplete_for_scheduling: Vec<IncompleteTask>,
}

/// Seven consecutive assembled days.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub start_date: DayDate,
    pub end_date: DayDate,
    pub timezone: String,
    pub days: Vec<DayView>,
}

/// Assemble the day view: slot items with their segments, pause items for
/// gaps between consecutive slots, merged in start order.
pub fn assemble_day(
    date: DayDate,
    cutoff_minute: Option<i32>,
    slots: &[SlotRecord],
    entries: &[EntryRecord],
    rejected: Vec<RejectedTask>,
    incomplete: Vec<IncompleteTask>,
) -> DayView {
    let mut entries_by_slot: HashMap<DbId, Vec<&EntryRecord>> = HashMap::new();
    for entry in entries {
        entries_by_slot.entry(entry.slot_id).or_default().push(entry);
    }

    let slot_items: Vec<SlotItem> = slots
        .iter()
        .map(|slot| {
            let slot_entries = entries_by_slot.remove(&slot.id).unwrap_or_default();
            let used_minutes = slot_entries.iter().map(|e| e.minutes()).sum();
            SlotItem {
                slot: slot.clone(),
                capacity_minutes: slot.capacity_minutes(),
                used_minutes,
                segments: slot_entries.iter().map(|e| SegmentView::of(e)).collect(),
            }
        })
        .collect();

    let pauses = derive_pauses(slots);
    let items = merge_timeline(slot_items, pauses);

    DayView {
        date,
        weekday: clock::weekday_number(date),
        cutoff_minute,
        items,
        unassigned_eligible: rejected.into_iter().map(UnassignedTask::from).collect(),
        incomplete_for_scheduling: incomplete,
    }
}

/// Gaps between consecutive slots on the same weekday.
fn derive_pauses(slots: &[SlotRecord]) -> Vec<(i32, i32)> {
    slots
        .windows(2)
        .filter(|pair| pair[1].start_minute > pair[0].end_minute)
        .map(|pair| (pair[0].end_minute, pair[1].start_minute))
        .collect()
}

fn merge_timeline(slot_items: Vec<SlotItem>, pauses: Vec<(i32, i32)>) -> Vec<DayItem> {
    let mut items = Vec::with_capacity(slot_items.len() + pauses.len());
    let mut slot_iter = slot_items.into_iter().peekable();
    let mut pause_iter = pauses.into_iter().peekable();

    loop {
        let take_slot = match (slot_iter.peek(), pause_iter.peek()) {
            (Some(slot), Some(pause)) => slot.slot.start_minute < pause.0,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_slot {
            if let Some(slot) = slot_iter.next() {
                items.push(DayItem::Slot(slot));
            }
        } else if let Some((start, end)) = pause_iter.next() {
            items.push(DayItem::Pause {
                start_minute: start,
                end_minute: end,
            });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rejection::{RejectedTask, RejectionReason};
    use crate::tasks::TaskSummary;

    fn date() -> DayDate {
        DayDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    fn slot(id: DbId, start: i32, end: i32) -> SlotRecord {
        SlotRecord {
            id,
            user_id: 1,
            weekday: 3,
            start_minute: start,
            end_minute: end,
            label: Some("Deep work".to_string()),
            area_id: None,
            project_ids: vec![],
        }
    }

    fn entry(id: DbId, slot_id: DbId, start: i32, end: i32) -> EntryRecord {
        EntryRecord {
            id,
            user_id: 1,
            date: date(),
            start_minute: start,
            end_minute: end,
            task_id: 10,
            slot_id,
            pinned: false,
            locked: false,
            task_name: Some("Write report".to_string()),
            task_uid: Some("t-abc".to_string()),
        }
    }

    fn summary() -> TaskSummary {
        TaskSummary {
            task_id: 10,
            name: "Write report".to_string(),
            project_id: None,
            project_name: None,
            area_id: None,
            area_name: None,
            due_date: Some(date()),
            due_time_minutes: Some(600),
            duration_minutes: Some(60),
            priority: 0,
        }
    }

    #[test]
    fn interleaves_pauses_between_gapped_slots() {
        let slots = vec![slot(1, 540, 600), slot(2, 630, 690)];
        let view = assemble_day(date(), None, &slots, &[], vec![], vec![]);
        assert_eq!(view.items.len(), 3);
        assert!(matches!(view.items[0], DayItem::Slot(_)));
        assert!(matches!(
            view.items[1],
            DayItem::Pause {
                start_minute: 600,
                end_minute: 630
            }
        ));
        assert!(matches!(view.items[2], DayItem::Slot(_)));
    }

    #[test]
    fn adjacent_slots_produce_no_pause() {
        let slots = vec![slot(1, 540, 600), slot(2, 600, 660)];
        let view = assemble_day(date(), None, &slots, &[], vec![], vec![]);
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn slot_items_report_capacity_and_usage() {
        let slots = vec![slot(1, 540, 660)];
        let entries = vec![entry(1, 1, 540, 570), entry(2, 1, 600, 630)];
        let view = assemble_day(date(), None, &slots, &entries, vec![], vec![]);
        let DayItem::Slot(item) = &view.items[0] else {
            panic!("expected slot item");
        };
        assert_eq!(item.capacity_minutes, 120);
        assert_eq!(item.used_minutes, 60);
        assert_eq!(item.segments.len(), 2);
        assert_eq!(item.segments[0].entry_id, 1);
    }

    #[test]
    fn weekday_is_derived_from_date() {
        let view = assemble_day(date(), Some(615), &[], &[], vec![], vec![]);
        // 2026-03-04 is a Wednesday.
        assert_eq!(view.weekday, 3);
        assert_eq!(view.cutoff_minute, Some(615));
    }

    #[test]
    fn unassigned_records_carry_code_and_message() {
        let rejected = vec![RejectedTask {
            task: summary(),
            reason: RejectionReason::NoMatchingSlot,
        }];
        let view = assemble_day(date(), None, &[], &[], rejected, vec![]);
        assert_eq!(view.unassigned_eligible.len(), 1);
        assert_eq!(view.unassigned_eligible[0].reason_code, "NO_MATCHING_SLOT");
        assert_eq!(
            view.unassigned_eligible[0].reason_message,
            "No compatible timetable slot for this task."
        );
    }

    #[test]
    fn day_items_serialize_with_type_tags() {
        let slots = vec![slot(1, 540, 600), slot(2, 630, 690)];
        let view = assemble_day(date(), None, &slots, &[], vec![], vec![]);
        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["items"][0]["type"], "slot");
        assert_eq!(json["items"][1]["type"], "pause");
        assert_eq!(json["items"][1]["start_minute"], 600);
        assert!(json["unassignedEligible"].as_array().expect("array").is_empty());
        assert!(json["incompleteForScheduling"]
            .as_array()
            .expect("array")
            .is_empty());
    }
}
