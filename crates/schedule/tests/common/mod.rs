//! Shared fixtures for the scheduling integration tests.
//!
//! All tests run against the in-memory store with a fixed evaluation
//! instant: Wednesday 2026-03-04 10:00 UTC (minute 600). The test user is
//! on UTC with a Monday-first week, so the horizon week is Mar 2 – Mar 8.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::TimeZone;

use tempo_core::clock::UserProfile;
use tempo_core::slots::SlotRecord;
use tempo_core::tasks::SchedulableTask;
use tempo_core::types::{DayDate, DbId, Timestamp};
use tempo_core::view::{DayItem, DayView, SegmentView};
use tempo_schedule::memory::{MemoryStore, StoredTask};
use tempo_schedule::service::ScheduleService;

pub const USER: DbId = 1;
pub const AREA: DbId = 50;
pub const PROJECT: DbId = 60;

/// Wednesday 2026-03-04, 10:00 UTC (minute of day 600).
pub fn now() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap()
}

pub fn march(day: u32) -> DayDate {
    DayDate::from_ymd_opt(2026, 3, day).unwrap()
}

pub fn today() -> DayDate {
    march(4)
}

/// Thursday, weekday 4.
pub fn tomorrow() -> DayDate {
    march(5)
}

pub fn store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert_profile(
        USER,
        UserProfile {
            timezone: "UTC".to_string(),
            first_day_of_week: 1,
        },
    );
    Arc::new(store)
}

pub fn service(store: &Arc<MemoryStore>) -> ScheduleService<MemoryStore> {
    ScheduleService::new(Arc::clone(store))
}

/// A slot filtered to the test area.
pub fn area_slot(weekday: i32, start: i32, end: i32) -> SlotRecord {
    SlotRecord {
        id: 0,
        user_id: USER,
        weekday,
        start_minute: start,
        end_minute: end,
        label: None,
        area_id: Some(AREA),
        project_ids: vec![],
    }
}

static CREATED_SEQ: AtomicI64 = AtomicI64::new(0);

/// A schedulable task in the test project (which belongs to the test
/// area). Creation times are strictly increasing so ordering ties break
/// deterministically.
pub fn task(due_date: DayDate, due_time: i32, duration: i32) -> StoredTask {
    let seq = CREATED_SEQ.fetch_add(1, Ordering::SeqCst);
    StoredTask::new(
        USER,
        SchedulableTask {
            id: 0,
            name: format!("task-{seq}"),
            uid: Some(format!("uid-{seq}")),
            due_date: Some(due_date),
            due_time_minutes: Some(due_time),
            estimated_duration_minutes: Some(duration),
            defer_until: None,
            priority: 0,
            project_id: Some(PROJECT),
            project_name: Some("Deep Work".to_string()),
            project_area_id: Some(AREA),
            area_name: Some("Focus".to_string()),
            created_at: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
                + chrono::Duration::seconds(seq),
        },
    )
}

/// All segments of a day view, flattened out of the slot items in
/// timeline order.
pub fn segments(view: &DayView) -> Vec<SegmentView> {
    view.items
        .iter()
        .filter_map(|item| match item {
            DayItem::Slot(slot) => Some(slot.segments.clone()),
            DayItem::Pause { .. } => None,
        })
        .flatten()
        .collect()
}

/// Segments belonging to one task, sorted by start minute.
pub fn task_segments(view: &DayView, task_id: DbId) -> Vec<SegmentView> {
    let mut found: Vec<SegmentView> = segments(view)
        .into_iter()
        .filter(|segment| segment.task_id == task_id)
        .collect();
    found.sort_by_key(|segment| segment.start_minute);
    found
}
