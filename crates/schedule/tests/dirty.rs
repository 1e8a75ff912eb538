//! Dirty-day propagation from task lifecycle events.

mod common;

use std::sync::Arc;

use common::*;
use tempo_core::tasks::TaskSnapshot;
use tempo_schedule::dirty::DirtyTracker;
use tempo_schedule::memory::MemoryStore;
use tempo_schedule::store::ScheduleStore;

fn tracker(store: &Arc<MemoryStore>) -> DirtyTracker<MemoryStore> {
    DirtyTracker::new(Arc::clone(store))
}

fn schedulable(due_day: u32) -> TaskSnapshot {
    TaskSnapshot {
        due_date: Some(march(due_day)),
        due_time_minutes: Some(600),
        estimated_duration_minutes: Some(30),
        project_id: Some(PROJECT),
    }
}

#[tokio::test]
async fn creating_a_schedulable_task_marks_its_due_date() {
    let store = store();
    tracker(&store)
        .task_created(USER, &schedulable(5), now())
        .await
        .unwrap();

    let day = store.day(USER, march(5)).unwrap();
    assert!(day.dirty);
    assert_eq!(day.dirty_reason.as_deref(), Some("task_created"));
}

#[tokio::test]
async fn tasks_outside_the_horizon_mark_nothing() {
    let store = store();
    let tracker = tracker(&store);
    // Mar 9 is the Monday after the current Mar 2 – Mar 8 week.
    tracker
        .task_created(USER, &schedulable(9), now())
        .await
        .unwrap();
    // Yesterday is behind the horizon.
    tracker
        .task_created(USER, &schedulable(3), now())
        .await
        .unwrap();

    assert!(store.day(USER, march(9)).is_none());
    assert!(store.day(USER, march(3)).is_none());
}

#[tokio::test]
async fn unschedulable_tasks_mark_nothing() {
    let store = store();
    let mut snapshot = schedulable(5);
    snapshot.estimated_duration_minutes = None;
    tracker(&store)
        .task_created(USER, &snapshot, now())
        .await
        .unwrap();

    assert!(store.day(USER, march(5)).is_none());
}

#[tokio::test]
async fn moving_a_due_date_marks_both_days() {
    let store = store();
    tracker(&store)
        .task_updated(USER, &schedulable(5), &schedulable(6), now())
        .await
        .unwrap();

    let old_day = store.day(USER, march(5)).unwrap();
    let new_day = store.day(USER, march(6)).unwrap();
    assert!(old_day.dirty);
    assert_eq!(old_day.dirty_reason.as_deref(), Some("due_date_changed"));
    assert!(new_day.dirty);
    assert_eq!(new_day.dirty_reason.as_deref(), Some("due_date_changed"));
}

#[tokio::test]
async fn moving_a_due_date_out_of_horizon_marks_only_the_old_day() {
    let store = store();
    tracker(&store)
        .task_updated(USER, &schedulable(5), &schedulable(12), now())
        .await
        .unwrap();

    assert!(store.day(USER, march(5)).unwrap().dirty);
    assert!(store.day(USER, march(12)).is_none());
}

#[tokio::test]
async fn duration_change_marks_the_unchanged_due_date() {
    let store = store();
    let mut changed = schedulable(5);
    changed.estimated_duration_minutes = Some(90);
    tracker(&store)
        .task_updated(USER, &schedulable(5), &changed, now())
        .await
        .unwrap();

    let day = store.day(USER, march(5)).unwrap();
    assert!(day.dirty);
    assert_eq!(day.dirty_reason.as_deref(), Some("task_updated"));
}

#[tokio::test]
async fn project_change_marks_the_due_date() {
    let store = store();
    let mut changed = schedulable(5);
    changed.project_id = Some(PROJECT + 1);
    tracker(&store)
        .task_updated(USER, &schedulable(5), &changed, now())
        .await
        .unwrap();

    assert!(store.day(USER, march(5)).unwrap().dirty);
}

#[tokio::test]
async fn irrelevant_edits_mark_nothing() {
    let store = store();
    tracker(&store)
        .task_updated(USER, &schedulable(5), &schedulable(5), now())
        .await
        .unwrap();

    assert!(store.day(USER, march(5)).is_none());
}

#[tokio::test]
async fn completion_marks_future_entry_dates() {
    let store = store();
    let slot_id = store.insert_slot(area_slot(4, 540, 600));
    let task_id = store.insert_task(task(tomorrow(), 600, 30));
    store.seed_entry(USER, tomorrow(), 540, 570, task_id, slot_id, false, false);

    tracker(&store)
        .task_completed(USER, task_id, now())
        .await
        .unwrap();

    let day = store.day(USER, tomorrow()).unwrap();
    assert!(day.dirty);
    assert_eq!(day.dirty_reason.as_deref(), Some("task_completed"));
}

#[tokio::test]
async fn completion_ignores_todays_entries_already_past_the_cutoff() {
    let store = store();
    let slot_id = store.insert_slot(area_slot(3, 0, 120));
    let task_id = store.insert_task(task(today(), 120, 30));
    // Started at minute 0, long before the 10:00 cutoff.
    store.seed_entry(USER, today(), 0, 30, task_id, slot_id, false, false);

    // The day exists and is clean, as after a morning replan.
    store
        .find_or_create_day(USER, today(), &Default::default())
        .await
        .unwrap();
    store.mark_day_clean(USER, today()).await.unwrap();

    tracker(&store)
        .task_completed(USER, task_id, now())
        .await
        .unwrap();

    assert!(!store.day(USER, today()).unwrap().dirty);
}

#[tokio::test]
async fn completion_marks_todays_entries_after_the_cutoff() {
    let store = store();
    let slot_id = store.insert_slot(area_slot(3, 600, 720));
    let task_id = store.insert_task(task(today(), 720, 30));
    // Starts at 11:00, after the 10:00 cutoff.
    store.seed_entry(USER, today(), 660, 690, task_id, slot_id, false, false);

    tracker(&store)
        .task_completed(USER, task_id, now())
        .await
        .unwrap();

    assert!(store.day(USER, today()).unwrap().dirty);
}

#[tokio::test]
async fn flag_changes_mark_the_entrys_date_with_the_flag_reason() {
    let store = store();
    let slot_id = store.insert_slot(area_slot(4, 540, 600));
    let task_id = store.insert_task(task(tomorrow(), 600, 30));
    let entry_id = store.seed_entry(USER, tomorrow(), 540, 570, task_id, slot_id, false, false);
    let entry = store.entry(USER, entry_id).await.unwrap().unwrap();

    let tracker = tracker(&store);
    tracker
        .entry_flags_changed(USER, &entry, true)
        .await
        .unwrap();
    assert_eq!(
        store.day(USER, tomorrow()).unwrap().dirty_reason.as_deref(),
        Some("pin_changed")
    );

    tracker
        .entry_flags_changed(USER, &entry, false)
        .await
        .unwrap();
    assert_eq!(
        store.day(USER, tomorrow()).unwrap().dirty_reason.as_deref(),
        Some("lock_changed")
    );
}
