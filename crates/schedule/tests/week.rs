//! Week orchestration: seven independent days, in order.

mod common;

use common::*;

#[tokio::test]
async fn week_view_covers_seven_days_from_the_week_start() {
    let store = store();
    let view = service(&store).week_view(USER, None, now()).await.unwrap();

    // Monday-first week containing Wednesday Mar 4.
    assert_eq!(view.start_date, march(2));
    assert_eq!(view.end_date, march(8));
    assert_eq!(view.timezone, "UTC");
    assert_eq!(view.days.len(), 7);
    for (offset, day) in view.days.iter().enumerate() {
        assert_eq!(day.date, march(2 + offset as u32));
    }
}

#[tokio::test]
async fn an_explicit_date_resolves_to_its_own_week() {
    let store = store();
    let view = service(&store)
        .week_view(USER, Some(march(12)), now())
        .await
        .unwrap();

    assert_eq!(view.start_date, march(9));
    assert_eq!(view.end_date, march(15));
}

#[tokio::test]
async fn days_are_planned_independently_with_no_cross_day_borrowing() {
    let store = store();
    // Identical availability Thursday and Friday; one task due Friday.
    store.insert_slot(area_slot(4, 540, 600));
    store.insert_slot(area_slot(5, 540, 600));
    let task_id = store.insert_task(task(march(6), 600, 30));

    let view = service(&store).week_view(USER, None, now()).await.unwrap();

    let thursday = &view.days[3];
    let friday = &view.days[4];
    assert_eq!(thursday.date, march(5));
    assert_eq!(friday.date, march(6));
    // Thursday's free capacity is never offered to Friday's task.
    assert!(task_segments(thursday, task_id).is_empty());
    let placed = task_segments(friday, task_id);
    assert_eq!(placed.len(), 1);
    assert_eq!((placed[0].start_minute, placed[0].end_minute), (540, 570));
}

#[tokio::test]
async fn week_reads_leave_every_future_day_clean() {
    let store = store();
    store.insert_slot(area_slot(4, 540, 600));
    store.insert_task(task(tomorrow(), 600, 30));

    service(&store).week_view(USER, None, now()).await.unwrap();

    // Today and future days were planned and cleared; past days in the
    // week keep their lazily created dirty flag.
    for day in 4..=8 {
        assert!(!store.day(USER, march(day)).unwrap().dirty);
    }
    for day in 2..=3 {
        assert!(store.day(USER, march(day)).unwrap().dirty);
    }
}
