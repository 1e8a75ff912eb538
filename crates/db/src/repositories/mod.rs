//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return `sqlx::Error`;
//! classification into the engine taxonomy happens in the store adapter.

pub mod schedule_day_repo;
pub mod schedule_entry_repo;
pub mod task_repo;
pub mod timetable_slot_repo;
pub mod user_repo;

pub use schedule_day_repo::ScheduleDayRepo;
pub use schedule_entry_repo::ScheduleEntryRepo;
pub use task_repo::TaskRepo;
pub use timetable_slot_repo::TimetableSlotRepo;
pub use user_repo::UserRepo;
