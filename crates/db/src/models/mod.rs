//! Row structs and DTOs for the scheduling tables.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, conversions into the domain records consumed by the planner, and
//! (for user-managed rows) `Deserialize` create/update DTOs.

pub mod schedule_day;
pub mod schedule_entry;
pub mod task;
pub mod timetable_slot;
pub mod user;
