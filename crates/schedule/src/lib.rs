//! Orchestration layer of the tempo scheduling engine.
//!
//! Wires the pure planner from `tempo-core` to storage through capability
//! traits: the dirty-day tracker flags stale (user, date) pairs on task
//! lifecycle events, and the schedule service replans them on read, under
//! a bounded retry against transient storage contention.
//!
//! Two store implementations ship here: [`pg::PgStore`] over the
//! `tempo-db` repositories for production, and [`memory::MemoryStore`]
//! for tests and embedded callers.

pub mod dirty;
pub mod memory;
pub mod pg;
pub mod retry;
pub mod service;
pub mod store;
