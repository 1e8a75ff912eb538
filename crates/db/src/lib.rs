//! sqlx/Postgres persistence for the tempo scheduling engine.
//!
//! This crate owns the four scheduling tables (`timetable_slots`,
//! `timetable_slot_projects`, `schedule_days`, `schedule_entries`) and
//! provides read-only query surfaces over the task-service tables
//! (`tasks`, `projects`, `areas`, `users`) that live in the same database
//! but are migrated elsewhere.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod contention;
pub mod models;
pub mod repositories;

/// Embedded migrations for the scheduling tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connect a pool with sane defaults for request-driven planning work.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    tracing::info!("Connected to Postgres");
    Ok(pool)
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
