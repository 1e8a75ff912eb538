//! Classify driver errors into the engine's error taxonomy.
//!
//! The retry wrapper is backend-agnostic: it only looks at
//! [`CoreError::is_contention`]. Knowledge of which Postgres SQLSTATEs are
//! transient lives here and nowhere else.

use tempo_core::error::CoreError;

/// SQLSTATEs that signal transient lock contention worth retrying:
/// serialization_failure, deadlock_detected, lock_not_available.
const CONTENTION_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

/// Whether a driver error is a transient contention signal.
pub fn is_transient_contention(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| CONTENTION_SQLSTATES.contains(&code.as_ref())),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}

/// Map a driver error into the engine taxonomy.
pub fn map_sqlx_err(err: sqlx::Error) -> CoreError {
    if is_transient_contention(&err) {
        CoreError::Contention(err.to_string())
    } else {
        CoreError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_counts_as_contention() {
        assert!(is_transient_contention(&sqlx::Error::PoolTimedOut));
        assert!(map_sqlx_err(sqlx::Error::PoolTimedOut).is_contention());
    }

    #[test]
    fn row_not_found_is_not_contention() {
        assert!(!is_transient_contention(&sqlx::Error::RowNotFound));
        assert!(!map_sqlx_err(sqlx::Error::RowNotFound).is_contention());
    }
}
