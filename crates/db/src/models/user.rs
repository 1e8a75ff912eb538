//! Read-only projection of user-service rows.

use sqlx::FromRow;

use tempo_core::clock::UserProfile;
use tempo_core::types::DbId;

/// Scheduling-relevant columns of a `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub id: DbId,
    pub timezone: Option<String>,
    pub first_day_of_week: Option<i32>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            timezone: row.timezone.unwrap_or_else(|| "UTC".to_string()),
            first_day_of_week: row.first_day_of_week.unwrap_or(0),
        }
    }
}
