//! Read-only repository over the user-service's `users` table.

use sqlx::PgPool;

use tempo_core::types::DbId;

use crate::models::user::UserProfileRow;

/// Profile reads: timezone and first day of week.
pub struct UserRepo;

impl UserRepo {
    pub async fn profile(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, UserProfileRow>(
            "SELECT id, timezone, first_day_of_week FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
