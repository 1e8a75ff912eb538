//! Read-only repository over the task-service's `tasks` table.

use sqlx::PgPool;

use tempo_core::tasks::SCHEDULING_EXCLUDED_STATUSES;
use tempo_core::types::DbId;

use crate::models::task::SchedulableTaskRow;

/// Planner reads over tasks. Excludes finished lifecycles, sub-tasks, and
/// recurrence templates (instances generated from a recurring parent stay
/// in).
pub struct TaskRepo;

impl TaskRepo {
    pub async fn schedulable(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SchedulableTaskRow>, sqlx::Error> {
        let excluded: Vec<String> = SCHEDULING_EXCLUDED_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect();
        sqlx::query_as::<_, SchedulableTaskRow>(
            "SELECT t.id, t.name, t.uid, t.due_date, t.due_time_minutes, \
                    t.estimated_duration_minutes, t.defer_until, \
                    COALESCE(t.priority, 0) AS priority, t.project_id, t.created_at, \
                    p.name AS project_name, p.area_id AS project_area_id, \
                    a.name AS area_name \
             FROM tasks t \
             LEFT JOIN projects p ON p.id = t.project_id \
             LEFT JOIN areas a ON a.id = p.area_id \
             WHERE t.user_id = $1 \
               AND t.status <> ALL($2) \
               AND t.parent_task_id IS NULL \
               AND (   (COALESCE(t.recurrence_type, 'none') = 'none' \
                        AND t.recurring_parent_id IS NULL) \
                    OR t.recurring_parent_id IS NOT NULL) \
             ORDER BY t.due_date ASC, priority DESC, t.created_at ASC",
        )
        .bind(user_id)
        .bind(&excluded)
        .fetch_all(pool)
        .await
    }
}
