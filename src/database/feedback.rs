use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::feedback::AdminFeedback;
use uuid::Uuid;

impl PostgresRepository {
    pub async fn add_admin_feedback(&self, complaint_id: &Uuid, admin_id: &Uuid, feedback: &str) -> Result<AdminFeedback, AppError> {
        let entry = sqlx::query_as::<_, AdminFeedback>(
            r#"
            INSERT INTO admin_feedback (complaint_id, admin_id, feedback)
            VALUES ($1, $2, $3)
            RETURNING id, complaint_id, admin_id, feedback, created_at
            "#,
        )
        .bind(complaint_id)
        .bind(admin_id)
        .bind(feedback)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_feedback_for_complaint(&self, complaint_id: &Uuid) -> Result<Vec<AdminFeedback>, AppError> {
        let entries = sqlx::query_as::<_, AdminFeedback>(
            r#"
            SELECT id, complaint_id, admin_id, feedback, created_at
            FROM admin_feedback
            WHERE complaint_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
