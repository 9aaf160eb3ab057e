use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::complaint::{Complaint, ComplaintRequest, ComplaintStats, ComplaintWithStudent, TriageRequest};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ComplaintRepository {
    async fn create_complaint(&self, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError>;
    async fn get_complaint_by_id(&self, id: &Uuid) -> Result<Option<Complaint>, AppError>;
    async fn list_complaints_for_student(&self, student_id: &Uuid) -> Result<Vec<Complaint>, AppError>;
    async fn list_all_complaints(&self) -> Result<Vec<ComplaintWithStudent>, AppError>;
    /// Overwrite an unresolved complaint's submission fields and put it back
    /// into the `submitted` state. Only the owning student may resubmit.
    async fn resubmit_complaint(&self, id: &Uuid, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError>;
    /// Apply an admin triage update. Absent fields keep their current value.
    async fn triage_complaint(&self, id: &Uuid, request: &TriageRequest) -> Result<Complaint, AppError>;
    async fn set_complaint_feedback(&self, id: &Uuid, feedback: &str) -> Result<(), AppError>;
    async fn delete_complaint(&self, id: &Uuid) -> Result<(), AppError>;
    async fn complaint_stats(&self) -> Result<ComplaintStats, AppError>;
}

#[async_trait]
impl ComplaintRepository for PostgresRepository {
    async fn create_complaint(&self, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (student_id, title, description, category, location, image_url, voice_note_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.category)
        .bind(&request.location)
        .bind(&request.image_url)
        .bind(&request.voice_note_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(complaint)
    }

    async fn get_complaint_by_id(&self, id: &Uuid) -> Result<Option<Complaint>, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(complaint)
    }

    async fn list_complaints_for_student(&self, student_id: &Uuid) -> Result<Vec<Complaint>, AppError> {
        let complaints = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    async fn list_all_complaints(&self) -> Result<Vec<ComplaintWithStudent>, AppError> {
        let complaints = sqlx::query_as::<_, ComplaintWithStudent>(
            r#"
            SELECT c.*, u.full_name AS student_name, u.email AS student_email
            FROM complaints c
            JOIN users u ON u.id = c.student_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    async fn resubmit_complaint(&self, id: &Uuid, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET title = $3,
                description = $4,
                category = $5,
                location = $6,
                image_url = $7,
                voice_note_url = $8,
                status = 'submitted',
                updated_at = now()
            WHERE id = $1
              AND student_id = $2
              AND status <> 'resolved'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(student_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.category)
        .bind(&request.location)
        .bind(&request.image_url)
        .bind(&request.voice_note_url)
        .fetch_optional(&self.pool)
        .await?;

        complaint.ok_or_else(|| AppError::NotFound("Complaint not found or already resolved".to_string()))
    }

    async fn triage_complaint(&self, id: &Uuid, request: &TriageRequest) -> Result<Complaint, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET status = COALESCE($2, status),
                deadline = COALESCE($3, deadline),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.status)
        .bind(request.deadline)
        .fetch_optional(&self.pool)
        .await?;

        complaint.ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))
    }

    async fn set_complaint_feedback(&self, id: &Uuid, feedback: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE complaints SET feedback = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(feedback)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_complaint(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn complaint_stats(&self) -> Result<ComplaintStats, AppError> {
        let stats = sqlx::query_as::<_, ComplaintStats>(
            r#"
            SELECT count(*) AS total,
                   count(*) FILTER (WHERE status = 'submitted') AS submitted,
                   count(*) FILTER (WHERE status = 'in_review') AS in_review,
                   count(*) FILTER (WHERE status = 'resolved') AS resolved
            FROM complaints
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_create_complaint_defaults_to_submitted() {
        // Requires a running PostgreSQL at DATABASE_URL
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_resubmit_rejects_resolved_complaints() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
