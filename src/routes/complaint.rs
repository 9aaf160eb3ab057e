use crate::auth::{AdminUser, CurrentUser};
use crate::database::complaint::ComplaintRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::audit::audit_events;
use crate::models::complaint::{
    ComplaintRequest, ComplaintResponse, ComplaintStats, ComplaintStatus, ComplaintWithStudent, TriageRequest, TriageResponse,
};
use crate::models::feedback::FeedbackResponse;
use crate::service::email::EmailService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn create_complaint(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: Json<ComplaintRequest>,
) -> Result<(Status, Json<ComplaintResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let complaint = repo.create_complaint(&current_user.id, &payload).await?;

    Ok((Status::Created, Json(ComplaintResponse::from(&complaint))))
}

#[rocket::get("/")]
pub async fn list_own_complaints(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<Vec<ComplaintResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let complaints = repo.list_complaints_for_student(&current_user.id).await?;
    let responses: Vec<ComplaintResponse> = complaints.iter().map(ComplaintResponse::from).collect();

    Ok(Json(responses))
}

#[rocket::get("/all")]
pub async fn list_all_complaints(pool: &State<PgPool>, _admin: AdminUser) -> Result<Json<Vec<ComplaintWithStudent>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let complaints = repo.list_all_complaints().await?;

    Ok(Json(complaints))
}

#[rocket::get("/stats")]
pub async fn get_complaint_stats(pool: &State<PgPool>, _admin: AdminUser) -> Result<Json<ComplaintStats>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let stats = repo.complaint_stats().await?;

    Ok(Json(stats))
}

#[rocket::get("/<id>")]
pub async fn get_complaint(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Json<ComplaintResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid complaint id", e))?;

    let complaint = fetch_authorized(&repo, &uuid, &current_user).await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// Resubmit an unresolved complaint: the owning student edits the fields
/// and the complaint returns to the `submitted` state.
#[rocket::put("/<id>", data = "<payload>")]
pub async fn put_complaint(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<ComplaintRequest>,
) -> Result<Json<ComplaintResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid complaint id", e))?;
    let complaint = repo.resubmit_complaint(&uuid, &current_user.id, &payload).await?;

    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// Admin triage: update status and deadline, leave feedback for the
/// student. Resolving a complaint emails the student and removes the
/// complaint from the board.
#[rocket::patch("/<id>", data = "<payload>")]
pub async fn patch_complaint(
    pool: &State<PgPool>,
    email: &State<EmailService>,
    admin: AdminUser,
    id: &str,
    payload: Json<TriageRequest>,
) -> Result<Json<TriageResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid complaint id", e))?;

    if payload.status == Some(ComplaintStatus::Resolved) {
        let complaint = repo
            .get_complaint_by_id(&uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

        // Resolution email is best-effort; the complaint is removed either way.
        if let Some(student) = repo.get_user_by_id(&complaint.student_id).await? {
            if let Err(err) = email
                .send_resolution_email(&student.email, &student.full_name, &complaint.title, complaint.category)
                .await
            {
                tracing::warn!(error = %err, complaint_id = %complaint.id, "failed to send resolution email");
            }
        }

        repo.delete_complaint(&uuid).await?;
        let _ = repo
            .create_security_audit_log(
                Some(&admin.0.id),
                audit_events::COMPLAINT_RESOLVED,
                true,
                None,
                None,
                Some(serde_json::json!({ "complaint_id": complaint.id, "category": complaint.category })),
            )
            .await;

        return Ok(Json(TriageResponse {
            message: "Complaint marked as resolved and removed".to_string(),
            complaint: None,
        }));
    }

    let mut updated = repo.triage_complaint(&uuid, &payload).await?;

    if let Some(feedback) = payload.feedback.as_deref() {
        repo.add_admin_feedback(&uuid, &admin.0.id, feedback).await?;
        // Mirrored onto the complaint row so students see it without an
        // extra lookup.
        repo.set_complaint_feedback(&uuid, feedback).await?;
        updated.feedback = Some(feedback.to_string());
    }

    Ok(Json(TriageResponse {
        message: "Complaint updated successfully".to_string(),
        complaint: Some(ComplaintResponse::from(&updated)),
    }))
}

#[rocket::get("/<id>/feedback")]
pub async fn list_complaint_feedback(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid complaint id", e))?;

    fetch_authorized(&repo, &uuid, &current_user).await?;

    let entries = repo.list_feedback_for_complaint(&uuid).await?;
    let responses: Vec<FeedbackResponse> = entries.iter().map(FeedbackResponse::from).collect();

    Ok(Json(responses))
}

/// Fetch a complaint the user is allowed to see: the owning student or an
/// admin. Anyone else gets the same 404 as a missing complaint.
async fn fetch_authorized(
    repo: &PostgresRepository,
    id: &Uuid,
    current_user: &CurrentUser,
) -> Result<crate::models::complaint::Complaint, AppError> {
    let complaint = repo
        .get_complaint_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    if complaint.student_id != current_user.id && !repo.user_has_role(&current_user.id, "admin").await? {
        return Err(AppError::NotFound("Complaint not found".to_string()));
    }

    Ok(complaint)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        create_complaint,
        list_own_complaints,
        list_all_complaints,
        get_complaint_stats,
        get_complaint,
        put_complaint,
        patch_complaint,
        list_complaint_feedback
    ]
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_get_complaint_hides_other_students_complaints() {
        // Requires a running PostgreSQL at DATABASE_URL
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_resolving_deletes_the_complaint() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
