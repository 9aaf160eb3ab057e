use chrono::{DateTime, Utc};
use rocket::serde::Serialize;
use uuid::Uuid;

/// One feedback entry left by an administrator on a complaint.
#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct AdminFeedback {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub admin_id: Uuid,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminFeedback> for FeedbackResponse {
    fn from(entry: &AdminFeedback) -> Self {
        Self {
            id: entry.id,
            feedback: entry.feedback.clone(),
            created_at: entry.created_at,
        }
    }
}
