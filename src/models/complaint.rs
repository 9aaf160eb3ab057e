use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Submitted,
    InReview,
    Resolved,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "complaint_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Infrastructure,
    Academics,
    Hostel,
    Harassment,
    Facilities,
    Administration,
    #[default]
    Other,
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplaintCategory::Infrastructure => "Infrastructure",
            ComplaintCategory::Academics => "Academics",
            ComplaintCategory::Hostel => "Hostel",
            ComplaintCategory::Harassment => "Harassment",
            ComplaintCategory::Facilities => "Facilities",
            ComplaintCategory::Administration => "Administration",
            ComplaintCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub location: String,
    pub status: ComplaintStatus,
    pub image_url: Option<String>,
    pub voice_note_url: Option<String>,
    pub feedback: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A complaint joined with the submitting student, for the admin board.
#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct ComplaintWithStudent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub complaint: Complaint,
    pub student_name: String,
    pub student_email: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct ComplaintRequest {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    pub category: ComplaintCategory,
    #[validate(length(min = 2, max = 200))]
    pub location: String,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub voice_note_url: Option<String>,
}

/// Admin triage update. All fields optional; absent fields keep their
/// current value.
#[derive(Deserialize, Debug, Validate)]
pub struct TriageRequest {
    pub status: Option<ComplaintStatus>,
    pub deadline: Option<NaiveDate>,
    #[validate(length(min = 3))]
    pub feedback: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub location: String,
    pub status: ComplaintStatus,
    pub image_url: Option<String>,
    pub voice_note_url: Option<String>,
    pub feedback: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a triage update. `complaint` is absent when resolving, since
/// resolved complaints are deleted.
#[derive(Serialize, Debug)]
pub struct TriageResponse {
    pub message: String,
    pub complaint: Option<ComplaintResponse>,
}

#[derive(Serialize, Debug, Default, sqlx::FromRow)]
pub struct ComplaintStats {
    pub total: i64,
    pub submitted: i64,
    pub in_review: i64,
    pub resolved: i64,
}

impl From<&Complaint> for ComplaintResponse {
    fn from(complaint: &Complaint) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            category: complaint.category,
            location: complaint.location.clone(),
            status: complaint.status,
            image_url: complaint.image_url.clone(),
            voice_note_url: complaint.voice_note_url.clone(),
            feedback: complaint.feedback.clone(),
            deadline: complaint.deadline,
            created_at: complaint.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ComplaintStatus::InReview).unwrap(), "\"in_review\"");
        assert_eq!(serde_json::from_str::<ComplaintStatus>("\"resolved\"").unwrap(), ComplaintStatus::Resolved);
    }

    #[test]
    fn complaint_request_validates_shape() {
        let request = ComplaintRequest {
            title: "Hmm".to_string(),
            description: "too short".to_string(),
            category: ComplaintCategory::Hostel,
            location: "B".to_string(),
            image_url: Some("not a url".to_string()),
            voice_note_url: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("image_url"));
    }

    #[test]
    fn valid_complaint_request_passes() {
        let request = ComplaintRequest {
            title: "Broken ceiling fan in room 204".to_string(),
            description: "The ceiling fan has been broken for two weeks despite reminders.".to_string(),
            category: ComplaintCategory::Hostel,
            location: "Block C, room 204".to_string(),
            image_url: Some("https://storage.example.com/complaints/fan.jpg".to_string()),
            voice_note_url: None,
        };
        assert!(request.validate().is_ok());
    }
}
