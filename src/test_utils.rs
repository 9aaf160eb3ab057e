use crate::database::complaint::ComplaintRepository;
use crate::error::app_error::AppError;
use crate::models::complaint::{
    Complaint, ComplaintCategory, ComplaintRequest, ComplaintStats, ComplaintStatus, ComplaintWithStudent, TriageRequest,
};
use chrono::Utc;
use uuid::Uuid;

impl From<&ComplaintRequest> for Complaint {
    fn from(request: &ComplaintRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category,
            location: request.location.clone(),
            status: ComplaintStatus::default(),
            image_url: request.image_url.clone(),
            voice_note_url: request.voice_note_url.clone(),
            feedback: None,
            deadline: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

pub fn sample_complaint() -> Complaint {
    Complaint {
        id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        title: "Leaking tap in the chemistry lab".to_string(),
        description: "The corner tap has been leaking since Monday and the floor stays wet.".to_string(),
        category: ComplaintCategory::Infrastructure,
        location: "Science block, lab 3".to_string(),
        status: ComplaintStatus::Submitted,
        image_url: None,
        voice_note_url: None,
        feedback: None,
        deadline: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_request() -> ComplaintRequest {
    ComplaintRequest {
        title: "Leaking tap in the chemistry lab".to_string(),
        description: "The corner tap has been leaking since Monday and the floor stays wet.".to_string(),
        category: ComplaintCategory::Infrastructure,
        location: "Science block, lab 3".to_string(),
        image_url: None,
        voice_note_url: None,
    }
}

pub struct MockRepository {}

#[async_trait::async_trait]
impl ComplaintRepository for MockRepository {
    async fn create_complaint(&self, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError> {
        let mut complaint: Complaint = request.into();
        complaint.student_id = *student_id;
        Ok(complaint)
    }

    async fn get_complaint_by_id(&self, id: &Uuid) -> Result<Option<Complaint>, AppError> {
        Ok(Some(Complaint {
            id: *id,
            ..sample_complaint()
        }))
    }

    async fn list_complaints_for_student(&self, student_id: &Uuid) -> Result<Vec<Complaint>, AppError> {
        Ok(vec![Complaint {
            student_id: *student_id,
            ..sample_complaint()
        }])
    }

    async fn list_all_complaints(&self) -> Result<Vec<ComplaintWithStudent>, AppError> {
        Ok(vec![ComplaintWithStudent {
            complaint: sample_complaint(),
            student_name: "Asha Rao".to_string(),
            student_email: "asha@college.edu".to_string(),
        }])
    }

    async fn resubmit_complaint(&self, id: &Uuid, student_id: &Uuid, request: &ComplaintRequest) -> Result<Complaint, AppError> {
        let mut complaint: Complaint = request.into();
        complaint.id = *id;
        complaint.student_id = *student_id;
        Ok(complaint)
    }

    async fn triage_complaint(&self, id: &Uuid, request: &TriageRequest) -> Result<Complaint, AppError> {
        let mut complaint = Complaint {
            id: *id,
            ..sample_complaint()
        };
        if let Some(status) = request.status {
            complaint.status = status;
        }
        if let Some(deadline) = request.deadline {
            complaint.deadline = Some(deadline);
        }
        Ok(complaint)
    }

    async fn set_complaint_feedback(&self, _id: &Uuid, _feedback: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn delete_complaint(&self, _id: &Uuid) -> Result<(), AppError> {
        Ok(())
    }

    async fn complaint_stats(&self) -> Result<ComplaintStats, AppError> {
        Ok(ComplaintStats {
            total: 1,
            submitted: 1,
            in_review: 0,
            resolved: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn submit<R: ComplaintRepository>(repo: &R, student_id: &Uuid) -> Complaint {
        repo.create_complaint(student_id, &sample_request()).await.unwrap()
    }

    #[tokio::test]
    async fn mock_repository_round_trips_a_submission() {
        let repo = MockRepository {};
        let student_id = Uuid::new_v4();

        let complaint = submit(&repo, &student_id).await;
        assert_eq!(complaint.student_id, student_id);
        assert_eq!(complaint.status, ComplaintStatus::Submitted);
        assert_eq!(complaint.title, sample_request().title);
    }

    #[tokio::test]
    async fn mock_repository_applies_partial_triage() {
        let repo = MockRepository {};
        let id = Uuid::new_v4();
        let deadline = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();

        let request = TriageRequest {
            status: Some(ComplaintStatus::InReview),
            deadline: Some(deadline),
            feedback: None,
        };
        let complaint = repo.triage_complaint(&id, &request).await.unwrap();
        assert_eq!(complaint.status, ComplaintStatus::InReview);
        assert_eq!(complaint.deadline, Some(deadline));

        let untouched = TriageRequest {
            status: None,
            deadline: None,
            feedback: None,
        };
        let complaint = repo.triage_complaint(&id, &untouched).await.unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Submitted);
        assert_eq!(complaint.deadline, None);
    }
}
