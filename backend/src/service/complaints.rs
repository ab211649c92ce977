use futures_util::TryStreamExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::{Complaint, NewComplaint, parse_id};
use crate::db::repo::Store;
use crate::error::AppError;
use crate::service::users::UserService;

#[derive(Clone)]
pub struct ComplaintService {
    store: Store,
    users: UserService,
}

impl ComplaintService {
    pub fn new(store: Store, users: UserService) -> Self {
        Self { store, users }
    }

    /// Persists the complaint, then appends it to the owner's list. The
    /// second step is best-effort: its failure is logged and the created
    /// complaint is returned anyway.
    pub async fn submit(&self, new_complaint: NewComplaint) -> Result<Complaint, AppError> {
        let complaint = Complaint {
            id: Uuid::new_v4(),
            title: new_complaint.title,
            summary: new_complaint.summary,
            rating: new_complaint.rating,
            resolved: false,
            user_id: new_complaint.user_id,
        };

        self.store.insert_complaint(&complaint).await?;
        info!("Complaint {} submitted by user {}", complaint.id, complaint.user_id);

        if let Err(err) = self
            .users
            .append_complaint(complaint.user_id, complaint.id)
            .await
        {
            warn!(
                "Skipped back-reference of complaint {} on user {}: {err}",
                complaint.id, complaint.user_id
            );
        }

        Ok(complaint)
    }

    pub async fn list_for_user(&self, secret_code: &str) -> Result<Vec<Complaint>, AppError> {
        let user = self.users.login(secret_code).await?;

        let complaints: Vec<Complaint> = self
            .store
            .find_complaints_by_user(user.id)
            .try_collect()
            .await?;

        Ok(complaints)
    }

    pub async fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        let complaints: Vec<Complaint> = self.store.find_all_complaints().try_collect().await?;
        Ok(complaints)
    }

    pub async fn view(&self, complaint_id: &str) -> Result<Complaint, AppError> {
        let id = parse_id(complaint_id)?;

        self.store
            .find_complaint(id)
            .await?
            .ok_or(AppError::NotFound("Complaint"))
    }

    /// Flips `resolved` to true. The returned record is the in-memory copy,
    /// not a re-read of what was stored.
    pub async fn resolve(&self, complaint_id: &str) -> Result<Complaint, AppError> {
        let mut complaint = self.view(complaint_id).await?;
        complaint.resolved = true;

        self.store
            .set_complaint_resolved(complaint.id, complaint.resolved)
            .await?;
        info!("Complaint {} resolved", complaint.id);

        Ok(complaint)
    }
}
