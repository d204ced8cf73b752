//! Write side: one command per backend mutation. Each command validates its
//! payload locally (no round trip on bad input), runs the remote call, and on
//! success invalidates exactly the cache keys its mutation makes stale. On
//! failure nothing is invalidated and the error surfaces to the caller.

use crate::cache::{CacheKey, Operation, QueryState};
use crate::data::{Connection, DataLayer};
use crate::errors::AppError;
use crate::models::{
    ApplicationDraft, ApplicationStatus, CandidateProfileDraft, JobDraft, JobId, Principal,
    UserProfile, UserRole,
};

impl DataLayer {
    fn require_connection(&self) -> Result<Connection, AppError> {
        self.connection().ok_or(AppError::ConnectionNotReady)
    }

    /// Postings changed in any way invalidate the whole postings collection
    /// (plus every server-side filter result); the backend exposes no
    /// per-entity change identifiers to do better.
    fn invalidate_postings(&self) {
        self.cache.invalidate_operation(Operation::JobPostings);
        self.cache.invalidate_operation(Operation::FilteredJobPostings);
    }

    pub async fn create_job_posting(&self, draft: &JobDraft) -> Result<JobId, AppError> {
        let conn = self.require_connection()?;
        validate_job_draft(draft)?;
        let job_id = conn.service.create_job_posting(draft).await?;
        self.invalidate_postings();
        Ok(job_id)
    }

    pub async fn update_job_posting(
        &self,
        job_id: JobId,
        draft: &JobDraft,
    ) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        validate_job_draft(draft)?;
        conn.service.update_job_posting(job_id, draft).await?;
        self.invalidate_postings();
        Ok(())
    }

    pub async fn delete_job_posting(&self, job_id: JobId) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        conn.service.delete_job_posting(job_id).await?;
        self.invalidate_postings();
        Ok(())
    }

    /// Applying requires an existing candidate profile; without one the
    /// remote call is never attempted.
    pub async fn apply_to_job(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        match self.caller_candidate_profile().await {
            QueryState::Ready(Some(_)) => {}
            QueryState::Ready(None) => return Err(AppError::ProfileRequired),
            QueryState::Failed(err) => return Err(AppError::Backend(err.message)),
            QueryState::Pending => return Err(AppError::ConnectionNotReady),
        }
        conn.service.apply_to_job(job_id, draft).await?;
        self.cache.invalidate_operation(Operation::UserApplications);
        Ok(())
    }

    pub async fn update_application_status(
        &self,
        job_id: JobId,
        applicant: &Principal,
        new_status: ApplicationStatus,
    ) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        conn.service
            .update_application_status(job_id, applicant, new_status)
            .await?;
        self.cache.invalidate(&CacheKey::JobApplications(job_id));
        Ok(())
    }

    pub async fn save_candidate_profile(
        &self,
        draft: &CandidateProfileDraft,
    ) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        validate_candidate_draft(draft)?;
        conn.service.save_candidate_profile(draft).await?;
        self.cache.invalidate(&CacheKey::CallerCandidateProfile);
        self.cache.invalidate_operation(Operation::Candidates);
        Ok(())
    }

    pub async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        if profile.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        conn.service.save_caller_user_profile(profile).await?;
        self.cache.invalidate(&CacheKey::CallerUserProfile);
        Ok(())
    }

    pub async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), AppError> {
        let conn = self.require_connection()?;
        conn.service.assign_caller_user_role(user, role).await?;
        self.cache.invalidate(&CacheKey::UserProfile(user.clone()));
        self.cache.invalidate(&CacheKey::CallerUserRole);
        Ok(())
    }
}

fn validate_job_draft(draft: &JobDraft) -> Result<(), AppError> {
    for (field, value) in [
        ("title", &draft.title),
        ("description", &draft.description),
        ("company", &draft.company),
        ("location", &draft.location),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}

fn validate_candidate_draft(draft: &CandidateProfileDraft) -> Result<(), AppError> {
    for (field, value) in [
        ("firstName", &draft.first_name),
        ("lastName", &draft.last_name),
        ("email", &draft.email),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}
