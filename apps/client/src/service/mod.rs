//! The single seam between this client and the job-marketplace backend.
//!
//! ARCHITECTURAL RULE: no other module may talk to the backend directly.
//! Every read goes through the cache layer on top of this trait; every write
//! goes through a command that invalidates its declared cache keys.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Application, ApplicationDraft, ApplicationStatus, CandidateProfile, CandidateProfileDraft,
    CompiledCv, FilterCriteria, JobDraft, JobId, JobPosting, Principal, UserProfile, UserRole,
};

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpConnector;

/// Backend call failure. Domain rejections are their own variants so callers
/// dispatch on structure instead of matching message substrings.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("duplicate application")]
    DuplicateApplication,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("backend rejected the call (status {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Coarse classification carried into the cache, which needs a `Clone`-able
/// record of why a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    DuplicateApplication,
    NotFound,
    Unauthorized,
    Rejected,
    Transient,
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::DuplicateApplication => ServiceErrorKind::DuplicateApplication,
            ServiceError::NotFound(_) => ServiceErrorKind::NotFound,
            ServiceError::Unauthorized => ServiceErrorKind::Unauthorized,
            // A 5xx means the backend (or something in front of it) broke,
            // not that it rejected the call.
            ServiceError::Api { status, .. } if *status >= 500 => ServiceErrorKind::Transient,
            ServiceError::Api { .. } => ServiceErrorKind::Rejected,
            ServiceError::Http(_) | ServiceError::Parse(_) => ServiceErrorKind::Transient,
        }
    }
}

/// Builds an identity-bound [`RemoteService`] handle at login time. Carried
/// in `AppState` as `Arc<dyn ServiceConnector>` so tests can swap in an
/// in-memory backend.
pub trait ServiceConnector: Send + Sync {
    fn connect(&self, identity: &Principal) -> std::sync::Arc<dyn RemoteService>;
}

/// One async operation per backend capability. Implementations are bound to
/// a caller identity at construction; "caller" operations act as that
/// identity.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn get_job_postings(&self) -> Result<Vec<JobPosting>, ServiceError>;

    async fn get_filtered_job_postings(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<JobPosting>, ServiceError>;

    async fn create_job_posting(&self, draft: &JobDraft) -> Result<JobId, ServiceError>;

    async fn update_job_posting(&self, job_id: JobId, draft: &JobDraft)
        -> Result<(), ServiceError>;

    /// Soft delete: the backend flips `isActive` to false; the record stays.
    async fn delete_job_posting(&self, job_id: JobId) -> Result<(), ServiceError>;

    async fn apply_to_job(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<(), ServiceError>;

    async fn get_job_applications(&self, job_id: JobId) -> Result<Vec<Application>, ServiceError>;

    async fn get_user_applications(
        &self,
        user: &Principal,
    ) -> Result<Vec<Application>, ServiceError>;

    async fn update_application_status(
        &self,
        job_id: JobId,
        applicant: &Principal,
        new_status: ApplicationStatus,
    ) -> Result<(), ServiceError>;

    async fn get_caller_candidate_profile(
        &self,
    ) -> Result<Option<CandidateProfile>, ServiceError>;

    async fn get_candidate_profile(
        &self,
        user: &Principal,
    ) -> Result<Option<CandidateProfile>, ServiceError>;

    async fn save_candidate_profile(
        &self,
        draft: &CandidateProfileDraft,
    ) -> Result<(), ServiceError>;

    async fn filter_candidates(
        &self,
        skills: &[String],
        min_experience: u64,
    ) -> Result<Vec<CandidateProfile>, ServiceError>;

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, ServiceError>;

    async fn get_user_profile(&self, user: &Principal)
        -> Result<Option<UserProfile>, ServiceError>;

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), ServiceError>;

    async fn get_caller_user_role(&self) -> Result<UserRole, ServiceError>;

    async fn is_caller_admin(&self) -> Result<bool, ServiceError>;

    /// Admin-gated server-side; non-admin callers get `Unauthorized`.
    async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), ServiceError>;

    /// Compiled CV view: the caller's profile aggregated with its section
    /// lists into one document.
    async fn cv_find(&self) -> Result<CompiledCv, ServiceError>;
}
