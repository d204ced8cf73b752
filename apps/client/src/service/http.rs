//! HTTP implementation of [`RemoteService`].
//!
//! Every backend capability is exposed as `POST {base}/api/v1/call/{method}`
//! taking a JSON argument object and returning the result JSON. Failures
//! carry a machine-readable error envelope `{"error": {"code", "message"}}`;
//! the `code` field — not the prose message — selects the structured
//! [`ServiceError`] kind.
//!
//! No automatic retry: a failed call surfaces immediately. Queries store the
//! failure in the cache; commands report it to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::{
    Application, ApplicationDraft, ApplicationStatus, CandidateProfile, CandidateProfileDraft,
    CompiledCv, FilterCriteria, JobDraft, JobId, JobPosting, Principal, UserProfile, UserRole,
};
use crate::service::{RemoteService, ServiceConnector, ServiceError};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the authenticated caller identity on every call.
const IDENTITY_HEADER: &str = "x-identity";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Identity-bound HTTP handle to the backend.
pub struct HttpRemoteService {
    client: Client,
    base_url: String,
    identity: Principal,
}

impl HttpRemoteService {
    pub fn new(client: Client, base_url: impl Into<String>, identity: Principal) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            identity,
        }
    }

    /// Issues one backend call and decodes the result. All trait methods
    /// funnel through here so transport and error handling live in one place.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &impl Serialize,
    ) -> Result<T, ServiceError> {
        let url = format!("{}/api/v1/call/{method}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(IDENTITY_HEADER, self.identity.as_str())
            .json(args)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => classify(status.as_u16(), envelope.error),
                Err(_) => ServiceError::Api {
                    status: status.as_u16(),
                    code: "UNKNOWN".to_string(),
                    message: body,
                },
            };
            warn!("backend call {method} failed: {err}");
            return Err(err);
        }

        debug!("backend call {method} ok");
        let value = response.json::<T>().await?;
        Ok(value)
    }
}

/// Maps the backend's error code to a structured kind. Unknown codes stay in
/// the generic `Api` variant with their status and message intact.
fn classify(status: u16, body: ErrorBody) -> ServiceError {
    match body.code.as_str() {
        "DUPLICATE_APPLICATION" => ServiceError::DuplicateApplication,
        "NOT_FOUND" => ServiceError::NotFound(body.message),
        "UNAUTHORIZED" => ServiceError::Unauthorized,
        _ => ServiceError::Api {
            status,
            code: body.code,
            message: body.message,
        },
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn get_job_postings(&self) -> Result<Vec<JobPosting>, ServiceError> {
        self.call("getJobPostings", &json!({})).await
    }

    async fn get_filtered_job_postings(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<JobPosting>, ServiceError> {
        self.call("getFilteredJobPostings", &json!({ "criteria": criteria }))
            .await
    }

    async fn create_job_posting(&self, draft: &JobDraft) -> Result<JobId, ServiceError> {
        self.call("createJobPosting", draft).await
    }

    async fn update_job_posting(
        &self,
        job_id: JobId,
        draft: &JobDraft,
    ) -> Result<(), ServiceError> {
        self.call(
            "updateJobPosting",
            &json!({ "jobId": job_id, "posting": draft }),
        )
        .await
    }

    async fn delete_job_posting(&self, job_id: JobId) -> Result<(), ServiceError> {
        self.call("deleteJobPosting", &json!({ "jobId": job_id })).await
    }

    async fn apply_to_job(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<(), ServiceError> {
        self.call(
            "applyToJob",
            &json!({
                "jobId": job_id,
                "expectedSalary": draft.expected_salary,
                "coverLetter": draft.cover_letter,
                "resume": draft.resume,
            }),
        )
        .await
    }

    async fn get_job_applications(&self, job_id: JobId) -> Result<Vec<Application>, ServiceError> {
        self.call("getJobApplications", &json!({ "jobId": job_id })).await
    }

    async fn get_user_applications(
        &self,
        user: &Principal,
    ) -> Result<Vec<Application>, ServiceError> {
        self.call("getUserApplications", &json!({ "userId": user })).await
    }

    async fn update_application_status(
        &self,
        job_id: JobId,
        applicant: &Principal,
        new_status: ApplicationStatus,
    ) -> Result<(), ServiceError> {
        self.call(
            "updateApplicationStatus",
            &json!({
                "jobId": job_id,
                "applicantId": applicant,
                "newStatus": new_status,
            }),
        )
        .await
    }

    async fn get_caller_candidate_profile(
        &self,
    ) -> Result<Option<CandidateProfile>, ServiceError> {
        self.call("getCallerCandidateProfile", &json!({})).await
    }

    async fn get_candidate_profile(
        &self,
        user: &Principal,
    ) -> Result<Option<CandidateProfile>, ServiceError> {
        self.call("getCandidateProfile", &json!({ "userId": user })).await
    }

    async fn save_candidate_profile(
        &self,
        draft: &CandidateProfileDraft,
    ) -> Result<(), ServiceError> {
        self.call("saveCandidateProfile", draft).await
    }

    async fn filter_candidates(
        &self,
        skills: &[String],
        min_experience: u64,
    ) -> Result<Vec<CandidateProfile>, ServiceError> {
        self.call(
            "filterCandidates",
            &json!({ "skills": skills, "minExperience": min_experience }),
        )
        .await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, ServiceError> {
        self.call("getCallerUserProfile", &json!({})).await
    }

    async fn get_user_profile(
        &self,
        user: &Principal,
    ) -> Result<Option<UserProfile>, ServiceError> {
        self.call("getUserProfile", &json!({ "user": user })).await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), ServiceError> {
        self.call("saveCallerUserProfile", profile).await
    }

    async fn get_caller_user_role(&self) -> Result<UserRole, ServiceError> {
        self.call("getCallerUserRole", &json!({})).await
    }

    async fn is_caller_admin(&self) -> Result<bool, ServiceError> {
        self.call("isCallerAdmin", &json!({})).await
    }

    async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), ServiceError> {
        self.call(
            "assignCallerUserRole",
            &json!({ "user": user, "role": role }),
        )
        .await
    }

    async fn cv_find(&self) -> Result<CompiledCv, ServiceError> {
        self.call("cvFind", &json!({})).await
    }
}

/// Production connector: one shared `reqwest::Client`, one identity-bound
/// [`HttpRemoteService`] per login.
pub struct HttpConnector {
    client: Client,
    base_url: String,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(CALL_TIMEOUT).build()?,
            base_url: base_url.into(),
        })
    }
}

impl ServiceConnector for HttpConnector {
    fn connect(&self, identity: &Principal) -> Arc<dyn RemoteService> {
        Arc::new(HttpRemoteService::new(
            self.client.clone(),
            self.base_url.clone(),
            identity.clone(),
        ))
    }
}
