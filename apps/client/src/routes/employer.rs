//! Employer-facing pages: dashboard, posting management, application review
//! and candidate search. Every handler gates on the employer role before
//! touching the data layer.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::QueryState;
use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, CandidateProfile, JobDraft, JobId, Principal, Role,
};
use crate::routes::jobs::JobView;
use crate::routes::{require_role, Page};
use crate::state::AppState;
use crate::views::{self, EmployerStats, SalaryContext};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerDashboard {
    pub stats: EmployerStats,
    pub recent_postings: Vec<JobView>,
}

/// GET /api/v1/employer/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<Page<EmployerDashboard>>, AppError> {
    let identity = require_role(&state.data, Role::Employer).await?;

    let postings = state.data.job_postings().await;
    Ok(Json(Page::from_state(postings, |jobs| EmployerDashboard {
        stats: views::employer_stats(&jobs, &identity),
        recent_postings: views::owned_postings(&jobs, &identity)
            .into_iter()
            .map(|posting| JobView::new(posting, SalaryContext::General))
            .collect(),
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyJobsPage {
    /// Inactive (soft-deleted) postings stay listed so the employer can see
    /// their history.
    pub jobs: Vec<JobView>,
    pub is_empty: bool,
}

/// GET /api/v1/employer/jobs
pub async fn handle_my_jobs(
    State(state): State<AppState>,
) -> Result<Json<Page<MyJobsPage>>, AppError> {
    let identity = require_role(&state.data, Role::Employer).await?;

    let postings = state.data.job_postings().await;
    Ok(Json(Page::from_state(postings, |jobs| {
        let mine: Vec<JobView> = views::owned_postings(&jobs, &identity)
            .into_iter()
            .map(|posting| JobView::new(posting, SalaryContext::General))
            .collect();
        MyJobsPage {
            is_empty: mine.is_empty(),
            jobs: mine,
        }
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationsPage {
    pub job: JobView,
    pub applications: Vec<Application>,
    pub is_empty: bool,
}

/// GET /api/v1/employer/jobs/:job_id/applications
///
/// Only the posting's owner may review its applications; ownership is an
/// exact identity comparison, never a prefix or normalized match.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Result<Json<Page<JobApplicationsPage>>, AppError> {
    let identity = require_role(&state.data, Role::Employer).await?;

    let postings = match state.data.job_postings().await {
        QueryState::Ready(jobs) => jobs,
        QueryState::Pending => return Ok(Json(Page::pending())),
        QueryState::Failed(err) => return Ok(Json(Page::failed(err))),
    };
    let job = postings
        .iter()
        .find(|job| job.id == job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
    if !views::is_posting_owner(job, &identity) {
        return Err(AppError::Forbidden);
    }

    let job = JobView::new(job, SalaryContext::General);
    let applications = state.data.job_applications(job_id).await;
    Ok(Json(Page::from_state(applications, |applications| {
        JobApplicationsPage {
            job,
            is_empty: applications.is_empty(),
            applications,
        }
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateSearchParams {
    /// Comma-separated skill list, e.g. `skills=rust,tokio`.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub min_experience: Option<u64>,
}

impl CandidateSearchParams {
    fn skills(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchPage {
    pub candidates: Vec<CandidateProfile>,
    pub total: usize,
}

/// GET /api/v1/candidates
pub async fn handle_candidate_search(
    State(state): State<AppState>,
    Query(params): Query<CandidateSearchParams>,
) -> Result<Json<Page<CandidateSearchPage>>, AppError> {
    require_role(&state.data, Role::Employer).await?;

    let candidates = state
        .data
        .candidates(params.skills(), params.min_experience.unwrap_or(0))
        .await;
    Ok(Json(Page::from_state(candidates, |candidates| {
        CandidateSearchPage {
            total: candidates.len(),
            candidates,
        }
    })))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Value>, AppError> {
    require_role(&state.data, Role::Employer).await?;
    let job_id = state.data.create_job_posting(&draft).await?;
    Ok(Json(json!({ "status": "created", "jobId": job_id })))
}

/// PUT /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Value>, AppError> {
    require_role(&state.data, Role::Employer).await?;
    state.data.update_job_posting(job_id, &draft).await?;
    Ok(Json(json!({ "status": "updated" })))
}

/// DELETE /api/v1/jobs/:job_id — soft delete, the record stays listed as
/// inactive.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Result<Json<Value>, AppError> {
    require_role(&state.data, Role::Employer).await?;
    state.data.delete_job_posting(job_id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// PATCH /api/v1/jobs/:job_id/applications/:applicant/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    Path((job_id, applicant)): Path<(JobId, Principal)>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&state.data, Role::Employer).await?;
    state
        .data
        .update_application_status(job_id, &applicant, req.status)
        .await?;
    Ok(Json(json!({ "status": "updated" })))
}
