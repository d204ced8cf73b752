//! Candidate-facing pages: dashboard, recommendations, my applications,
//! profile management, apply, and the compiled CV view.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationDraft, CandidateProfile, CandidateProfileDraft, CompiledCv, JobId, Role,
};
use crate::routes::jobs::{JobSearchParams, JobView};
use crate::routes::{require_role, Page};
use crate::state::AppState;
use crate::views::{self, CandidateStats, SalaryContext};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsPage {
    pub has_profile: bool,
    pub jobs: Vec<JobView>,
    pub is_empty: bool,
}

/// GET /api/v1/recommendations
///
/// Without a candidate profile there is nothing to match against: the page
/// renders empty rather than failing.
pub async fn handle_recommendations(
    State(state): State<AppState>,
) -> Json<Page<RecommendationsPage>> {
    let profile = state.data.caller_candidate_profile().await;
    let postings = state.data.job_postings().await;

    Json(Page::from_state(profile.zip(postings), |(profile, jobs)| {
        match profile {
            None => RecommendationsPage {
                has_profile: false,
                jobs: Vec::new(),
                is_empty: true,
            },
            Some(profile) => {
                let recommended: Vec<JobView> = views::recommended_jobs(&profile, &jobs)
                    .into_iter()
                    .map(|posting| JobView::new(posting, SalaryContext::General))
                    .collect();
                RecommendationsPage {
                    has_profile: true,
                    is_empty: recommended.is_empty(),
                    jobs: recommended,
                }
            }
        }
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDashboard {
    pub stats: CandidateStats,
    pub recommendations: Vec<JobView>,
}

/// GET /api/v1/candidate/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<Page<CandidateDashboard>>, AppError> {
    let identity = require_role(&state.data, Role::Candidate).await?;

    let applications = state.data.user_applications(identity).await;
    let profile = state.data.caller_candidate_profile().await;
    let postings = state.data.job_postings().await;

    let combined = applications.zip(profile.zip(postings));
    Ok(Json(Page::from_state(
        combined,
        |(applications, (profile, jobs))| {
            let recommendations = profile
                .as_ref()
                .map(|profile| {
                    views::recommended_jobs(profile, &jobs)
                        .into_iter()
                        .map(|posting| JobView::new(posting, SalaryContext::General))
                        .collect()
                })
                .unwrap_or_default();
            CandidateDashboard {
                stats: views::candidate_stats(&applications, profile.is_some()),
                recommendations,
            }
        },
    )))
}

/// One row of the "my applications" page: the application joined with its
/// posting (absent if the posting has vanished from the collection).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyApplicationsPage {
    pub applications: Vec<ApplicationView>,
    pub is_empty: bool,
}

/// GET /api/v1/candidate/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<Page<MyApplicationsPage>>, AppError> {
    let identity = require_role(&state.data, Role::Candidate).await?;

    let applications = state.data.user_applications(identity).await;
    let postings = state.data.job_postings().await;

    Ok(Json(Page::from_state(
        applications.zip(postings),
        |(applications, jobs)| {
            // The search box filters on the joined posting.
            let rows: Vec<ApplicationView> =
                views::application_rows(&applications, &jobs, params.term(), params.employment_type())
                    .into_iter()
                    .map(|(application, job)| ApplicationView {
                        job: job.map(|job| JobView::new(job, SalaryContext::General)),
                        application: application.clone(),
                    })
                    .collect();
            MyApplicationsPage {
                is_empty: rows.is_empty(),
                applications: rows,
            }
        },
    )))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfilePage {
    pub has_profile: bool,
    pub profile: Option<CandidateProfile>,
}

/// GET /api/v1/candidate/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Json<Page<CandidateProfilePage>> {
    let profile = state.data.caller_candidate_profile().await;
    Json(Page::from_state(profile, |profile| CandidateProfilePage {
        has_profile: profile.is_some(),
        profile,
    }))
}

/// PUT /api/v1/candidate/profile — wholesale replace.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(draft): Json<CandidateProfileDraft>,
) -> Result<Json<Value>, AppError> {
    state.data.save_candidate_profile(&draft).await?;
    Ok(Json(json!({ "status": "saved" })))
}

/// GET /api/v1/candidate/cv
pub async fn handle_cv(State(state): State<AppState>) -> Json<Page<CompiledCv>> {
    let cv = state.data.compiled_cv().await;
    Json(Page::from_state(cv, |cv| cv))
}

/// POST /api/v1/jobs/:job_id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Json<Value>, AppError> {
    state.data.apply_to_job(job_id, &draft).await?;
    Ok(Json(json!({ "status": "applied" })))
}
