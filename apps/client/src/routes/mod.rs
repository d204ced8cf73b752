pub mod auth;
pub mod candidate;
pub mod employer;
pub mod health;
pub mod jobs;
pub mod profile;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use serde::Serialize;

use crate::cache::{QueryError, QueryState};
use crate::data::DataLayer;
use crate::errors::AppError;
use crate::models::{Principal, Role};
use crate::state::AppState;

/// Tri-state page envelope mirroring the query cache states: `pending` while
/// no connection exists, `error` for a stored fetch failure, `ready`
/// otherwise. Lets a renderer distinguish "no data yet" from "no results".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Pending,
    Ready,
    Error,
}

impl<T> Page<T> {
    pub fn pending() -> Self {
        Page {
            status: PageStatus::Pending,
            data: None,
            error: None,
        }
    }

    pub fn ready(data: T) -> Self {
        Page {
            status: PageStatus::Ready,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(err: QueryError) -> Self {
        Page {
            status: PageStatus::Error,
            data: None,
            error: Some(err.message),
        }
    }

    /// Renders a query state, mapping the ready value through `f`.
    pub fn from_state<U>(state: QueryState<U>, f: impl FnOnce(U) -> T) -> Self {
        match state {
            QueryState::Pending => Page::pending(),
            QueryState::Failed(err) => Page::failed(err),
            QueryState::Ready(value) => Page::ready(f(value)),
        }
    }
}

/// Page-level access check: the caller must be logged in and their loaded
/// user profile must carry `role`. The role was decided once at profile save
/// time; no per-component string comparison.
pub async fn require_role(data: &DataLayer, role: Role) -> Result<Principal, AppError> {
    let identity = data.identity().ok_or(AppError::Unauthorized)?;
    match data.caller_user_profile().await {
        QueryState::Ready(Some(profile)) if profile.role == role => Ok(identity),
        QueryState::Ready(_) => Err(AppError::Forbidden),
        QueryState::Pending => Err(AppError::ConnectionNotReady),
        QueryState::Failed(err) => Err(AppError::Backend(err.message)),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity provider boundary
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Public browse pages; POST creates a posting (employer command)
        .route(
            "/api/v1/jobs",
            get(jobs::handle_jobs_page).post(employer::handle_create_job),
        )
        .route("/api/v1/jobs/search", post(jobs::handle_filtered_jobs))
        .route("/api/v1/freelance", get(jobs::handle_freelance_page))
        // Candidate pages
        .route(
            "/api/v1/recommendations",
            get(candidate::handle_recommendations),
        )
        .route(
            "/api/v1/candidate/dashboard",
            get(candidate::handle_dashboard),
        )
        .route(
            "/api/v1/candidate/applications",
            get(candidate::handle_my_applications),
        )
        .route(
            "/api/v1/candidate/profile",
            get(candidate::handle_get_profile).put(candidate::handle_save_profile),
        )
        .route("/api/v1/candidate/cv", get(candidate::handle_cv))
        .route("/api/v1/jobs/:job_id/apply", post(candidate::handle_apply))
        // Employer pages
        .route(
            "/api/v1/employer/dashboard",
            get(employer::handle_dashboard),
        )
        .route("/api/v1/employer/jobs", get(employer::handle_my_jobs))
        .route(
            "/api/v1/employer/jobs/:job_id/applications",
            get(employer::handle_job_applications),
        )
        .route("/api/v1/candidates", get(employer::handle_candidate_search))
        .route(
            "/api/v1/jobs/:job_id",
            put(employer::handle_update_job).delete(employer::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/:applicant/status",
            patch(employer::handle_update_application_status),
        )
        // User profile + admin
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_save_profile),
        )
        .route("/api/v1/admin/roles", post(profile::handle_assign_role))
        .with_state(state)
}
