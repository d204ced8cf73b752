//! Public browse pages: job search, server-side filtered search, and the
//! freelance marketplace.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{FilterCriteria, JobPosting};
use crate::routes::Page;
use crate::state::AppState;
use crate::views::{self, SalaryContext};

/// A posting plus its display-ready fields, as a page renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub salary_display: String,
    pub deadline_display: String,
}

impl JobView {
    pub fn new(posting: &JobPosting, context: SalaryContext) -> Self {
        JobView {
            salary_display: views::format_salary(&posting.salary_range, context),
            deadline_display: views::format_date(posting.application_deadline),
            posting: posting.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPage {
    pub jobs: Vec<JobView>,
    pub total: usize,
    /// Explicit empty state: render "no jobs found", not a bare list.
    pub is_empty: bool,
}

impl JobsPage {
    fn new(matched: Vec<&JobPosting>, context: SalaryContext) -> Self {
        let jobs: Vec<JobView> = matched
            .into_iter()
            .map(|posting| JobView::new(posting, context))
            .collect();
        JobsPage {
            total: jobs.len(),
            is_empty: jobs.is_empty(),
            jobs,
        }
    }
}

// Query-string names are snake_case; only JSON bodies use the backend's
// camelCase convention.
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

impl JobSearchParams {
    pub fn term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// "all" (or absent) disables the type selector.
    pub fn employment_type(&self) -> Option<&str> {
        self.employment_type.as_deref().filter(|ty| *ty != "all")
    }
}

/// GET /api/v1/jobs
pub async fn handle_jobs_page(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Json<Page<JobsPage>> {
    let postings = state.data.job_postings().await;
    Json(Page::from_state(postings, |jobs| {
        let matched = views::search_jobs(&jobs, params.term(), params.employment_type());
        JobsPage::new(matched, SalaryContext::General)
    }))
}

/// GET /api/v1/freelance
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancePage {
    /// Freelance/contract opportunity count before the search term applies.
    pub total_opportunities: usize,
    pub jobs: Vec<JobView>,
    pub is_empty: bool,
}

pub async fn handle_freelance_page(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Json<Page<FreelancePage>> {
    let postings = state.data.job_postings().await;
    Json(Page::from_state(postings, |jobs| {
        let total_opportunities = views::freelance_jobs(&jobs, "").len();
        let matched = views::freelance_jobs(&jobs, params.term());
        let jobs: Vec<JobView> = matched
            .into_iter()
            .map(|posting| JobView::new(posting, SalaryContext::Freelance))
            .collect();
        FreelancePage {
            total_opportunities,
            is_empty: jobs.is_empty(),
            jobs,
        }
    }))
}

/// POST /api/v1/jobs/search — server-side filtered search.
pub async fn handle_filtered_jobs(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<Page<JobsPage>> {
    let postings = state.data.filtered_job_postings(criteria).await;
    Json(Page::from_state(postings, |jobs| {
        JobsPage::new(jobs.iter().collect(), SalaryContext::General)
    }))
}
