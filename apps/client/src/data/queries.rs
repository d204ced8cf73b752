//! Read side: each backend query wrapped as a keyed, cached, connection-gated
//! operation. Without a connection every query reports `Pending` and issues
//! no fetch; with one, the cache guarantees a single in-flight fetch per key.

use crate::cache::{CacheKey, QueryState};
use crate::data::DataLayer;
use crate::models::{
    Application, CandidateProfile, CompiledCv, FilterCriteria, JobId, JobPosting, Principal,
    UserProfile, UserRole,
};

impl DataLayer {
    pub async fn job_postings(&self) -> QueryState<Vec<JobPosting>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::JobPostings, || async move {
                conn.service.get_job_postings().await
            })
            .await
    }

    pub async fn filtered_job_postings(
        &self,
        criteria: FilterCriteria,
    ) -> QueryState<Vec<JobPosting>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        let key = CacheKey::FilteredJobPostings(criteria.clone());
        self.cache
            .get_or_fetch(key, || async move {
                conn.service.get_filtered_job_postings(&criteria).await
            })
            .await
    }

    pub async fn job_applications(&self, job_id: JobId) -> QueryState<Vec<Application>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::JobApplications(job_id), || async move {
                conn.service.get_job_applications(job_id).await
            })
            .await
    }

    pub async fn user_applications(&self, user: Principal) -> QueryState<Vec<Application>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        let key = CacheKey::UserApplications(user.clone());
        self.cache
            .get_or_fetch(key, || async move {
                conn.service.get_user_applications(&user).await
            })
            .await
    }

    pub async fn caller_candidate_profile(&self) -> QueryState<Option<CandidateProfile>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::CallerCandidateProfile, || async move {
                conn.service.get_caller_candidate_profile().await
            })
            .await
    }

    pub async fn candidate_profile(&self, user: Principal) -> QueryState<Option<CandidateProfile>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        let key = CacheKey::CandidateProfile(user.clone());
        self.cache
            .get_or_fetch(key, || async move {
                conn.service.get_candidate_profile(&user).await
            })
            .await
    }

    pub async fn candidates(
        &self,
        skills: Vec<String>,
        min_experience: u64,
    ) -> QueryState<Vec<CandidateProfile>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        let key = CacheKey::Candidates {
            skills: skills.clone(),
            min_experience,
        };
        self.cache
            .get_or_fetch(key, || async move {
                conn.service.filter_candidates(&skills, min_experience).await
            })
            .await
    }

    pub async fn caller_user_profile(&self) -> QueryState<Option<UserProfile>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::CallerUserProfile, || async move {
                conn.service.get_caller_user_profile().await
            })
            .await
    }

    pub async fn user_profile(&self, user: Principal) -> QueryState<Option<UserProfile>> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        let key = CacheKey::UserProfile(user.clone());
        self.cache
            .get_or_fetch(key, || async move {
                conn.service.get_user_profile(&user).await
            })
            .await
    }

    pub async fn caller_user_role(&self) -> QueryState<UserRole> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::CallerUserRole, || async move {
                conn.service.get_caller_user_role().await
            })
            .await
    }

    pub async fn compiled_cv(&self) -> QueryState<CompiledCv> {
        let Some(conn) = self.connection() else {
            return QueryState::Pending;
        };
        self.cache
            .get_or_fetch(CacheKey::CompiledCv, || async move {
                conn.service.cv_find().await
            })
            .await
    }
}
