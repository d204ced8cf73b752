//! In-memory backend used by the cache, data and route tests. Implements the
//! same contract as the real service, including soft deletes, duplicate
//! application rejection and per-method call counting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::{
    Application, ApplicationDraft, ApplicationStatus, CandidateProfile, CandidateProfileDraft,
    CompiledCv, FilterCriteria, JobDraft, JobId, JobPosting, Principal, UserProfile, UserRole,
};
use crate::service::{RemoteService, ServiceConnector, ServiceError};

#[derive(Default)]
struct State {
    jobs: Vec<JobPosting>,
    next_job_id: JobId,
    applications: Vec<Application>,
    candidate_profiles: HashMap<Principal, CandidateProfile>,
    user_profiles: HashMap<Principal, UserProfile>,
    roles: HashMap<Principal, UserRole>,
    clock: i64,
    fail_all: bool,
}

/// Shared mock backend. Bind per-identity handles with [`MockBackend::connect`].
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<State>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connect(self: &Arc<Self>, identity: &Principal) -> Arc<MockService> {
        Arc::new(MockService {
            backend: Arc::clone(self),
            identity: identity.clone(),
        })
    }

    /// Number of times `method` has been invoked, across all identities.
    pub fn calls(&self, method: &str) -> usize {
        *self.calls.lock().unwrap().get(method).unwrap_or(&0)
    }

    /// When set, every subsequent call fails with a transient error.
    pub fn set_fail_all(&self, fail: bool) {
        self.state.lock().unwrap().fail_all = fail;
    }

    pub fn push_job(&self, job: JobPosting) {
        let mut state = self.state.lock().unwrap();
        state.next_job_id = state.next_job_id.max(job.id + 1);
        state.jobs.push(job);
    }

    pub fn insert_candidate_profile(&self, profile: CandidateProfile) {
        self.state
            .lock()
            .unwrap()
            .candidate_profiles
            .insert(profile.user_id.clone(), profile);
    }

    pub fn insert_user_profile(&self, user: Principal, profile: UserProfile) {
        self.state.lock().unwrap().user_profiles.insert(user, profile);
    }

    pub fn insert_role(&self, user: Principal, role: UserRole) {
        self.state.lock().unwrap().roles.insert(user, role);
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
    }

    fn check_fail(&self) -> Result<(), ServiceError> {
        if self.state.lock().unwrap().fail_all {
            return Err(ServiceError::Api {
                status: 503,
                code: "UNAVAILABLE".to_string(),
                message: "mock backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Identity-bound handle to a [`MockBackend`].
pub struct MockService {
    backend: Arc<MockBackend>,
    identity: Principal,
}

/// `ServiceConnector` over a shared mock backend, for route-level tests.
pub struct MockConnector(pub Arc<MockBackend>);

impl ServiceConnector for MockConnector {
    fn connect(&self, identity: &Principal) -> Arc<dyn RemoteService> {
        self.0.connect(identity)
    }
}

fn posting_from_draft(id: JobId, employer: &Principal, draft: &JobDraft) -> JobPosting {
    JobPosting {
        id,
        employer_id: employer.clone(),
        title: draft.title.clone(),
        description: draft.description.clone(),
        company: draft.company.clone(),
        location: draft.location.clone(),
        employment_type: draft.employment_type.clone(),
        salary_range: draft.salary_range,
        skills_required: draft.skills_required.clone(),
        experience_level: draft.experience_level.clone(),
        education_level: draft.education_level.clone(),
        benefits: draft.benefits.clone(),
        is_active: draft.is_active,
        application_deadline: draft.application_deadline,
    }
}

#[async_trait]
impl RemoteService for MockService {
    async fn get_job_postings(&self) -> Result<Vec<JobPosting>, ServiceError> {
        self.backend.record("getJobPostings");
        self.backend.check_fail()?;
        Ok(self.backend.state.lock().unwrap().jobs.clone())
    }

    async fn get_filtered_job_postings(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<JobPosting>, ServiceError> {
        self.backend.record("getFilteredJobPostings");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .jobs
            .iter()
            .filter(|job| {
                job.is_active
                    && (criteria.employment_type.is_empty()
                        || job.employment_type == criteria.employment_type)
                    && (criteria.location.is_empty() || job.location == criteria.location)
            })
            .cloned()
            .collect())
    }

    async fn create_job_posting(&self, draft: &JobDraft) -> Result<JobId, ServiceError> {
        self.backend.record("createJobPosting");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        let id = state.next_job_id;
        state.next_job_id += 1;
        let posting = posting_from_draft(id, &self.identity, draft);
        state.jobs.push(posting);
        Ok(id)
    }

    async fn update_job_posting(
        &self,
        job_id: JobId,
        draft: &JobDraft,
    ) -> Result<(), ServiceError> {
        self.backend.record("updateJobPosting");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or_else(|| ServiceError::NotFound(format!("job {job_id}")))?;
        let employer = job.employer_id.clone();
        *job = posting_from_draft(job_id, &employer, draft);
        Ok(())
    }

    async fn delete_job_posting(&self, job_id: JobId) -> Result<(), ServiceError> {
        self.backend.record("deleteJobPosting");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or_else(|| ServiceError::NotFound(format!("job {job_id}")))?;
        job.is_active = false;
        Ok(())
    }

    async fn apply_to_job(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<(), ServiceError> {
        self.backend.record("applyToJob");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        if state
            .applications
            .iter()
            .any(|app| app.job_id == job_id && app.applicant_id == self.identity)
        {
            return Err(ServiceError::DuplicateApplication);
        }
        state.clock += 1;
        let applied_at = state.clock;
        state.applications.push(Application {
            job_id,
            applicant_id: self.identity.clone(),
            status: ApplicationStatus::Pending,
            applied_at,
            expected_salary: draft.expected_salary,
            cover_letter: draft.cover_letter.clone(),
            resume: draft.resume.clone(),
        });
        Ok(())
    }

    async fn get_job_applications(&self, job_id: JobId) -> Result<Vec<Application>, ServiceError> {
        self.backend.record("getJobApplications");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .applications
            .iter()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn get_user_applications(
        &self,
        user: &Principal,
    ) -> Result<Vec<Application>, ServiceError> {
        self.backend.record("getUserApplications");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .applications
            .iter()
            .filter(|app| &app.applicant_id == user)
            .cloned()
            .collect())
    }

    async fn update_application_status(
        &self,
        job_id: JobId,
        applicant: &Principal,
        new_status: ApplicationStatus,
    ) -> Result<(), ServiceError> {
        self.backend.record("updateApplicationStatus");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        let app = state
            .applications
            .iter_mut()
            .find(|app| app.job_id == job_id && &app.applicant_id == applicant)
            .ok_or_else(|| ServiceError::NotFound(format!("application for job {job_id}")))?;
        app.status = new_status;
        Ok(())
    }

    async fn get_caller_candidate_profile(
        &self,
    ) -> Result<Option<CandidateProfile>, ServiceError> {
        self.backend.record("getCallerCandidateProfile");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state.candidate_profiles.get(&self.identity).cloned())
    }

    async fn get_candidate_profile(
        &self,
        user: &Principal,
    ) -> Result<Option<CandidateProfile>, ServiceError> {
        self.backend.record("getCandidateProfile");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state.candidate_profiles.get(user).cloned())
    }

    async fn save_candidate_profile(
        &self,
        draft: &CandidateProfileDraft,
    ) -> Result<(), ServiceError> {
        self.backend.record("saveCandidateProfile");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        state.candidate_profiles.insert(
            self.identity.clone(),
            CandidateProfile {
                user_id: self.identity.clone(),
                first_name: draft.first_name.clone(),
                last_name: draft.last_name.clone(),
                email: draft.email.clone(),
                headline: draft.headline.clone(),
                summary: draft.summary.clone(),
                skills: draft.skills.clone(),
                experience: draft.experience.clone(),
                education: draft.education.clone(),
                certifications: draft.certifications.clone(),
                portfolio_links: draft.portfolio_links.clone(),
                references: draft.references.clone(),
                availability: draft.availability.clone(),
                preferred_job_types: draft.preferred_job_types.clone(),
                location: draft.location.clone(),
                hourly_rate: draft.hourly_rate,
                resume_url: draft.resume_url.clone(),
            },
        );
        Ok(())
    }

    async fn filter_candidates(
        &self,
        skills: &[String],
        min_experience: u64,
    ) -> Result<Vec<CandidateProfile>, ServiceError> {
        self.backend.record("filterCandidates");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .candidate_profiles
            .values()
            .filter(|profile| {
                profile.experience.len() as u64 >= min_experience
                    && (skills.is_empty()
                        || skills.iter().any(|wanted| {
                            profile
                                .skills
                                .iter()
                                .any(|have| have.eq_ignore_ascii_case(wanted))
                        }))
            })
            .cloned()
            .collect())
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, ServiceError> {
        self.backend.record("getCallerUserProfile");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state.user_profiles.get(&self.identity).cloned())
    }

    async fn get_user_profile(
        &self,
        user: &Principal,
    ) -> Result<Option<UserProfile>, ServiceError> {
        self.backend.record("getUserProfile");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state.user_profiles.get(user).cloned())
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), ServiceError> {
        self.backend.record("saveCallerUserProfile");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        state
            .user_profiles
            .insert(self.identity.clone(), profile.clone());
        Ok(())
    }

    async fn get_caller_user_role(&self) -> Result<UserRole, ServiceError> {
        self.backend.record("getCallerUserRole");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(state
            .roles
            .get(&self.identity)
            .copied()
            .unwrap_or(UserRole::User))
    }

    async fn is_caller_admin(&self) -> Result<bool, ServiceError> {
        self.backend.record("isCallerAdmin");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        Ok(matches!(state.roles.get(&self.identity), Some(UserRole::Admin)))
    }

    async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), ServiceError> {
        self.backend.record("assignCallerUserRole");
        self.backend.check_fail()?;
        let mut state = self.backend.state.lock().unwrap();
        if !matches!(state.roles.get(&self.identity), Some(UserRole::Admin)) {
            return Err(ServiceError::Unauthorized);
        }
        state.roles.insert(user.clone(), role);
        Ok(())
    }

    async fn cv_find(&self) -> Result<CompiledCv, ServiceError> {
        self.backend.record("cvFind");
        self.backend.check_fail()?;
        let state = self.backend.state.lock().unwrap();
        let profile = state
            .candidate_profiles
            .get(&self.identity)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("candidate profile".to_string()))?;
        Ok(CompiledCv {
            summary: profile.summary.clone(),
            skills: profile.skills.clone(),
            experiences: profile.experience.clone(),
            education: profile.education.clone(),
            certifications: profile.certifications.clone(),
            references: Vec::new(),
            personal_info: profile,
        })
    }
}
