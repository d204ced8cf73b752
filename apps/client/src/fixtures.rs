//! Shared test fixtures: minimal valid model values the test modules mutate
//! per case.

use crate::models::{
    Application, ApplicationStatus, Availability, CandidateProfile, CandidateProfileDraft,
    JobDraft, JobId, JobPosting, JobType, Principal, SalaryRange,
};

pub fn job(id: JobId, employer: &str, employment_type: &str, is_active: bool) -> JobPosting {
    JobPosting {
        id,
        employer_id: Principal::from(employer),
        title: format!("Job {id}"),
        description: "Build things".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        employment_type: employment_type.to_string(),
        salary_range: SalaryRange { min: 0, max: 0 },
        skills_required: Vec::new(),
        experience_level: "mid".to_string(),
        education_level: "bachelor".to_string(),
        benefits: Vec::new(),
        is_active,
        application_deadline: 0,
    }
}

pub fn job_draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: "Build things".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        employment_type: "fullTime".to_string(),
        salary_range: SalaryRange {
            min: 70_000,
            max: 90_000,
        },
        skills_required: vec!["rust".to_string()],
        experience_level: "mid".to_string(),
        education_level: "bachelor".to_string(),
        benefits: Vec::new(),
        is_active: true,
        application_deadline: 0,
    }
}

pub fn candidate_draft(skills: &[&str]) -> CandidateProfileDraft {
    CandidateProfileDraft {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        headline: "Engineer".to_string(),
        summary: String::new(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience: Vec::new(),
        education: Vec::new(),
        certifications: Vec::new(),
        portfolio_links: Vec::new(),
        references: Vec::new(),
        availability: Availability {
            is_available: true,
            weekly_hours: None,
            preferred_start_date: None,
        },
        preferred_job_types: vec![JobType::FullTime],
        location: "Remote".to_string(),
        hourly_rate: None,
        resume_url: None,
    }
}

pub fn candidate_profile(user: &str, skills: &[&str]) -> CandidateProfile {
    let draft = candidate_draft(skills);
    CandidateProfile {
        user_id: Principal::from(user),
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        headline: draft.headline,
        summary: draft.summary,
        skills: draft.skills,
        experience: draft.experience,
        education: draft.education,
        certifications: draft.certifications,
        portfolio_links: draft.portfolio_links,
        references: draft.references,
        availability: draft.availability,
        preferred_job_types: draft.preferred_job_types,
        location: draft.location,
        hourly_rate: draft.hourly_rate,
        resume_url: draft.resume_url,
    }
}

pub fn application(job_id: JobId, applicant: &str) -> Application {
    Application {
        job_id,
        applicant_id: Principal::from(applicant),
        status: ApplicationStatus::Pending,
        applied_at: 0,
        expected_salary: None,
        cover_letter: None,
        resume: None,
    }
}
