use serde::{Deserialize, Serialize};

use crate::models::{Principal, Time};

/// Posting identifier assigned by the backend on creation.
pub type JobId = u64;

/// Salary bounds in whole currency units. `min <= max` by convention only;
/// the client does not enforce it. `{0, 0}` means "not specified" and is
/// rendered as such, never as a literal zero range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

impl SalaryRange {
    pub fn is_unspecified(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

/// A job posting as held by the backend. Deletion is soft: `is_active` flips
/// to false and the record persists in every collection read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: JobId,
    pub employer_id: Principal,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: SalaryRange,
    pub skills_required: Vec<String>,
    pub experience_level: String,
    pub education_level: String,
    pub benefits: Vec<String>,
    pub is_active: bool,
    pub application_deadline: Time,
}

/// Posting fields as submitted by an employer: everything on [`JobPosting`]
/// minus the backend-assigned id and the employer key (always the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: SalaryRange,
    pub skills_required: Vec<String>,
    pub experience_level: String,
    pub education_level: String,
    pub benefits: Vec<String>,
    pub is_active: bool,
    pub application_deadline: Time,
}

/// Server-side posting filter input for `getFilteredJobPostings`.
/// Hash/Eq so a criteria value can key a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub experience_level: String,
    pub employment_type: String,
    pub salary_range: SalaryRange,
    pub skills: Vec<String>,
    pub education_level: String,
    pub location: String,
}
