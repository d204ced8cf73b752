use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Time;

/// Opaque identity key of an authenticated caller, as issued by the identity
/// provider. Owner key for profiles, postings and applications; compared by
/// plain string equality everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Principal(s.to_string())
    }
}

/// Closed role variant, decided once when the user profile loads and passed
/// explicitly into page-level access checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employer,
    Candidate,
    Admin,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "employer",
            Role::Candidate => "candidate",
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }
}

/// Access-control role as reported by `getCallerUserRole` / assigned by an
/// admin. Distinct from the profile [`Role`] that drives page gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

/// Minimal per-identity profile created on first login via the setup step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role: Role,
}

/// Employment types a candidate can express a preference for. The wire names
/// match the backend's employment-type strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "fullTime")]
    FullTime,
    #[serde(rename = "partTime")]
    PartTime,
    #[serde(rename = "contract")]
    Contract,
    #[serde(rename = "freelance")]
    Freelance,
    #[serde(rename = "internship")]
    Internship,
}

impl JobType {
    /// The backend string form, identical to `JobPosting::employment_type`
    /// values for the same type.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "fullTime",
            JobType::PartTime => "partTime",
            JobType::Contract => "contract",
            JobType::Freelance => "freelance",
            JobType::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub start_date: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Time>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub start_date: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Time>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Time>,
    pub credential_id: String,
    pub credential_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_start_date: Option<Time>,
}

/// Candidate profile fields as submitted by their owner: everything on
/// [`CandidateProfile`] minus the identity key (always the caller). The
/// backend replaces the whole record on save; there is no partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub headline: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    pub portfolio_links: Vec<String>,
    pub references: Vec<String>,
    pub availability: Availability,
    pub preferred_job_types: Vec<JobType>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

/// Full candidate record. At most one per identity; saved wholesale (the
/// backend replaces the record, there is no partial update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub user_id: Principal,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub headline: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    pub portfolio_links: Vec<String>,
    pub references: Vec<String>,
    pub availability: Availability,
    pub preferred_job_types: Vec<JobType>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}
