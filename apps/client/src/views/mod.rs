//! Pure, synchronous filters and formatters over already-cached collections.
//! Inputs are small, so every page recomputes on each request instead of
//! caching derivations.

use serde::Serialize;

use crate::models::{Application, ApplicationStatus, CandidateProfile, JobPosting, Principal,
    SalaryRange, Time};

/// Pages never show more than this many recommendations.
pub const RECOMMENDATION_LIMIT: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Search / filter
// ────────────────────────────────────────────────────────────────────────────

fn matches_term(job: &JobPosting, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    job.title.to_lowercase().contains(&term)
        || job.company.to_lowercase().contains(&term)
        || job.description.to_lowercase().contains(&term)
}

/// Free-text term (title, company or description, case-insensitive; empty
/// term matches everything) plus optional exact employment type
/// (`None` = "all").
pub fn job_matches(job: &JobPosting, term: &str, employment_type: Option<&str>) -> bool {
    matches_term(job, term)
        && employment_type.map_or(true, |wanted| job.employment_type == wanted)
}

/// Browse-page filter: active postings matching the term and type selector.
/// Order preserved.
pub fn search_jobs<'a>(
    jobs: &'a [JobPosting],
    term: &str,
    employment_type: Option<&str>,
) -> Vec<&'a JobPosting> {
    jobs.iter()
        .filter(|job| job.is_active)
        .filter(|job| job_matches(job, term, employment_type))
        .collect()
}

/// Freelance-marketplace filter: the search filter restricted to freelance
/// and contract postings.
pub fn freelance_jobs<'a>(jobs: &'a [JobPosting], term: &str) -> Vec<&'a JobPosting> {
    jobs.iter()
        .filter(|job| {
            job.is_active
                && (job.employment_type == "freelance" || job.employment_type == "contract")
        })
        .filter(|job| matches_term(job, term))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations
// ────────────────────────────────────────────────────────────────────────────

/// Bidirectional case-insensitive substring test between one candidate skill
/// and one required skill ("js" matches "Node.js", "TypeScript" matches
/// "Type").
fn skills_overlap(candidate_skills: &[String], required: &[String]) -> bool {
    candidate_skills.iter().any(|skill| {
        let skill = skill.to_lowercase();
        required.iter().any(|req| {
            let req = req.to_lowercase();
            req.contains(&skill) || skill.contains(&req)
        })
    })
}

/// Personalized recommendations: active postings whose employment type is in
/// the candidate's preferred job types, or whose required skills overlap the
/// candidate's skills. First [`RECOMMENDATION_LIMIT`] matches in source order.
pub fn recommended_jobs<'a>(
    profile: &CandidateProfile,
    jobs: &'a [JobPosting],
) -> Vec<&'a JobPosting> {
    jobs.iter()
        .filter(|job| {
            if !job.is_active {
                return false;
            }
            let type_matches = profile
                .preferred_job_types
                .iter()
                .any(|preferred| job.employment_type == preferred.as_str());
            type_matches || skills_overlap(&profile.skills, &job.skills_required)
        })
        .take(RECOMMENDATION_LIMIT)
        .collect()
}

/// "My applications" join: each application paired with its posting. With a
/// term or type selector active, a row must match on the joined posting, so
/// applications whose posting is missing from the collection survive only
/// the unfiltered view.
pub fn application_rows<'a>(
    applications: &'a [Application],
    jobs: &'a [JobPosting],
    term: &str,
    employment_type: Option<&str>,
) -> Vec<(&'a Application, Option<&'a JobPosting>)> {
    let filtering = !term.is_empty() || employment_type.is_some();
    applications
        .iter()
        .filter_map(|application| {
            let job = jobs.iter().find(|job| job.id == application.job_id);
            match job {
                Some(job) if !job_matches(job, term, employment_type) => None,
                None if filtering => None,
                _ => Some((application, job)),
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Ownership
// ────────────────────────────────────────────────────────────────────────────

/// A posting belongs to the caller iff the employer key string-equals the
/// caller's principal. No normalization: identity strings are opaque.
pub fn is_posting_owner(job: &JobPosting, identity: &Principal) -> bool {
    job.employer_id == *identity
}

/// "My postings" view: ownership-filtered, order preserved, inactive kept
/// (employers still see their soft-deleted postings).
pub fn owned_postings<'a>(jobs: &'a [JobPosting], identity: &Principal) -> Vec<&'a JobPosting> {
    jobs.iter().filter(|job| is_posting_owner(job, identity)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard stats
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployerStats {
    pub total_postings: usize,
    pub active_postings: usize,
}

pub fn employer_stats(jobs: &[JobPosting], identity: &Principal) -> EmployerStats {
    let mine = owned_postings(jobs, identity);
    EmployerStats {
        total_postings: mine.len(),
        active_postings: mine.iter().filter(|job| job.is_active).count(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub applications: usize,
    pub pending: usize,
    pub has_profile: bool,
}

pub fn candidate_stats(applications: &[Application], has_profile: bool) -> CandidateStats {
    CandidateStats {
        applications: applications.len(),
        pending: applications
            .iter()
            .filter(|app| app.status == ApplicationStatus::Pending)
            .count(),
        has_profile,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting
// ────────────────────────────────────────────────────────────────────────────

/// Which wording an unspecified salary range gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryContext {
    General,
    Freelance,
}

/// Renders a salary range for display. `{0, 0}` means the employer left the
/// range open and must never render as "$0 - $0".
pub fn format_salary(range: &SalaryRange, context: SalaryContext) -> String {
    if range.is_unspecified() {
        return match context {
            SalaryContext::General => "Not specified".to_string(),
            SalaryContext::Freelance => "Negotiable".to_string(),
        };
    }
    format!(
        "${} - ${}",
        group_thousands(range.min),
        group_thousands(range.max)
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Backend timestamps are nanoseconds since epoch; pages show a plain date.
pub fn format_date(timestamp: Time) -> String {
    chrono::DateTime::from_timestamp_nanos(timestamp)
        .format("%Y-%m-%d")
        .to_string()
}
