use serde::{Deserialize, Serialize};

use crate::models::profile::{
    CandidateProfile, Certification, EducationEntry, ExperienceEntry,
};

/// Named reference attached to a compiled CV.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub full_name: String,
    pub relationship: String,
    pub contact_info: String,
}

/// Aggregated CV view returned by `cvFind`: the candidate profile plus its
/// section lists, compiled server-side into a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledCv {
    pub personal_info: CandidateProfile,
    pub summary: String,
    pub skills: Vec<String>,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    pub references: Vec<Reference>,
}
