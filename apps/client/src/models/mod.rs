// Domain data model. All records are owned by the remote backend; the client
// only holds transient, invalidatable copies fetched through the cache layer.

pub mod application;
pub mod cv;
pub mod job;
pub mod profile;

pub use application::{Application, ApplicationDraft, ApplicationStatus};
pub use cv::CompiledCv;
pub use job::{FilterCriteria, JobDraft, JobId, JobPosting, SalaryRange};
pub use profile::{
    Availability, CandidateProfile, CandidateProfileDraft, JobType, Principal, Role, UserProfile,
    UserRole,
};

/// Backend timestamps are integer nanoseconds since the Unix epoch.
pub type Time = i64;
