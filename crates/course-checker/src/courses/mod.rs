//! Course check workflow: request intake, the per-family catalog sweep,
//! result persistence and the HTTP surface.

pub mod domain;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ClusterResult, CourseCheckRequest, CourseCheckResponse, ProgrammeView, SubjectGrade,
};
pub use intake::{CandidateProfile, IntakeGuard, IntakeViolation};
pub use repository::{CheckResultRecord, CheckResultRepository, RepositoryError};
pub use router::course_router;
pub use service::{CourseCheckError, CourseCheckService};
