use std::collections::BTreeSet;

use super::domain::CourseCheckRequest;
use crate::catalog::ProgrammeFamily;
use crate::eligibility::{
    expected_cluster_keys, normalize_subject, ClusterWeights, Grade, GradeProfile,
    MAX_CLUSTER_WEIGHT,
};

const MIN_SUBJECTS: usize = 1;
const MAX_SUBJECTS: usize = 15;
const MIN_INDEX_LEN: usize = 5;
const MAX_INDEX_LEN: usize = 20;

/// Request problems reported to the caller before any evaluation happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("email address must contain '@'")]
    InvalidEmail,
    #[error("index number must be 5 to 20 characters (found {found})")]
    InvalidIndexNumber { found: usize },
    #[error("between 1 and 15 subjects are required (found {found})")]
    SubjectCount { found: usize },
    #[error("subject names must not be empty")]
    EmptySubject,
    #[error("invalid grade '{grade}' for subject '{subject}'")]
    InvalidGrade { subject: String, grade: String },
    #[error("overall grade is required")]
    MissingOverall,
    #[error("cluster weights are required for degree checks")]
    MissingClusterWeights,
    #[error(
        "cluster weights must cover cl1..cl20 exactly \
         (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    ClusterCoverage {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("cluster weight {cluster} must be between 0 and 100 (found {value})")]
    ClusterWeightOutOfRange { cluster: String, value: f64 },
}

/// Validated candidate ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub email: String,
    pub index_number: String,
    pub family: ProgrammeFamily,
    pub grades: GradeProfile,
    /// Present for degree requests only.
    pub weights: Option<ClusterWeights>,
}

/// Turns raw requests into [`CandidateProfile`]s.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn profile_from_request(
        &self,
        request: &CourseCheckRequest,
    ) -> Result<CandidateProfile, IntakeViolation> {
        let email = request.email.trim();
        if !email.contains('@') {
            return Err(IntakeViolation::InvalidEmail);
        }

        let index_number = request.index_number.trim();
        let index_len = index_number.chars().count();
        if !(MIN_INDEX_LEN..=MAX_INDEX_LEN).contains(&index_len) {
            return Err(IntakeViolation::InvalidIndexNumber { found: index_len });
        }

        let grades = self.grade_profile(request)?;

        let weights = match request.education_type {
            ProgrammeFamily::Degree => Some(self.cluster_weights(request)?),
            _ => None,
        };

        Ok(CandidateProfile {
            email: email.to_string(),
            index_number: index_number.to_string(),
            family: request.education_type,
            grades,
            weights,
        })
    }

    fn grade_profile(&self, request: &CourseCheckRequest) -> Result<GradeProfile, IntakeViolation> {
        let found = request.subjects.len();
        if !(MIN_SUBJECTS..=MAX_SUBJECTS).contains(&found) {
            return Err(IntakeViolation::SubjectCount { found });
        }

        let mut pairs = Vec::with_capacity(found);
        for entry in &request.subjects {
            let subject = normalize_subject(&entry.subject);
            if subject.is_empty() {
                return Err(IntakeViolation::EmptySubject);
            }
            let grade = Grade::parse(&entry.grade).ok_or_else(|| IntakeViolation::InvalidGrade {
                subject: subject.clone(),
                grade: entry.grade.clone(),
            })?;
            pairs.push((subject, grade.label()));
        }

        GradeProfile::from_pairs(pairs).ok_or(IntakeViolation::MissingOverall)
    }

    fn cluster_weights(
        &self,
        request: &CourseCheckRequest,
    ) -> Result<ClusterWeights, IntakeViolation> {
        let supplied = request
            .cluster_weights
            .as_ref()
            .ok_or(IntakeViolation::MissingClusterWeights)?;

        let expected: BTreeSet<String> = expected_cluster_keys().collect();
        let missing: Vec<String> = expected
            .iter()
            .filter(|key| !supplied.contains_key(*key))
            .cloned()
            .collect();
        let unexpected: Vec<String> = supplied
            .keys()
            .filter(|key| !expected.contains(*key))
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(IntakeViolation::ClusterCoverage {
                missing,
                unexpected,
            });
        }

        if let Some((cluster, value)) = supplied
            .iter()
            .find(|(_, value)| !value.is_finite() || **value < 0.0 || **value > MAX_CLUSTER_WEIGHT)
        {
            return Err(IntakeViolation::ClusterWeightOutOfRange {
                cluster: cluster.clone(),
                value: *value,
            });
        }

        Ok(ClusterWeights::new(supplied.clone()))
    }
}
