//! Qualification rules deciding whether one candidate meets one programme's requirements.
//!
//! Checks run in a fixed order and stop at the first failure: degree cut-off
//! points, then the overall minimum grade, then per-subject requirements.

mod decision;
pub mod grade;
mod profile;
mod rules;

#[cfg(test)]
mod tests;

pub use decision::{Decision, Rejection};
pub use grade::{Grade, UnknownGrade};
pub use profile::{
    cluster_key, expected_cluster_keys, normalize_subject, ClusterWeights, GradeProfile,
    CLUSTER_COUNT, MAX_CLUSTER_WEIGHT, OVERALL_SUBJECT,
};

use crate::catalog::{ProgrammeFamily, ProgrammeRecord};
use rules::RankedSubject;

/// Per-request evaluator bound to one candidate's grades, family and cluster weights.
///
/// Evaluation is pure: no I/O, no interior mutability, so a single engine may
/// be shared across threads sweeping different categories.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    family: ProgrammeFamily,
    subjects: Vec<RankedSubject>,
    weights: ClusterWeights,
}

impl EligibilityEngine {
    pub fn new(
        profile: &GradeProfile,
        family: ProgrammeFamily,
        weights: Option<ClusterWeights>,
    ) -> Self {
        let subjects = profile
            .subjects()
            .iter()
            .map(|(name, grade)| RankedSubject {
                name: name.clone(),
                rank: grade::rank(grade),
            })
            .collect();

        Self {
            family,
            subjects,
            weights: weights.unwrap_or_default(),
        }
    }

    /// Runs the ordered checks; `cluster_number` is the degree cluster (`"1"`..`"20"`).
    pub fn evaluate(
        &self,
        programme: &ProgrammeRecord,
        overall_grade: &str,
        cluster_number: Option<&str>,
    ) -> Decision {
        let outcome = rules::check_cut_off(self.family, &self.weights, programme, cluster_number)
            .and_then(|()| rules::check_minimum_grade(programme, overall_grade))
            .and_then(|()| rules::check_subjects(&self.subjects, programme));

        Decision::from(outcome)
    }

    pub fn qualifies(
        &self,
        programme: &ProgrammeRecord,
        overall_grade: &str,
        cluster_number: Option<&str>,
    ) -> bool {
        self.evaluate(programme, overall_grade, cluster_number)
            .is_qualified()
    }
}
