use super::decision::Rejection;
use super::grade;
use super::profile::ClusterWeights;
use crate::catalog::{
    CutOffPoints, MinimumGrade, ProgrammeFamily, ProgrammeRecord, SubjectRequirement,
    SubjectRequirements,
};

/// Candidate subject with its grade ranked once at engine construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankedSubject {
    pub name: String,
    pub rank: u8,
}

/// Degree-only numeric cut-off. Vacuous without a cluster number or a numeric cut-off.
pub(crate) fn check_cut_off(
    family: ProgrammeFamily,
    weights: &ClusterWeights,
    programme: &ProgrammeRecord,
    cluster_number: Option<&str>,
) -> Result<(), Rejection> {
    if !family.uses_cut_off_points() {
        return Ok(());
    }
    let Some(cluster_number) = cluster_number else {
        return Ok(());
    };
    let CutOffPoints::Points(required) = programme.cut_off_points else {
        return Ok(());
    };

    let cluster = format!("cl{}", cluster_number.trim());
    let actual = weights.weight(&cluster);
    if actual >= required {
        Ok(())
    } else {
        Err(Rejection::CutOffNotMet {
            cluster,
            required,
            actual,
        })
    }
}

pub(crate) fn check_minimum_grade(
    programme: &ProgrammeRecord,
    overall_grade: &str,
) -> Result<(), Rejection> {
    match &programme.minimum_grade {
        MinimumGrade::Absent => Ok(()),
        MinimumGrade::Grade(required) => {
            if grade::rank(overall_grade) >= grade::rank(required) {
                Ok(())
            } else {
                Err(Rejection::MinimumGradeNotMet {
                    required: required.clone(),
                    actual: overall_grade.to_string(),
                })
            }
        }
        MinimumGrade::Malformed(detail) => Err(Rejection::MalformedRecord {
            field: "minimum_grade",
            detail: detail.clone(),
        }),
    }
}

pub(crate) fn check_subjects(
    subjects: &[RankedSubject],
    programme: &ProgrammeRecord,
) -> Result<(), Rejection> {
    let requirements = match &programme.subject_requirements {
        SubjectRequirements::Absent => return Ok(()),
        SubjectRequirements::Declared(requirements) => requirements,
        SubjectRequirements::Malformed(detail) => {
            return Err(Rejection::MalformedRecord {
                field: "minimum_subject_requirements",
                detail: detail.clone(),
            })
        }
    };

    match requirements
        .iter()
        .find(|requirement| !requirement_met(subjects, requirement))
    {
        Some(unmet) => Err(Rejection::SubjectRequirementNotMet {
            requirement: unmet.key.clone(),
            required_grade: unmet.minimum_grade.clone(),
        }),
        None => Ok(()),
    }
}

// Alternatives are OR-ed: one satisfied alternative meets the requirement.
fn requirement_met(subjects: &[RankedSubject], requirement: &SubjectRequirement) -> bool {
    let required_rank = grade::rank(&requirement.minimum_grade);
    requirement
        .alternatives
        .iter()
        .any(|alternative| has_subject_at(subjects, alternative, required_rank))
}

/// Bidirectional, case-insensitive substring match so naming variants such as
/// "math" and "mathematics" line up. Can over-match short names.
fn has_subject_at(subjects: &[RankedSubject], required_subject: &str, required_rank: u8) -> bool {
    subjects.iter().any(|subject| {
        names_match(&subject.name, required_subject) && subject.rank >= required_rank
    })
}

fn names_match(candidate: &str, required: &str) -> bool {
    !candidate.is_empty()
        && !required.is_empty()
        && (candidate.contains(required) || required.contains(candidate))
}
