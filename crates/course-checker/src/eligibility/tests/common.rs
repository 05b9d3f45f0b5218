use crate::catalog::{ProgrammeFamily, ProgrammeRecord};
use crate::eligibility::{cluster_key, ClusterWeights, EligibilityEngine, GradeProfile};

pub(super) fn profile(pairs: &[(&str, &str)]) -> GradeProfile {
    GradeProfile::from_pairs(pairs.iter().copied()).expect("profile includes overall grade")
}

/// Candidate from the worked degree scenario: overall C+, strong maths and English.
pub(super) fn degree_profile() -> GradeProfile {
    profile(&[("overall", "C+"), ("mathematics", "A"), ("english", "B+")])
}

/// All twenty clusters at `base`, with `cl3` overridden.
pub(super) fn weights_with_cl3(base: f64, cl3: f64) -> ClusterWeights {
    (1..=20)
        .map(|cluster| {
            let weight = if cluster == 3 { cl3 } else { base };
            (cluster_key(cluster), weight)
        })
        .collect()
}

pub(super) fn degree_engine(cl3: f64) -> EligibilityEngine {
    EligibilityEngine::new(
        &degree_profile(),
        ProgrammeFamily::Degree,
        Some(weights_with_cl3(25.0, cl3)),
    )
}

pub(super) fn engine_for(family: ProgrammeFamily, pairs: &[(&str, &str)]) -> EligibilityEngine {
    EligibilityEngine::new(&profile(pairs), family, None)
}

pub(super) fn actuarial_science() -> ProgrammeRecord {
    ProgrammeRecord::new("Bachelor of Science (Actuarial Science)")
        .with_code("1111105")
        .with_institution("University of Nairobi")
        .with_cut_off(30.0)
        .with_minimum_grade("C")
        .with_requirement("Mathematics", "B")
}

pub(super) fn open_programme() -> ProgrammeRecord {
    ProgrammeRecord::new("Certificate in Community Development")
}
