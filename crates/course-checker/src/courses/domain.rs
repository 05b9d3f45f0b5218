use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CutOffPoints, ProgrammeFamily, ProgrammeRecord, SubjectRequirements};

/// One reported subject result, e.g. `{"subject": "mathematics", "grade": "A"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject: String,
    pub grade: String,
}

impl SubjectGrade {
    pub fn new(subject: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            grade: grade.into(),
        }
    }
}

/// Inbound payload for `POST /api/courses/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCheckRequest {
    pub email: String,
    pub index_number: String,
    pub education_type: ProgrammeFamily,
    pub subjects: Vec<SubjectGrade>,
    /// Required for degree checks only; `cl1`..`cl20`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_weights: Option<BTreeMap<String, f64>>,
}

/// Programme as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeView {
    pub institution_name: String,
    pub programme_name: String,
    pub programme_code: Option<String>,
    pub cut_off_points: Option<f64>,
    pub minimum_grade: Option<String>,
    pub minimum_subject_requirements: BTreeMap<String, String>,
}

impl From<&ProgrammeRecord> for ProgrammeView {
    fn from(record: &ProgrammeRecord) -> Self {
        let minimum_grade = record.minimum_grade.as_grade().map(str::to_string);

        let minimum_subject_requirements = match &record.subject_requirements {
            SubjectRequirements::Declared(requirements) => requirements
                .iter()
                .map(|requirement| (requirement.key.clone(), requirement.minimum_grade.clone()))
                .collect(),
            SubjectRequirements::Absent | SubjectRequirements::Malformed(_) => BTreeMap::new(),
        };

        let cut_off_points = match record.cut_off_points {
            CutOffPoints::Points(points) => Some(points),
            CutOffPoints::Absent | CutOffPoints::Unparseable(_) => None,
        };

        Self {
            institution_name: record.institution_name.clone().unwrap_or_default(),
            programme_name: record.programme_name.clone(),
            programme_code: record.programme_code.clone(),
            cut_off_points,
            minimum_grade,
            minimum_subject_requirements,
        }
    }
}

/// Qualifying programmes of one category (`cluster_3`, `Engineering`, `kmtc`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub cluster_name: String,
    pub programmes: Vec<ProgrammeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseCheckResponse {
    pub email: String,
    pub index_number: String,
    pub education_type: ProgrammeFamily,
    pub results: Vec<ClusterResult>,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl CourseCheckResponse {
    pub fn programme_count(&self) -> usize {
        self.results
            .iter()
            .map(|cluster| cluster.programmes.len())
            .sum()
    }
}
