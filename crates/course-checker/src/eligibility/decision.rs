use serde::Serialize;

/// Outcome of evaluating one programme for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Qualified,
    Rejected { reason: Rejection },
}

impl Decision {
    pub fn is_qualified(&self) -> bool {
        matches!(self, Decision::Qualified)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Qualified => None,
            Decision::Rejected { reason } => Some(reason),
        }
    }
}

impl From<Result<(), Rejection>> for Decision {
    fn from(value: Result<(), Rejection>) -> Self {
        match value {
            Ok(()) => Decision::Qualified,
            Err(reason) => Decision::Rejected { reason },
        }
    }
}

/// Why a programme was not offered. Malformed data stays distinguishable from
/// a correctly evaluated failure even though both exclude the programme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Rejection {
    CutOffNotMet {
        cluster: String,
        required: f64,
        actual: f64,
    },
    MinimumGradeNotMet {
        required: String,
        actual: String,
    },
    SubjectRequirementNotMet {
        requirement: String,
        required_grade: String,
    },
    MalformedRecord {
        field: &'static str,
        detail: String,
    },
}

impl Rejection {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Rejection::MalformedRecord { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            Rejection::CutOffNotMet {
                cluster,
                required,
                actual,
            } => format!("{cluster} weight {actual:.3} below cut-off {required:.3}"),
            Rejection::MinimumGradeNotMet { required, actual } => {
                format!("overall grade {actual} below minimum {required}")
            }
            Rejection::SubjectRequirementNotMet {
                requirement,
                required_grade,
            } => format!("requires {requirement} at {required_grade} or better"),
            Rejection::MalformedRecord { field, detail } => {
                format!("malformed {field}: {detail}")
            }
        }
    }
}
