use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Programme minimum grade as declared by the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MinimumGrade {
    Absent,
    Grade(String),
    /// The field held a value that is neither a grade string nor a `mean_grade` object.
    Malformed(String),
}

impl MinimumGrade {
    pub fn as_grade(&self) -> Option<&str> {
        match self {
            MinimumGrade::Grade(grade) => Some(grade),
            _ => None,
        }
    }
}

/// One `subject -> grade` requirement; `Math/Statistics` style keys become alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRequirement {
    pub key: String,
    pub alternatives: Vec<String>,
    pub minimum_grade: String,
}

impl SubjectRequirement {
    pub fn new(key: impl Into<String>, minimum_grade: impl Into<String>) -> Self {
        let key = key.into();
        let alternatives = key
            .split('/')
            .map(|subject| subject.trim().to_lowercase())
            .filter(|subject| !subject.is_empty())
            .collect();

        Self {
            key,
            alternatives,
            minimum_grade: minimum_grade.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SubjectRequirements {
    Absent,
    Declared(Vec<SubjectRequirement>),
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CutOffPoints {
    Absent,
    Points(f64),
    Unparseable(String),
}

impl CutOffPoints {
    pub fn points(&self) -> Option<f64> {
        match self {
            CutOffPoints::Points(points) => Some(*points),
            _ => None,
        }
    }
}

/// Read-only snapshot of one admissible programme offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeRecord {
    pub programme_name: String,
    pub programme_code: Option<String>,
    pub institution_name: Option<String>,
    pub minimum_grade: MinimumGrade,
    pub subject_requirements: SubjectRequirements,
    pub cut_off_points: CutOffPoints,
}

/// Document that could not be coerced into a [`ProgrammeRecord`] at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("programme document is not an object (found {found})")]
pub struct NotADocument {
    pub found: &'static str,
}

impl ProgrammeRecord {
    pub fn new(programme_name: impl Into<String>) -> Self {
        Self {
            programme_name: programme_name.into(),
            programme_code: None,
            institution_name: None,
            minimum_grade: MinimumGrade::Absent,
            subject_requirements: SubjectRequirements::Absent,
            cut_off_points: CutOffPoints::Absent,
        }
    }

    /// Coerces an untyped catalog document once, at cache-load time.
    pub fn from_document(document: &Value) -> Result<Self, NotADocument> {
        let fields = document.as_object().ok_or(NotADocument {
            found: json_type(document),
        })?;

        Ok(Self {
            programme_name: fields
                .get("programme_name")
                .and_then(scalar_text)
                .unwrap_or_default(),
            programme_code: fields
                .get("programme_code")
                .and_then(scalar_text)
                .filter(|code| !code.is_empty()),
            institution_name: fields
                .get("institution_name")
                .and_then(scalar_text)
                .filter(|name| !name.is_empty()),
            minimum_grade: coerce_minimum_grade(fields.get("minimum_grade")),
            subject_requirements: coerce_subject_requirements(
                fields.get("minimum_subject_requirements"),
            ),
            cut_off_points: coerce_cut_off(fields.get("cut_off_points")),
        })
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.programme_code = Some(code.into());
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution_name = Some(institution.into());
        self
    }

    pub fn with_minimum_grade(mut self, grade: impl Into<String>) -> Self {
        self.minimum_grade = MinimumGrade::Grade(grade.into());
        self
    }

    pub fn with_requirement(mut self, key: &str, grade: &str) -> Self {
        let requirement = SubjectRequirement::new(key, grade);
        match &mut self.subject_requirements {
            SubjectRequirements::Declared(list) => list.push(requirement),
            other => *other = SubjectRequirements::Declared(vec![requirement]),
        }
        self
    }

    pub fn with_cut_off(mut self, points: f64) -> Self {
        self.cut_off_points = CutOffPoints::Points(points);
        self
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn coerce_minimum_grade(value: Option<&Value>) -> MinimumGrade {
    match value {
        None | Some(Value::Null) => MinimumGrade::Absent,
        Some(Value::String(grade)) => non_empty_grade(grade),
        Some(Value::Object(fields)) => match fields.get("mean_grade") {
            None | Some(Value::Null) => MinimumGrade::Absent,
            Some(Value::String(grade)) => non_empty_grade(grade),
            Some(other) => MinimumGrade::Malformed(format!("mean_grade is {}", json_type(other))),
        },
        Some(other) => MinimumGrade::Malformed(format!("minimum_grade is {}", json_type(other))),
    }
}

fn non_empty_grade(grade: &str) -> MinimumGrade {
    let grade = grade.trim();
    if grade.is_empty() {
        MinimumGrade::Absent
    } else {
        MinimumGrade::Grade(grade.to_string())
    }
}

fn coerce_subject_requirements(value: Option<&Value>) -> SubjectRequirements {
    match value {
        None | Some(Value::Null) => SubjectRequirements::Absent,
        Some(Value::Object(entries)) => SubjectRequirements::Declared(requirement_list(entries)),
        Some(other) => SubjectRequirements::Malformed(format!(
            "minimum_subject_requirements is {}",
            json_type(other)
        )),
    }
}

// Entries without a usable key or a string grade are skipped rather than failing the record.
fn requirement_list(entries: &Map<String, Value>) -> Vec<SubjectRequirement> {
    entries
        .iter()
        .filter_map(|(key, grade)| match grade {
            Value::String(grade) if !key.trim().is_empty() && !grade.trim().is_empty() => {
                Some(SubjectRequirement::new(key.as_str(), grade.trim()))
            }
            _ => None,
        })
        .filter(|requirement| !requirement.alternatives.is_empty())
        .collect()
}

fn coerce_cut_off(value: Option<&Value>) -> CutOffPoints {
    match value {
        None | Some(Value::Null) => CutOffPoints::Absent,
        Some(Value::Number(number)) => number
            .as_f64()
            .map(CutOffPoints::Points)
            .unwrap_or_else(|| CutOffPoints::Unparseable(number.to_string())),
        Some(Value::String(raw)) => match raw.trim().parse::<f64>() {
            Ok(points) if points.is_finite() => CutOffPoints::Points(points),
            _ if raw.trim().is_empty() => CutOffPoints::Absent,
            _ => CutOffPoints::Unparseable(raw.clone()),
        },
        Some(other) => CutOffPoints::Unparseable(other.to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
