use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pseudo-subject carrying the candidate's aggregate grade.
pub const OVERALL_SUBJECT: &str = "overall";

pub const CLUSTER_COUNT: u8 = 20;

pub const MAX_CLUSTER_WEIGHT: f64 = 100.0;

/// Candidate grades keyed by lower-cased, trimmed subject name.
///
/// The overall grade is kept both in the subject map (as `overall`) and as a
/// dedicated field so the minimum-grade check never has to search for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeProfile {
    subjects: BTreeMap<String, String>,
    overall: String,
}

impl GradeProfile {
    /// Builds a profile from validated subject/grade pairs.
    ///
    /// Returns `None` when no `overall` entry is present. Later duplicates of
    /// a subject overwrite earlier ones.
    pub fn from_pairs<I, S, G>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (S, G)>,
        S: AsRef<str>,
        G: AsRef<str>,
    {
        let mut subjects = BTreeMap::new();
        let mut overall = None;

        for (subject, grade) in pairs {
            let key = normalize_subject(subject.as_ref());
            let grade = grade.as_ref().trim().to_string();
            if key == OVERALL_SUBJECT {
                overall = Some(grade.clone());
            }
            subjects.insert(key, grade);
        }

        overall.map(|overall| Self { subjects, overall })
    }

    pub fn overall(&self) -> &str {
        &self.overall
    }

    pub fn subjects(&self) -> &BTreeMap<String, String> {
        &self.subjects
    }

    pub fn grade_for(&self, subject: &str) -> Option<&str> {
        self.subjects
            .get(&normalize_subject(subject))
            .map(String::as_str)
    }
}

pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// Cluster identifier (`cl1`..`cl20`) for a 1-based cluster number.
pub fn cluster_key(cluster_number: u8) -> String {
    format!("cl{cluster_number}")
}

pub fn expected_cluster_keys() -> impl Iterator<Item = String> {
    (1..=CLUSTER_COUNT).map(cluster_key)
}

/// Per-cluster aptitude weights supplied with degree requests.
///
/// Construction does not validate coverage; the intake guard rejects
/// incomplete maps before an engine ever sees them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterWeights(BTreeMap<String, f64>);

impl ClusterWeights {
    pub fn new(weights: BTreeMap<String, f64>) -> Self {
        Self(weights)
    }

    /// Weight for a cluster identifier such as `cl3`; absent clusters weigh 0.0.
    pub fn weight(&self, cluster: &str) -> f64 {
        self.0.get(cluster).copied().unwrap_or(0.0)
    }
}

impl FromIterator<(String, f64)> for ClusterWeights {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
