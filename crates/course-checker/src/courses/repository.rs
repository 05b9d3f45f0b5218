use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ClusterResult;
use crate::catalog::ProgrammeFamily;

/// Persisted outcome of one course check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResultRecord {
    pub email: String,
    pub index_number: String,
    pub education_type: ProgrammeFamily,
    pub results: Vec<ClusterResult>,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the service can be exercised without a database.
pub trait CheckResultRepository: Send + Sync {
    fn record(&self, record: CheckResultRecord) -> Result<(), RepositoryError>;
    /// Most recently recorded result for `email`, compared case-insensitively.
    fn latest_for(&self, email: &str) -> Result<Option<CheckResultRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
