use std::sync::Arc;

use chrono::Utc;
use tracing::{info, trace};

use super::domain::{ClusterResult, CourseCheckRequest, CourseCheckResponse, ProgrammeView};
use super::intake::{CandidateProfile, IntakeGuard, IntakeViolation};
use super::repository::{CheckResultRecord, CheckResultRepository, RepositoryError};
use crate::catalog::{CatalogCache, CatalogStore, ProgrammeFamily};
use crate::eligibility::{Decision, EligibilityEngine};

/// Service composing the intake guard, the catalog cache and result storage.
pub struct CourseCheckService<S, R> {
    guard: IntakeGuard,
    catalog: Arc<CatalogCache<S>>,
    repository: Arc<R>,
}

impl<S, R> CourseCheckService<S, R>
where
    S: CatalogStore + 'static,
    R: CheckResultRepository + 'static,
{
    pub fn new(catalog: Arc<CatalogCache<S>>, repository: Arc<R>) -> Self {
        Self {
            guard: IntakeGuard,
            catalog,
            repository,
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogCache<S>> {
        &self.catalog
    }

    /// Validate, sweep the requested family and persist the outcome.
    pub fn check(
        &self,
        request: CourseCheckRequest,
    ) -> Result<CourseCheckResponse, CourseCheckError> {
        if !self.catalog.is_loaded() {
            return Err(CourseCheckError::CatalogUnavailable);
        }

        let candidate = self.guard.profile_from_request(&request)?;
        info!(
            family = %candidate.family,
            subjects = candidate.grades.subjects().len(),
            "checking courses"
        );

        let results = self.evaluate(&candidate);
        let created_at = Utc::now();
        info!(
            family = %candidate.family,
            categories = results.len(),
            "course check complete"
        );

        let record = CheckResultRecord {
            email: candidate.email,
            index_number: candidate.index_number,
            education_type: candidate.family,
            results,
            created_at,
        };
        self.repository.record(record.clone())?;

        Ok(CourseCheckResponse {
            email: record.email,
            index_number: record.index_number,
            education_type: record.education_type,
            results: record.results,
            timestamp: created_at.to_rfc3339(),
        })
    }

    /// Sweep every category of the candidate's family in fixed order.
    ///
    /// Categories with no qualifying programme are left out.
    pub fn evaluate(&self, candidate: &CandidateProfile) -> Vec<ClusterResult> {
        let family = candidate.family;
        let engine = EligibilityEngine::new(&candidate.grades, family, candidate.weights.clone());
        let overall = candidate.grades.overall();

        family
            .categories()
            .iter()
            .filter_map(|category| {
                let cluster_number = match family {
                    ProgrammeFamily::Degree => ProgrammeFamily::cluster_number(category),
                    _ => None,
                };
                let programmes = self.catalog.get(family, category);

                let qualified: Vec<ProgrammeView> = programmes
                    .iter()
                    .filter_map(|programme| {
                        match engine.evaluate(programme, overall, cluster_number) {
                            Decision::Qualified => Some(ProgrammeView::from(programme)),
                            Decision::Rejected { reason } => {
                                trace!(
                                    category,
                                    programme = %programme.programme_name,
                                    reason = %reason.summary(),
                                    "programme rejected"
                                );
                                None
                            }
                        }
                    })
                    .collect();

                (!qualified.is_empty()).then(|| ClusterResult {
                    cluster_name: category.to_string(),
                    programmes: qualified,
                })
            })
            .collect()
    }

    pub fn latest_result(&self, email: &str) -> Result<CheckResultRecord, CourseCheckError> {
        let record = self
            .repository
            .latest_for(email.trim())?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CourseCheckError {
    #[error("programme catalog has not been loaded")]
    CatalogUnavailable,
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
