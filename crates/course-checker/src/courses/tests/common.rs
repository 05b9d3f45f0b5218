use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Duration;
use serde_json::{json, Value};

use crate::catalog::{CatalogCache, CatalogStore, CatalogStoreError, ProgrammeFamily};
use crate::courses::domain::{CourseCheckRequest, SubjectGrade};
use crate::courses::repository::{CheckResultRecord, CheckResultRepository, RepositoryError};
use crate::courses::CourseCheckService;
use crate::eligibility::cluster_key;

/// Catalog backed by an in-memory document map; unknown categories are empty.
#[derive(Default)]
pub(super) struct StaticStore {
    pub(super) offline: bool,
    pub(super) documents: Mutex<HashMap<(ProgrammeFamily, String), Vec<Value>>>,
}

impl StaticStore {
    pub(super) fn with(
        self,
        family: ProgrammeFamily,
        category: &str,
        documents: Vec<Value>,
    ) -> Self {
        self.replace(family, category, documents);
        self
    }

    /// Swaps a category's documents; the next catalog refresh picks them up.
    pub(super) fn replace(&self, family: ProgrammeFamily, category: &str, documents: Vec<Value>) {
        self.documents
            .lock()
            .expect("documents lock")
            .insert((family, category.to_string()), documents);
    }
}

impl CatalogStore for StaticStore {
    fn ping(&self) -> Result<(), CatalogStoreError> {
        if self.offline {
            return Err(CatalogStoreError::Unreachable("store offline".to_string()));
        }
        Ok(())
    }

    fn load_category(
        &self,
        family: ProgrammeFamily,
        category: &str,
    ) -> Result<Vec<Value>, CatalogStoreError> {
        Ok(self
            .documents
            .lock()
            .expect("documents lock")
            .get(&(family, category.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

pub(super) fn catalog_store() -> StaticStore {
    StaticStore::default()
        .with(
            ProgrammeFamily::Degree,
            "cluster_3",
            vec![
                json!({
                    "programme_name": "Bachelor of Science (Actuarial Science)",
                    "programme_code": 1111105,
                    "institution_name": "University of Nairobi",
                    "cut_off_points": 30.0,
                    "minimum_grade": { "mean_grade": "C" },
                    "minimum_subject_requirements": { "Mathematics": "B" },
                }),
                json!({
                    "programme_name": "Bachelor of Economics",
                    "programme_code": "1263134",
                    "institution_name": "Moi University",
                    "cut_off_points": "40.112",
                    "minimum_grade": "C+",
                }),
            ],
        )
        .with(
            ProgrammeFamily::Degree,
            "cluster_1",
            vec![json!({
                "programme_name": "Bachelor of Laws",
                "institution_name": "Kenyatta University",
                "cut_off_points": 20.5,
                "minimum_grade": "B",
                "minimum_subject_requirements": { "English/Kiswahili": "B+" },
            })],
        )
        .with(
            ProgrammeFamily::Diploma,
            "Engineering_Technology_Related",
            vec![
                json!({
                    "programme_name": "Diploma in Civil Engineering",
                    "institution_name": "Kenya Polytechnic",
                    "minimum_grade": "C-",
                    "minimum_subject_requirements": { "Math/Physics": "C-" },
                }),
                json!({
                    "programme_name": "Diploma in Aeronautical Engineering",
                    "minimum_grade": "B",
                }),
            ],
        )
        .with(
            ProgrammeFamily::Diploma,
            "Business_Related",
            vec![
                json!({ "programme_name": "Diploma in Business Management" }),
                json!("not a programme"),
            ],
        )
        .with(
            ProgrammeFamily::MedicalTraining,
            "kmtc",
            vec![json!({
                "programme_name": "Diploma in Clinical Medicine",
                "minimum_grade": "C",
                "minimum_subject_requirements": { "Biology": "C", "Chemistry": "C-" },
            })],
        )
}

pub(super) fn loaded_cache(store: StaticStore) -> Arc<CatalogCache<StaticStore>> {
    let cache = CatalogCache::new(Arc::new(store), Duration::hours(6));
    cache.initialize().expect("catalog loads");
    Arc::new(cache)
}

pub(super) fn build_service() -> (
    CourseCheckService<StaticStore, MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CourseCheckService::new(loaded_cache(catalog_store()), repository.clone());
    (service, repository)
}

pub(super) fn unloaded_service() -> CourseCheckService<StaticStore, MemoryRepository> {
    let cache = CatalogCache::new(Arc::new(catalog_store()), Duration::hours(6));
    CourseCheckService::new(Arc::new(cache), Arc::new(MemoryRepository::default()))
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<CheckResultRecord>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<CheckResultRecord> {
        self.records.lock().expect("repo mutex poisoned").clone()
    }
}

impl CheckResultRepository for MemoryRepository {
    fn record(&self, record: CheckResultRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repo mutex poisoned")
            .push(record);
        Ok(())
    }

    fn latest_for(&self, email: &str) -> Result<Option<CheckResultRecord>, RepositoryError> {
        let records = self.records.lock().expect("repo mutex poisoned");
        Ok(records
            .iter()
            .rev()
            .find(|record| record.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl CheckResultRepository for UnavailableRepository {
    fn record(&self, _record: CheckResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_for(&self, _email: &str) -> Result<Option<CheckResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn cluster_weights(base: f64, cl3: f64) -> BTreeMap<String, f64> {
    (1..=20)
        .map(|cluster| (cluster_key(cluster), if cluster == 3 { cl3 } else { base }))
        .collect()
}

pub(super) fn degree_request(cl3: f64) -> CourseCheckRequest {
    CourseCheckRequest {
        email: "candidate@example.com".to_string(),
        index_number: "12345678/001".to_string(),
        education_type: ProgrammeFamily::Degree,
        subjects: vec![
            SubjectGrade::new("overall", "C+"),
            SubjectGrade::new("mathematics", "A"),
            SubjectGrade::new("english", "B+"),
        ],
        cluster_weights: Some(cluster_weights(18.0, cl3)),
    }
}

pub(super) fn request_for(
    family: ProgrammeFamily,
    subjects: &[(&str, &str)],
) -> CourseCheckRequest {
    CourseCheckRequest {
        email: "candidate@example.com".to_string(),
        index_number: "12345678/001".to_string(),
        education_type: family,
        subjects: subjects
            .iter()
            .map(|(subject, grade)| SubjectGrade::new(*subject, *grade))
            .collect(),
        cluster_weights: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
