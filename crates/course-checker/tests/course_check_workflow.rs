//! End-to-end course checks against an on-disk catalog, driven through the
//! public service facade and HTTP router.

mod common {
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use course_checker::catalog::{CatalogCache, JsonDirectoryStore};
    use course_checker::config::CatalogConfig;
    use course_checker::courses::{
        CheckResultRecord, CheckResultRepository, CourseCheckService, RepositoryError,
    };

    #[derive(Default)]
    pub struct MemoryResults {
        records: Mutex<Vec<CheckResultRecord>>,
    }

    impl MemoryResults {
        pub fn len(&self) -> usize {
            self.records.lock().expect("results mutex poisoned").len()
        }
    }

    impl CheckResultRepository for MemoryResults {
        fn record(&self, record: CheckResultRecord) -> Result<(), RepositoryError> {
            self.records
                .lock()
                .expect("results mutex poisoned")
                .push(record);
            Ok(())
        }

        fn latest_for(&self, email: &str) -> Result<Option<CheckResultRecord>, RepositoryError> {
            let records = self.records.lock().expect("results mutex poisoned");
            Ok(records
                .iter()
                .rev()
                .find(|record| record.email.eq_ignore_ascii_case(email))
                .cloned())
        }
    }

    fn write_category(root: &Path, database: &str, category: &str, documents: Value) {
        let dir = root.join(database);
        fs::create_dir_all(&dir).expect("create database dir");
        fs::write(
            dir.join(format!("{category}.json")),
            serde_json::to_vec_pretty(&documents).expect("serialize documents"),
        )
        .expect("write category");
    }

    pub fn seeded_catalog() -> (TempDir, CatalogConfig) {
        let dir = TempDir::new().expect("tempdir");
        let config = CatalogConfig {
            root: dir.path().to_path_buf(),
            ..CatalogConfig::default()
        };

        write_category(
            dir.path(),
            &config.degree_db,
            "cluster_3",
            json!([
                {
                    "programme_name": "Bachelor of Science (Actuarial Science)",
                    "programme_code": "1111105",
                    "institution_name": "University of Nairobi",
                    "cut_off_points": 30.0,
                    "minimum_grade": { "mean_grade": "C" },
                    "minimum_subject_requirements": { "Mathematics": "B" }
                }
            ]),
        );
        write_category(
            dir.path(),
            &config.degree_db,
            "cluster_7",
            json!([
                {
                    "programme_name": "Bachelor of Architecture",
                    "cut_off_points": 41.2,
                    "minimum_grade": "C+"
                }
            ]),
        );
        write_category(
            dir.path(),
            &config.diploma_db,
            "Computing_IT_Related",
            json!([
                {
                    "programme_name": "Diploma in Information Technology",
                    "programme_code": 4417,
                    "minimum_grade": "C-",
                    "minimum_subject_requirements": { "Math/Computer Studies": "C-" }
                }
            ]),
        );
        fs::create_dir_all(dir.path().join(&config.certificate_db)).expect("cert dir");
        fs::write(
            dir.path()
                .join(&config.certificate_db)
                .join("Business_Related.json"),
            b"{ not json",
        )
        .expect("write corrupt category");

        (dir, config)
    }

    pub fn service(
        config: &CatalogConfig,
    ) -> Arc<CourseCheckService<JsonDirectoryStore, MemoryResults>> {
        let store = Arc::new(JsonDirectoryStore::from_config(config));
        let cache = CatalogCache::from_config(store, config);
        cache.initialize().expect("catalog initializes");
        Arc::new(CourseCheckService::new(
            Arc::new(cache),
            Arc::new(MemoryResults::default()),
        ))
    }

    pub fn cluster_weights(cl3: f64) -> Value {
        let weights: serde_json::Map<String, Value> = (1..=20)
            .map(|cluster| {
                let weight = if cluster == 3 { cl3 } else { 35.0 };
                (format!("cl{cluster}"), json!(weight))
            })
            .collect();
        Value::Object(weights)
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use course_checker::catalog::{CatalogCache, JsonDirectoryStore, ProgrammeFamily};
use course_checker::courses::course_router;

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn post_check(payload: Value) -> Request<Body> {
    Request::post("/api/courses/check")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
        .expect("request")
}

#[tokio::test]
async fn degree_check_end_to_end() {
    let (_dir, config) = common::seeded_catalog();
    let service = common::service(&config);
    let router = course_router(service.clone());

    let response = router
        .clone()
        .oneshot(post_check(json!({
            "email": "wanjiru@example.com",
            "index_number": "20512001/023",
            "education_type": "degree",
            "subjects": [
                { "subject": "overall", "grade": "C+" },
                { "subject": "Mathematics", "grade": "A" },
                { "subject": "English", "grade": "B+" }
            ],
            "cluster_weights": common::cluster_weights(34.486)
        })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let results = body["results"].as_array().expect("results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["cluster_name"], "cluster_3");
    assert_eq!(
        results[0]["programmes"][0]["institution_name"],
        "University of Nairobi"
    );

    let stored = router
        .oneshot(
            Request::get("/api/courses/results/wanjiru@example.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(stored.status(), StatusCode::OK);
    let stored = read_json(stored).await;
    assert_eq!(stored["results"], body["results"]);
}

#[tokio::test]
async fn diploma_check_matches_alternative_subjects() {
    let (_dir, config) = common::seeded_catalog();
    let service = common::service(&config);

    let response = course_router(service)
        .oneshot(post_check(json!({
            "email": "otieno@example.com",
            "index_number": "20512001/044",
            "education_type": "diploma",
            "subjects": [
                { "subject": "overall", "grade": "C-" },
                { "subject": "computer studies", "grade": "B" }
            ]
        })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["results"][0]["cluster_name"], "Computing_IT_Related");
    assert_eq!(body["results"][0]["programmes"][0]["programme_code"], "4417");
}

#[tokio::test]
async fn invalid_weights_are_rejected() {
    let (_dir, config) = common::seeded_catalog();
    let service = common::service(&config);

    let response = course_router(service)
        .oneshot(post_check(json!({
            "email": "wanjiru@example.com",
            "index_number": "20512001/023",
            "education_type": "degree",
            "subjects": [{ "subject": "overall", "grade": "B" }],
            "cluster_weights": { "cl1": 40.0 }
        })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn missing_and_corrupt_categories_do_not_block_refresh() {
    let (_dir, config) = common::seeded_catalog();
    let store = Arc::new(JsonDirectoryStore::from_config(&config));
    let cache = CatalogCache::from_config(store, &config);

    let report = cache.refresh().expect("refresh succeeds");

    assert_eq!(report.categories, 63);
    assert_eq!(report.programmes, 3);
    assert!(report
        .failed
        .iter()
        .any(|failure| failure.family == ProgrammeFamily::Certificate
            && failure.category == "Business_Related"));
    assert!(cache.get(ProgrammeFamily::Certificate, "Business_Related").is_empty());
    assert_eq!(cache.degree_cluster(7).len(), 1);
}

#[test]
fn missing_catalog_root_is_fatal() {
    let (dir, config) = common::seeded_catalog();
    let missing = course_checker::config::CatalogConfig {
        root: dir.path().join("absent"),
        ..config
    };
    let store = Arc::new(JsonDirectoryStore::from_config(&missing));
    let cache = CatalogCache::from_config(store, &missing);

    assert!(cache.initialize().is_err());
    assert!(!cache.is_loaded());
}

#[tokio::test]
async fn results_accumulate_per_check() {
    let (_dir, config) = common::seeded_catalog();
    let repository = Arc::new(common::MemoryResults::default());
    let store = Arc::new(JsonDirectoryStore::from_config(&config));
    let cache = CatalogCache::from_config(store, &config);
    cache.initialize().expect("catalog initializes");
    let service = Arc::new(course_checker::courses::CourseCheckService::new(
        Arc::new(cache),
        repository.clone(),
    ));

    for _ in 0..2 {
        let response = course_router(service.clone())
            .oneshot(post_check(json!({
                "email": "achieng@example.com",
                "index_number": "20512001/051",
                "education_type": "kmtc",
                "subjects": [{ "subject": "overall", "grade": "B" }]
            })))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(repository.len(), 2);
}
