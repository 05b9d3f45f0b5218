use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::CourseCheckRequest;
use super::repository::{CheckResultRepository, RepositoryError};
use super::service::{CourseCheckError, CourseCheckService};
use crate::catalog::CatalogStore;

/// Router builder exposing the course check endpoints.
pub fn course_router<S, R>(service: Arc<CourseCheckService<S, R>>) -> Router
where
    S: CatalogStore + 'static,
    R: CheckResultRepository + 'static,
{
    Router::new()
        .route("/api/courses/check", post(check_handler::<S, R>))
        .route("/api/courses/results/:email", get(results_handler::<S, R>))
        .route("/api/courses/catalog", get(catalog_handler::<S, R>))
        .with_state(service)
}

pub(crate) async fn check_handler<S, R>(
    State(service): State<Arc<CourseCheckService<S, R>>>,
    axum::Json(request): axum::Json<CourseCheckRequest>,
) -> Response
where
    S: CatalogStore + 'static,
    R: CheckResultRepository + 'static,
{
    match service.check(request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(CourseCheckError::Intake(violation)) => {
            tracing::warn!(error = %violation, "rejected course check request");
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(CourseCheckError::CatalogUnavailable) => {
            let payload = json!({
                "error": CourseCheckError::CatalogUnavailable.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "course check failed");
            let payload = json!({
                "error": "failed to check courses",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn results_handler<S, R>(
    State(service): State<Arc<CourseCheckService<S, R>>>,
    Path(email): Path<String>,
) -> Response
where
    S: CatalogStore + 'static,
    R: CheckResultRepository + 'static,
{
    match service.latest_result(&email) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(CourseCheckError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("no course check results for {email}"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn catalog_handler<S, R>(
    State(service): State<Arc<CourseCheckService<S, R>>>,
) -> Response
where
    S: CatalogStore + 'static,
    R: CheckResultRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().summary())).into_response()
}
