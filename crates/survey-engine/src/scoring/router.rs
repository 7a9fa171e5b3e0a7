use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::catalog::CatalogStore;
use super::domain::ScoringRequest;
use super::service::{ScoringServiceError, SurveyScoringService};

/// Router builder exposing HTTP endpoints for scoring runs and catalog
/// inspection.
pub fn scoring_router<C>(service: Arc<SurveyScoringService<C>>) -> Router
where
    C: CatalogStore + 'static,
{
    Router::new()
        .route("/api/v1/scoring/runs", post(score_handler::<C>))
        .route(
            "/api/v1/scoring/catalogs/:test_type/:language",
            get(catalog_handler::<C>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<C>(
    State(service): State<Arc<SurveyScoringService<C>>>,
    axum::Json(request): axum::Json<ScoringRequest>,
) -> Response
where
    C: CatalogStore + 'static,
{
    match service.run(&request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error @ ScoringServiceError::MissingCatalog { .. }) => {
            let payload = json!({
                "error": error.to_string(),
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

pub(crate) async fn catalog_handler<C>(
    State(service): State<Arc<SurveyScoringService<C>>>,
    Path((test_type, language)): Path<(String, String)>,
) -> Response
where
    C: CatalogStore + 'static,
{
    match service.catalog_summary(&test_type, &language) {
        Ok(Some(summary)) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "catalog partition not found",
                "test_type": test_type,
                "language": language,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
