use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::scoring::router::scoring_router;
use crate::scoring::service::SurveyScoringService;

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn router_with(store: MemoryCatalogStore) -> axum::Router {
    scoring_router(Arc::new(SurveyScoringService::new(Arc::new(store))))
}

fn scoring_request_body() -> Value {
    json!({
        "test_type": "DISC",
        "language": "EN",
        "answers": {
            "Q1: color": "Red",
            "Q2: size": "3",
        },
    })
}

#[tokio::test]
async fn score_endpoint_returns_the_assembled_result() {
    let store = MemoryCatalogStore::default()
        .with_questions(color_and_scale_catalog("DISC", "EN"))
        .with_profiles(
            "DISC",
            "EN",
            profile_catalog(vec![profile("X", "Explorer", "Curious and bold")]),
        );

    let response = router_with(store)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scoring/runs")
                .header("content-type", "application/json")
                .body(Body::from(scoring_request_body().to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["scores"]["X"], json!(4.0));
    assert_eq!(body["profile_title"], json!("Explorer"));
    assert_eq!(body["fields"]["profile_final"], json!("X"));
}

#[tokio::test]
async fn score_endpoint_reports_missing_catalogs_as_not_found() {
    let response = router_with(MemoryCatalogStore::default())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scoring/runs")
                .header("content-type", "application/json")
                .body(Body::from(scoring_request_body().to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("no question catalog"));
}

#[tokio::test]
async fn numeric_answers_deserialize_alongside_text() {
    let store =
        MemoryCatalogStore::default().with_questions(color_and_scale_catalog("DISC", "EN"));

    let payload = json!({
        "test_type": "DISC",
        "language": "EN",
        "answers": {
            "Q2: size": 4,
        },
    });

    let response = router_with(store)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scoring/runs")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["scores"]["X"], json!(4.0));
}

#[tokio::test]
async fn catalog_endpoint_summarizes_existing_partitions() {
    let store = MemoryCatalogStore::default()
        .with_questions(color_and_scale_catalog("DISC", "EN"))
        .with_profiles(
            "DISC",
            "EN",
            profile_catalog(vec![profile("X", "Explorer", "")]),
        );

    let response = router_with(store)
        .oneshot(
            Request::builder()
                .uri("/api/v1/scoring/catalogs/DISC/EN")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["questions"], json!(2));
    assert_eq!(body["profiles"], json!(1));
}

#[tokio::test]
async fn catalog_endpoint_returns_not_found_for_absent_partitions() {
    let response = router_with(MemoryCatalogStore::default())
        .oneshot(
            Request::builder()
                .uri("/api/v1/scoring/catalogs/DISC/EN")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let service = Arc::new(SurveyScoringService::new(Arc::new(UnavailableCatalogStore)));
    let response = scoring_router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scoring/runs")
                .header("content-type", "application/json")
                .body(Body::from(scoring_request_body().to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
