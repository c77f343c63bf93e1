//! Mock API routes, driven in-process through the router.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use trendlens_mock_server::{build_router, MockState};

async fn call(router: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = call(router, "GET", uri, None).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get_json(build_router(MockState::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn lists_canned_pipelines() {
    let (status, body) = get_json(build_router(MockState::new()), "/api/mlops/pipelines").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["trend_analysis", "data_ingestion", "model_training"]);
    assert!(body[0]["steps"].as_array().unwrap().len() > 1);
    assert!(body[0]["lastRun"].is_string());
}

#[tokio::test]
async fn unknown_pipeline_is_404_with_error_body() {
    let (status, body) = get_json(build_router(MockState::new()), "/api/mlops/pipelines/etl").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "etl not found"}));
}

#[tokio::test]
async fn execute_returns_accepted_and_records_run() {
    let state = MockState::new();
    let router = build_router(state.clone());

    let (status, bytes) = call(
        router.clone(),
        "POST",
        "/api/mlops/pipelines/trend_analysis/execute",
        Some(json!({})),
    )
    .await;
    let ack: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(ack["status"], "started");
    assert_eq!(ack["pipelineId"], "trend_analysis");

    let (_, runs) = get_json(router, "/api/mlops/pipelines/trend_analysis/executions").await;
    assert_eq!(runs[0]["id"], ack["executionId"]);
    assert_eq!(runs[0]["status"], "running");
}

#[tokio::test]
async fn model_routes_cover_versions_metrics_and_drift() {
    let router = build_router(MockState::new());

    let (_, versions) = get_json(router.clone(), "/api/mlops/models/topic_model/versions").await;
    assert_eq!(versions.as_array().unwrap().len(), 3);

    let (_, metrics) = get_json(router.clone(), "/api/mlops/models/topic_model/metrics").await;
    assert_eq!(metrics["model_name"], "topic_model");

    let (_, drift) = get_json(router.clone(), "/api/mlops/models/sentiment_model/drift").await;
    assert_eq!(drift["drift_detected"], false);

    let (status, body) = get_json(router, "/api/mlops/models/ghost/drift").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ghost not found");
}

#[tokio::test]
async fn recent_data_uses_collection_key() {
    let router = build_router(MockState::new());

    let (_, reddit) = get_json(router.clone(), "/api/recent-data?platform=reddit&limit=3").await;
    assert_eq!(reddit["posts"].as_array().unwrap().len(), 3);

    let (_, youtube) = get_json(router.clone(), "/api/recent-data?platform=YouTube").await;
    assert!(youtube["videos"].is_array());

    let (status, _) = get_json(router, "/api/recent-data?platform=myspace").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn topic_model_follows_request() {
    let (status, bytes) = call(
        build_router(MockState::new()),
        "POST",
        "/api/topic-model",
        Some(json!({
            "start_date": "2025-05-01",
            "end_date": "2025-05-03",
            "platforms": ["reddit", "tiktok"],
            "num_topics": 5
        })),
    )
    .await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"].as_array().unwrap().len(), 6);
    assert_eq!(body["time_range"]["end_date"], "2025-05-03");
}

#[tokio::test]
async fn db_views_respond() {
    let router = build_router(MockState::new());
    for uri in [
        "/api/db/topics",
        "/api/db/analysis",
        "/api/db/predictions",
        "/api/db/sources/stats",
        "/api/scraper-status",
        "/api/daily-stats",
    ] {
        let (status, _) = get_json(router.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn platform_log_is_text() {
    let router = build_router(MockState::new());

    let (status, bytes) = call(router.clone(), "GET", "/logs/tiktok.log", None).await;
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("tiktok scraper started"));

    let (status, _) = call(router, "GET", "/logs/myspace.log", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
