use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trendlens_common::{
    DriftReport, ExecutionAck, ModelMetrics, ModelVersion, PipelineDescriptor, PipelineExecution,
    Platform, Prediction, SourceStats, Topic, TopicModelRequest, TopicModelResponse,
};
use trendlens_mock as mock;

use crate::state::MockState;

const DEFAULT_RECENT_LIMIT: usize = 10;
const DEFAULT_STATS_DAYS: usize = 7;
const DB_TOPIC_COUNT: usize = 5;

pub fn build_router(state: MockState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // MLOps
        .route("/api/mlops/pipelines", get(list_pipelines))
        .route("/api/mlops/pipelines/{id}", get(get_pipeline))
        .route("/api/mlops/pipelines/{id}/executions", get(list_executions))
        .route("/api/mlops/pipelines/{id}/execute", post(execute_pipeline))
        .route("/api/mlops/models/{name}/versions", get(model_versions))
        .route("/api/mlops/models/{name}/metrics", get(model_metrics))
        .route("/api/mlops/models/{name}/drift", get(model_drift))
        // Scraper data
        .route("/api/scraper-status", get(scraper_status))
        .route("/api/daily-stats", get(daily_stats))
        .route("/api/recent-data", get(recent_data))
        .route("/api/topic-model", post(topic_model))
        // Database views
        .route("/api/db/topics", get(db_topics))
        .route("/api/db/analysis", get(db_analysis))
        .route("/api/db/predictions", get(db_predictions))
        .route("/api/db/sources/stats", get(source_stats))
        // Logs
        .route("/api/logs", get(all_logs))
        .route("/logs/{file}", get(platform_log))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error body shaped like the real backend's: `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// --- MLOps ---

async fn list_pipelines(State(state): State<MockState>) -> Json<Vec<PipelineDescriptor>> {
    Json(state.pipelines().to_vec())
}

async fn get_pipeline(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> ApiResult<PipelineDescriptor> {
    state
        .pipeline(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn list_executions(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<PipelineExecution>> {
    if state.pipeline(&id).is_none() {
        return Err(ApiError::NotFound(id));
    }
    Ok(Json(state.executions(&id)))
}

async fn execute_pipeline(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ExecutionAck>), ApiError> {
    match state.start_execution(&id) {
        Some(ack) => Ok((StatusCode::ACCEPTED, Json(ack))),
        None => Err(ApiError::NotFound(id)),
    }
}

async fn model_versions(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<ModelVersion>> {
    state
        .model_versions(&name)
        .map(|v| Json(v.to_vec()))
        .ok_or(ApiError::NotFound(name))
}

async fn model_metrics(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> ApiResult<ModelMetrics> {
    state
        .model_metrics(&name)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(name))
}

async fn model_drift(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> ApiResult<DriftReport> {
    state
        .model_drift(&name)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(name))
}

// --- Scraper data ---

async fn scraper_status() -> Json<Value> {
    Json(json!(mock::generate_mock_scraper_status()))
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    days: Option<usize>,
}

async fn daily_stats(Query(query): Query<StatsQuery>) -> Json<Value> {
    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    Json(json!(mock::generate_mock_daily_stats(days)))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    platform: String,
    limit: Option<usize>,
}

/// Items come back under the platform's collection key, e.g. `{"posts": [...]}`.
async fn recent_data(Query(query): Query<RecentQuery>) -> Result<Json<Value>, ApiError> {
    let platform: Platform = query
        .platform
        .parse()
        .map_err(|e: trendlens_common::TrendLensError| ApiError::BadRequest(e.to_string()))?;
    let items = mock::mock_content(platform, query.limit.unwrap_or(DEFAULT_RECENT_LIMIT));
    Ok(Json(json!({
        "platform": platform,
        "total": items.len(),
        (platform.collection_key()): items,
    })))
}

async fn topic_model(Json(request): Json<TopicModelRequest>) -> Json<TopicModelResponse> {
    tracing::info!(
        num_topics = request.num_topics,
        start_date = %request.start_date,
        end_date = %request.end_date,
        "Generating topic model"
    );
    Json(mock::generate_mock_topic_model(
        request.num_topics as usize,
        &request.start_date,
        &request.end_date,
    ))
}

// --- Database views ---

async fn db_topics() -> Json<Vec<Topic>> {
    let end = chrono::Utc::now().date_naive();
    let start = end - chrono::Duration::days(DEFAULT_STATS_DAYS as i64 - 1);
    let model = mock::generate_mock_topic_model(
        DB_TOPIC_COUNT,
        &start.format("%Y-%m-%d").to_string(),
        &end.format("%Y-%m-%d").to_string(),
    );
    Json(model.topics)
}

async fn db_analysis() -> Json<Value> {
    Json(json!({ "analysis": mock::generate_mock_analysis(DB_TOPIC_COUNT) }))
}

async fn db_predictions() -> Json<Vec<Prediction>> {
    Json(mock::generate_mock_predictions(DB_TOPIC_COUNT))
}

async fn source_stats() -> Json<Vec<SourceStats>> {
    Json(mock::generate_mock_source_stats())
}

// --- Logs ---

async fn all_logs() -> String {
    mock::generate_mock_logs(None)
}

async fn platform_log(Path(file): Path<String>) -> Result<String, ApiError> {
    let platform = file
        .strip_suffix(".log")
        .and_then(|name| name.parse::<Platform>().ok())
        .ok_or_else(|| ApiError::NotFound(file.clone()))?;
    Ok(mock::generate_mock_logs(Some(platform)))
}
