use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use trendlens_common::{
    lenient_daily_stats, lenient_scraper_status, parse_log_lines, sort_by_date, Config,
    ContentItem, DailyStats, DriftReport, ExecutionAck,
    FetchResult, LogEntry, ModelMetrics, ModelVersion, PipelineDescriptor, PipelineExecution,
    Platform, Prediction, ScraperStatus, SourceStats, Topic, TopicModelRequest,
    TopicModelResponse,
};

use crate::clock::{Clock, TokioClock};
use crate::endpoint::{Endpoint, ResponseFormat};
use crate::error::{FetchError, Result};
use crate::fallback::{MockSource, StaticMocks};
use crate::normalize::normalize;
use crate::retry::{self, AttemptOutcome, FetchOptions, RetryMachine, RetryPolicy};
use crate::status::MockDataStatus;
use crate::transport::{HttpTransport, Transport};

/// Dashboard API client. Every call returns a [`FetchResult`]; backend
/// outages are hidden behind retries and mock substitutes, and surface only
/// through [`MockDataStatus`].
#[derive(Clone)]
pub struct TrendClient {
    config: Config,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    mocks: Arc<dyn MockSource>,
    status: MockDataStatus,
}

impl TrendClient {
    /// The mock-data flag starts at `config.force_mock`.
    pub fn new(config: Config) -> Self {
        let status = MockDataStatus::new(config.force_mock);
        Self {
            config,
            transport: Arc::new(HttpTransport::new()),
            clock: Arc::new(TokioClock),
            mocks: Arc::new(StaticMocks),
            status,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_mocks(mut self, mocks: Arc<dyn MockSource>) -> Self {
        self.mocks = mocks;
        self
    }

    /// Share an existing status, e.g. one already watched by a banner.
    pub fn with_status(mut self, status: MockDataStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> &MockDataStatus {
        &self.status
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Core ---

    /// Fetch and normalize into a flat list of records.
    pub async fn fetch_with_fallback(
        &self,
        endpoint: &Endpoint,
        options: FetchOptions,
    ) -> FetchResult<Vec<Value>> {
        self.fetch_raw(endpoint, options)
            .await
            .map(|body| normalize(body).data)
    }

    /// Fetch the decoded body as-is, for endpoints that return a single document.
    pub async fn fetch_raw(&self, endpoint: &Endpoint, options: FetchOptions) -> FetchResult<Value> {
        let (force_mock, policy) = options.resolve(&self.config);

        if force_mock {
            self.status.set(true);
            return self.substitute(endpoint, policy, None).await;
        }

        self.status.set(false);
        let request = endpoint.request(endpoint.base_url(&self.config));
        let report = RetryMachine::new(self.transport.as_ref(), self.clock.as_ref(), policy)
            .run(&request)
            .await;

        match report.outcome {
            AttemptOutcome::Succeeded(response) => match decode_body(endpoint.format(), &response.body) {
                Ok(body) => FetchResult::success(body, false),
                Err(e) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Undecodable response");
                    FetchResult::failure(e.to_string())
                }
            },
            AttemptOutcome::Rejected(e) => FetchResult::failure(e.to_string()),
            AttemptOutcome::Exhausted(last_error) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    attempts = report.attempts,
                    "Backend unavailable, falling back to mock data"
                );
                self.status.set(true);
                self.substitute(endpoint, policy, last_error).await
            }
        }
    }

    /// Static substitute first, then the mock API server for the routes it mirrors.
    async fn substitute(
        &self,
        endpoint: &Endpoint,
        policy: RetryPolicy,
        last_error: Option<FetchError>,
    ) -> FetchResult<Value> {
        if let Some(body) = self.mocks.mock_for(endpoint) {
            return FetchResult::success(body, true);
        }

        if endpoint.served_by_mock_api() {
            match self.fetch_from_mock_api(endpoint, policy).await {
                Ok(body) => return FetchResult::success(body, true),
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Mock API server unavailable");
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| FetchError::NoMockDataAvailable(endpoint.to_string()));
        tracing::error!(endpoint = %endpoint, error = %error, "No data available");
        FetchResult::failure(error.to_string())
    }

    async fn fetch_from_mock_api(&self, endpoint: &Endpoint, policy: RetryPolicy) -> Result<Value> {
        let request = endpoint.request(&self.config.mock_api_url);
        let response = retry::attempt(self.transport.as_ref(), &request, policy.timeout).await?;
        decode_body(endpoint.format(), &response.body)
    }

    async fn fetch_document<T: DeserializeOwned>(&self, endpoint: Endpoint) -> FetchResult<T> {
        self.fetch_raw(&endpoint, FetchOptions::default())
            .await
            .and_then(serde_json::from_value)
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, endpoint: Endpoint) -> FetchResult<Vec<T>> {
        self.fetch_with_fallback(&endpoint, FetchOptions::default())
            .await
            .and_then(|items| {
                items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<std::result::Result<Vec<T>, _>>()
            })
    }

    async fn fetch_log_text(&self, endpoint: Endpoint) -> FetchResult<Vec<LogEntry>> {
        self.fetch_raw(&endpoint, FetchOptions::default())
            .await
            .and_then(|body| match body {
                Value::String(text) => Ok(parse_log_lines(&text)),
                Value::Null => Ok(Vec::new()),
                other => Err(FetchError::MalformedResponse(format!(
                    "expected log text, got {other}"
                ))),
            })
    }

    // --- Scraper data ---

    pub async fn fetch_scraper_status(&self) -> FetchResult<ScraperStatus> {
        self.fetch_raw(&Endpoint::ScraperStatus, FetchOptions::default())
            .await
            .and_then(|body| lenient_scraper_status(body))
    }

    pub async fn fetch_daily_stats(&self) -> FetchResult<DailyStats> {
        self.fetch_raw(&Endpoint::DailyStats, FetchOptions::default())
            .await
            .and_then(|body| lenient_daily_stats(body))
    }

    /// Recent posts or videos, newest first, at most `limit` of them.
    pub async fn fetch_recent_data(&self, platform: Platform, limit: usize) -> FetchResult<Vec<ContentItem>> {
        let endpoint = Endpoint::RecentData {
            platform: platform.to_string(),
            limit,
        };
        self.fetch_with_fallback(&endpoint, FetchOptions::default())
            .await
            .map(|values| {
                let mut items: Vec<ContentItem> =
                    values.into_iter().filter_map(ContentItem::from_value).collect();
                sort_by_date(&mut items);
                items.truncate(limit);
                items
            })
    }

    pub async fn fetch_topic_model(&self, request: TopicModelRequest) -> FetchResult<TopicModelResponse> {
        self.fetch_document(Endpoint::TopicModel(request)).await
    }

    // --- Database views ---

    pub async fn fetch_predictions(&self) -> FetchResult<Vec<Prediction>> {
        self.fetch_collection(Endpoint::DbPredictions).await
    }

    pub async fn fetch_db_topics(&self) -> FetchResult<Vec<Topic>> {
        self.fetch_collection(Endpoint::DbTopics).await
    }

    pub async fn fetch_db_analysis(&self) -> FetchResult<Vec<Value>> {
        self.fetch_with_fallback(&Endpoint::DbAnalysis, FetchOptions::default())
            .await
    }

    pub async fn fetch_source_stats(&self) -> FetchResult<Vec<SourceStats>> {
        self.fetch_collection(Endpoint::SourceStats).await
    }

    // --- MLOps ---

    pub async fn fetch_pipelines(&self) -> FetchResult<Vec<PipelineDescriptor>> {
        self.fetch_collection(Endpoint::Pipelines).await
    }

    pub async fn fetch_pipeline(&self, id: &str) -> FetchResult<PipelineDescriptor> {
        self.fetch_document(Endpoint::Pipeline { id: id.to_string() })
            .await
    }

    pub async fn fetch_pipeline_executions(&self, id: &str) -> FetchResult<Vec<PipelineExecution>> {
        self.fetch_collection(Endpoint::PipelineExecutions { id: id.to_string() })
            .await
    }

    pub async fn execute_pipeline(&self, id: &str) -> FetchResult<ExecutionAck> {
        self.fetch_document(Endpoint::ExecutePipeline { id: id.to_string() })
            .await
    }

    pub async fn fetch_model_versions(&self, name: &str) -> FetchResult<Vec<ModelVersion>> {
        self.fetch_collection(Endpoint::ModelVersions {
            name: name.to_string(),
        })
        .await
    }

    pub async fn fetch_model_metrics(&self, name: &str) -> FetchResult<ModelMetrics> {
        self.fetch_document(Endpoint::ModelMetrics {
            name: name.to_string(),
        })
        .await
    }

    pub async fn fetch_model_drift(&self, name: &str) -> FetchResult<DriftReport> {
        self.fetch_document(Endpoint::ModelDrift {
            name: name.to_string(),
        })
        .await
    }

    // --- Logs ---

    pub async fn fetch_logs(&self) -> FetchResult<Vec<LogEntry>> {
        self.fetch_log_text(Endpoint::Logs).await
    }

    pub async fn fetch_platform_log(&self, platform: Platform) -> FetchResult<Vec<LogEntry>> {
        self.fetch_log_text(Endpoint::PlatformLog {
            platform: platform.to_string(),
        })
        .await
    }
}

/// Text endpoints become a JSON string; an empty JSON body is `null`.
fn decode_body(format: ResponseFormat, body: &str) -> Result<Value> {
    match format {
        ResponseFormat::Text => Ok(Value::String(body.to_string())),
        ResponseFormat::Json if body.trim().is_empty() => Ok(Value::Null),
        ResponseFormat::Json => {
            serde_json::from_str(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
        }
    }
}
