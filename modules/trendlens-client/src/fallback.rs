// Static substitutes used once the real backend has given up.

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use trendlens_common::Platform;
use trendlens_mock as mock;

use crate::endpoint::Endpoint;

const MOCK_STATS_DAYS: usize = 7;
const MOCK_TOPIC_COUNT: usize = 5;
const MOCK_PREDICTION_COUNT: usize = 5;

/// Maps a logical endpoint to a substitute body shaped like the real response.
pub trait MockSource: Send + Sync {
    fn mock_for(&self, endpoint: &Endpoint) -> Option<Value>;
}

/// Substitutes from the bundled generators. MLOps endpoints have none; those
/// fall back to the mock API server instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticMocks;

impl MockSource for StaticMocks {
    fn mock_for(&self, endpoint: &Endpoint) -> Option<Value> {
        match endpoint {
            Endpoint::ScraperStatus => to_value(&mock::generate_mock_scraper_status()),
            Endpoint::DailyStats => to_value(&mock::generate_mock_daily_stats(MOCK_STATS_DAYS)),
            Endpoint::RecentData { platform, limit } => {
                to_value(&mock::get_mock_data(platform, *limit))
            }
            Endpoint::TopicModel(request) => to_value(&mock::generate_mock_topic_model(
                request.num_topics as usize,
                &request.start_date,
                &request.end_date,
            )),
            Endpoint::DbTopics => {
                let end = Utc::now().date_naive();
                let start = end - Duration::days(MOCK_STATS_DAYS as i64 - 1);
                let model = mock::generate_mock_topic_model(
                    MOCK_TOPIC_COUNT,
                    &start.format("%Y-%m-%d").to_string(),
                    &end.format("%Y-%m-%d").to_string(),
                );
                to_value(&model.topics)
            }
            Endpoint::DbAnalysis => Some(Value::Array(mock::generate_mock_analysis(
                MOCK_TOPIC_COUNT,
            ))),
            Endpoint::DbPredictions => {
                to_value(&mock::generate_mock_predictions(MOCK_PREDICTION_COUNT))
            }
            Endpoint::SourceStats => to_value(&mock::generate_mock_source_stats()),
            Endpoint::Logs => Some(Value::String(mock::generate_mock_logs(None))),
            Endpoint::PlatformLog { platform } => platform
                .parse::<Platform>()
                .ok()
                .map(|p| Value::String(mock::generate_mock_logs(Some(p)))),
            Endpoint::Pipelines
            | Endpoint::Pipeline { .. }
            | Endpoint::PipelineExecutions { .. }
            | Endpoint::ExecutePipeline { .. }
            | Endpoint::ModelVersions { .. }
            | Endpoint::ModelMetrics { .. }
            | Endpoint::ModelDrift { .. } => None,
        }
    }
}

/// No substitutes at all; exhausted retries surface as failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMocks;

impl MockSource for NoMocks {
    fn mock_for(&self, _endpoint: &Endpoint) -> Option<Value> {
        None
    }
}

fn to_value<T: Serialize>(data: &T) -> Option<Value> {
    match serde_json::to_value(data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize mock data");
            None
        }
    }
}
