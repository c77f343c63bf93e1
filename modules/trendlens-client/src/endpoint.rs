// Logical backend endpoints.
//
// Each variant knows how to address itself (method, path, query, body) and
// which backend serves it, so fallback decisions key off the variant rather
// than string-matching URLs.

use std::fmt;

use serde_json::Value;
use trendlens_common::{Config, TopicModelRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Which configured base URL an endpoint lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Api,
    Drift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    /// Newline-delimited text, surfaced as a JSON string.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    ScraperStatus,
    DailyStats,
    RecentData { platform: String, limit: usize },
    TopicModel(TopicModelRequest),
    Pipelines,
    Pipeline { id: String },
    PipelineExecutions { id: String },
    ExecutePipeline { id: String },
    ModelVersions { name: String },
    ModelMetrics { name: String },
    ModelDrift { name: String },
    DbTopics,
    DbAnalysis,
    DbPredictions,
    SourceStats,
    Logs,
    PlatformLog { platform: String },
}

impl Endpoint {
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::TopicModel(_) | Endpoint::ExecutePipeline { .. } => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Path segments below the base URL; ids are kept as single segments.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Endpoint::ScraperStatus => segs(&["api", "scraper-status"]),
            Endpoint::DailyStats => segs(&["api", "daily-stats"]),
            Endpoint::RecentData { .. } => segs(&["api", "recent-data"]),
            Endpoint::TopicModel(_) => segs(&["api", "topic-model"]),
            Endpoint::Pipelines => segs(&["api", "mlops", "pipelines"]),
            Endpoint::Pipeline { id } => segs(&["api", "mlops", "pipelines", id.as_str()]),
            Endpoint::PipelineExecutions { id } => {
                segs(&["api", "mlops", "pipelines", id.as_str(), "executions"])
            }
            Endpoint::ExecutePipeline { id } => segs(&["api", "mlops", "pipelines", id.as_str(), "execute"]),
            Endpoint::ModelVersions { name } => segs(&["api", "mlops", "models", name.as_str(), "versions"]),
            Endpoint::ModelMetrics { name } => segs(&["api", "mlops", "models", name.as_str(), "metrics"]),
            Endpoint::ModelDrift { name } => segs(&["api", "mlops", "models", name.as_str(), "drift"]),
            Endpoint::DbTopics => segs(&["api", "db", "topics"]),
            Endpoint::DbAnalysis => segs(&["api", "db", "analysis"]),
            Endpoint::DbPredictions => segs(&["api", "db", "predictions"]),
            Endpoint::SourceStats => segs(&["api", "db", "sources", "stats"]),
            Endpoint::Logs => segs(&["api", "logs"]),
            Endpoint::PlatformLog { platform } => {
                let file = format!("{platform}.log");
                segs(&["logs", file.as_str()])
            }
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            Endpoint::RecentData { platform, limit } => vec![
                ("platform".to_string(), platform.clone()),
                ("limit".to_string(), limit.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Endpoint::TopicModel(request) => serde_json::to_value(request).ok(),
            Endpoint::ExecutePipeline { .. } => Some(Value::Object(Default::default())),
            _ => None,
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Endpoint::ModelDrift { .. } => Backend::Drift,
            _ => Backend::Api,
        }
    }

    /// MLOps routes are mirrored by the standalone mock API server.
    pub fn served_by_mock_api(&self) -> bool {
        matches!(
            self,
            Endpoint::Pipelines
                | Endpoint::Pipeline { .. }
                | Endpoint::PipelineExecutions { .. }
                | Endpoint::ExecutePipeline { .. }
                | Endpoint::ModelVersions { .. }
                | Endpoint::ModelMetrics { .. }
                | Endpoint::ModelDrift { .. }
        )
    }

    pub fn format(&self) -> ResponseFormat {
        match self {
            Endpoint::Logs | Endpoint::PlatformLog { .. } => ResponseFormat::Text,
            _ => ResponseFormat::Json,
        }
    }

    pub fn base_url<'a>(&self, config: &'a Config) -> &'a str {
        match self.backend() {
            Backend::Api => &config.api_url,
            Backend::Drift => &config.drift_api_url,
        }
    }

    /// Build the concrete request against `base_url`.
    pub fn request(&self, base_url: &str) -> ApiRequest {
        ApiRequest {
            method: self.method(),
            base_url: base_url.to_string(),
            segments: self.segments(),
            query: self.query(),
            body: self.body(),
        }
    }
}

fn segs(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// A fully addressed request, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub base_url: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendlens_common::Platform;

    #[test]
    fn recent_data_carries_query() {
        let endpoint = Endpoint::RecentData {
            platform: "reddit".into(),
            limit: 10,
        };
        assert_eq!(endpoint.to_string(), "GET /api/recent-data");
        assert_eq!(
            endpoint.query(),
            vec![
                ("platform".to_string(), "reddit".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn execute_is_a_post_under_mlops() {
        let endpoint = Endpoint::ExecutePipeline {
            id: "trend_analysis".into(),
        };
        assert_eq!(endpoint.method(), HttpMethod::Post);
        assert_eq!(endpoint.path(), "/api/mlops/pipelines/trend_analysis/execute");
        assert!(endpoint.served_by_mock_api());
    }

    #[test]
    fn drift_uses_drift_backend() {
        let config = Config {
            drift_api_url: "http://drift:5000".into(),
            ..Config::default()
        };
        let endpoint = Endpoint::ModelDrift {
            name: "topic_model".into(),
        };
        assert_eq!(endpoint.base_url(&config), "http://drift:5000");
        assert_eq!(endpoint.path(), "/api/mlops/models/topic_model/drift");
    }

    #[test]
    fn topic_model_body_is_the_request() {
        let endpoint = Endpoint::TopicModel(TopicModelRequest {
            start_date: "2025-05-01".into(),
            end_date: "2025-05-03".into(),
            platforms: vec![Platform::Reddit, Platform::TikTok],
            num_topics: 5,
        });
        let body = endpoint.body().unwrap();
        assert_eq!(body["num_topics"], 5);
        assert_eq!(body["platforms"][1], "tiktok");
    }

    #[test]
    fn platform_log_is_text() {
        let endpoint = Endpoint::PlatformLog {
            platform: "youtube".into(),
        };
        assert_eq!(endpoint.path(), "/logs/youtube.log");
        assert_eq!(endpoint.format(), ResponseFormat::Text);
        assert!(!endpoint.served_by_mock_api());
    }
}
