// Canned MLOps data and the in-memory execution log.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use trendlens_common::{
    DriftReport, ExecutionAck, FeatureDrift, MetricPoint, ModelMetrics, ModelVersion,
    PipelineDescriptor, PipelineExecution, PipelineStatus, PipelineStep,
};

const DRIFT_THRESHOLD: f64 = 0.3;

/// Per-feature drift scores reported by the canned models.
const TOPIC_MODEL_DRIFT: &[(&str, f64)] =
    &[("text_length", 0.12), ("vocabulary", 0.41), ("platform_mix", 0.08)];
const SENTIMENT_MODEL_DRIFT: &[(&str, f64)] =
    &[("text_length", 0.05), ("emoji_rate", 0.22), ("language", 0.11)];

#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

struct Inner {
    pipelines: Vec<PipelineDescriptor>,
    models: BTreeMap<String, ModelCatalog>,
    executions: Mutex<Vec<PipelineExecution>>,
    last_execution_id: AtomicI64,
}

struct ModelCatalog {
    versions: Vec<ModelVersion>,
    metrics: ModelMetrics,
    drift: DriftReport,
}

impl MockState {
    pub fn new() -> Self {
        let now = Utc::now();
        let pipelines = canned_pipelines(now);
        let executions = pipelines
            .iter()
            .flat_map(|p| canned_executions(&p.id, now))
            .collect();
        let models = ["topic_model", "sentiment_model"]
            .into_iter()
            .map(|name| (name.to_string(), canned_model(name, now)))
            .collect();

        Self {
            inner: Arc::new(Inner {
                pipelines,
                models,
                executions: Mutex::new(executions),
                last_execution_id: AtomicI64::new(0),
            }),
        }
    }

    pub fn pipelines(&self) -> &[PipelineDescriptor] {
        &self.inner.pipelines
    }

    pub fn pipeline(&self, id: &str) -> Option<&PipelineDescriptor> {
        self.inner.pipelines.iter().find(|p| p.id == id)
    }

    /// Executions for a pipeline, newest first.
    pub fn executions(&self, pipeline_id: &str) -> Vec<PipelineExecution> {
        let mut runs: Vec<PipelineExecution> = self
            .executions_log()
            .iter()
            .filter(|e| e.pipeline_id == pipeline_id)
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs
    }

    /// Record a manual run. `None` for an unknown pipeline.
    pub fn start_execution(&self, pipeline_id: &str) -> Option<ExecutionAck> {
        self.pipeline(pipeline_id)?;

        let now = Utc::now();
        let id = format!("exec-{}", self.next_execution_id(now));
        let started_at = rfc3339(now);

        self.executions_log().push(PipelineExecution {
            id: id.clone(),
            pipeline_id: pipeline_id.to_string(),
            status: PipelineStatus::Running,
            started_at: started_at.clone(),
            completed_at: None,
            duration: None,
            trigger: Some("manual".to_string()),
        });
        tracing::info!(pipeline_id, execution_id = %id, "Pipeline execution started");

        Some(ExecutionAck {
            execution_id: id,
            pipeline_id: pipeline_id.to_string(),
            status: "started".to_string(),
            started_at,
            message: format!("Pipeline {pipeline_id} execution started"),
        })
    }

    pub fn model_versions(&self, name: &str) -> Option<&[ModelVersion]> {
        self.inner.models.get(name).map(|m| m.versions.as_slice())
    }

    pub fn model_metrics(&self, name: &str) -> Option<&ModelMetrics> {
        self.inner.models.get(name).map(|m| &m.metrics)
    }

    pub fn model_drift(&self, name: &str) -> Option<&DriftReport> {
        self.inner.models.get(name).map(|m| &m.drift)
    }

    /// Millisecond timestamp, bumped past the previous id when two runs land in the same millisecond.
    fn next_execution_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut previous = self.inner.last_execution_id.load(Ordering::SeqCst);
        loop {
            let next = candidate.max(previous + 1);
            match self.inner.last_execution_id.compare_exchange(
                previous,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(actual) => previous = actual,
            }
        }
    }

    fn executions_log(&self) -> MutexGuard<'_, Vec<PipelineExecution>> {
        self.inner
            .executions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn step(id: &str, name: &str, description: &str, runtime: f64) -> PipelineStep {
    PipelineStep {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        status: PipelineStatus::Completed,
        runtime: Some(runtime),
    }
}

fn canned_pipelines(now: DateTime<Utc>) -> Vec<PipelineDescriptor> {
    vec![
        PipelineDescriptor {
            id: "trend_analysis".to_string(),
            name: "Trend Analysis".to_string(),
            description: "Topic modeling and trend detection over scraped content".to_string(),
            steps: vec![
                step("load_data", "Load Data", "Pull recent posts from the warehouse", 42.0),
                step("preprocess", "Preprocess", "Clean, tokenize and deduplicate text", 95.5),
                step("topic_model", "Topic Model", "Fit BERTopic over the window", 310.2),
                step("predict", "Predict", "Forecast topic volume for the next week", 61.8),
            ],
            last_run: Some(rfc3339(now - Duration::hours(2))),
            next_scheduled_run: Some(rfc3339(now + Duration::hours(4))),
            average_runtime: Some(509.5),
            status: PipelineStatus::Completed,
        },
        PipelineDescriptor {
            id: "data_ingestion".to_string(),
            name: "Data Ingestion".to_string(),
            description: "Scrape Reddit, TikTok and YouTube into the warehouse".to_string(),
            steps: vec![
                step("scrape", "Scrape", "Run platform scrapers", 620.0),
                step("validate", "Validate", "Schema and duplicate checks", 35.4),
                step("load", "Load", "Write batches to the warehouse", 88.1),
            ],
            last_run: Some(rfc3339(now - Duration::minutes(30))),
            next_scheduled_run: Some(rfc3339(now + Duration::minutes(30))),
            average_runtime: Some(743.5),
            status: PipelineStatus::Running,
        },
        PipelineDescriptor {
            id: "model_training".to_string(),
            name: "Model Training".to_string(),
            description: "Retrain topic and sentiment models".to_string(),
            steps: vec![
                step("features", "Build Features", "Embed documents", 240.0),
                step("train", "Train", "Fit candidate models", 1_820.0),
                step("evaluate", "Evaluate", "Score candidates against holdout", 150.3),
            ],
            last_run: Some(rfc3339(now - Duration::days(1))),
            next_scheduled_run: Some(rfc3339(now + Duration::days(6))),
            average_runtime: Some(2_210.3),
            status: PipelineStatus::Failed,
        },
    ]
}

fn canned_executions(pipeline_id: &str, now: DateTime<Utc>) -> Vec<PipelineExecution> {
    (1..=3)
        .map(|i| {
            let started = now - Duration::hours(6 * i);
            let duration = 300.0 + 45.0 * i as f64;
            PipelineExecution {
                id: format!("{pipeline_id}-run-{i}"),
                pipeline_id: pipeline_id.to_string(),
                status: if i == 2 {
                    PipelineStatus::Failed
                } else {
                    PipelineStatus::Completed
                },
                started_at: rfc3339(started),
                completed_at: Some(rfc3339(started + Duration::seconds(duration as i64))),
                duration: Some(duration),
                trigger: Some("scheduled".to_string()),
            }
        })
        .collect()
}

fn metric_map(pairs: &[(&str, f64)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
}

fn canned_model(name: &str, now: DateTime<Utc>) -> ModelCatalog {
    let (primary, features) = match name {
        "topic_model" => ("coherence_score", TOPIC_MODEL_DRIFT),
        _ => ("accuracy", SENTIMENT_MODEL_DRIFT),
    };

    let versions: Vec<ModelVersion> = (1..=3)
        .map(|v| ModelVersion {
            version: format!("v{v}"),
            created_at: rfc3339(now - Duration::days(30 * (4 - v))),
            stage: if v == 3 { "production" } else { "archived" }.to_string(),
            metrics: metric_map(&[(primary, 0.6 + 0.05 * v as f64), ("latency_ms", 120.0 - 10.0 * v as f64)]),
        })
        .collect();

    let history = (0..7)
        .rev()
        .map(|d| MetricPoint {
            timestamp: rfc3339(now - Duration::days(d)),
            values: metric_map(&[(primary, 0.7 - 0.01 * d as f64)]),
        })
        .collect();

    let metrics = ModelMetrics {
        model_name: name.to_string(),
        version: versions.last().map(|v| v.version.clone()),
        metrics: versions
            .last()
            .map(|v| v.metrics.clone())
            .unwrap_or_default(),
        history,
    };

    let features: Vec<FeatureDrift> = features
        .iter()
        .map(|(feature, score)| FeatureDrift {
            feature: feature.to_string(),
            drift_score: *score,
            drifted: *score > DRIFT_THRESHOLD,
        })
        .collect();
    let drift_score = features.iter().map(|f| f.drift_score).fold(0.0, f64::max);
    let drift = DriftReport {
        model_name: name.to_string(),
        drift_detected: features.iter().any(|f| f.drifted),
        drift_score,
        threshold: DRIFT_THRESHOLD,
        features,
        checked_at: Some(rfc3339(now - Duration::minutes(15))),
    };

    ModelCatalog {
        versions,
        metrics,
        drift,
    }
}
