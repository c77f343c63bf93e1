use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TrendLensError;
use crate::fields::{self, AUTHOR_FIELDS, CONTENT_FIELDS, DATE_FIELDS, TITLE_FIELDS};

// --- Fetch outcome ---

/// Uniform result of every fetch, whichever path (real API, retry, mock) produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchResult<T> {
    Success {
        data: T,
        #[serde(rename = "isMock")]
        is_mock: bool,
    },
    Failure {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl<T> FetchResult<T> {
    pub fn success(data: T, is_mock: bool) -> Self {
        FetchResult::Success { data, is_mock }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        FetchResult::Failure {
            error_message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// `true` only for a successful result built from synthetic data.
    pub fn is_mock(&self) -> bool {
        matches!(self, FetchResult::Success { is_mock: true, .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchResult::Success { data, .. } => Some(data),
            FetchResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { error_message } => Some(error_message),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchResult<U> {
        match self {
            FetchResult::Success { data, is_mock } => FetchResult::Success {
                data: f(data),
                is_mock,
            },
            FetchResult::Failure { error_message } => FetchResult::Failure { error_message },
        }
    }

    /// Like [`map`](Self::map) for conversions that can fail; a failed conversion becomes `Failure`.
    pub fn and_then<U, E: fmt::Display, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> FetchResult<U> {
        match self {
            FetchResult::Success { data, is_mock } => match f(data) {
                Ok(data) => FetchResult::Success { data, is_mock },
                Err(e) => FetchResult::failure(e.to_string()),
            },
            FetchResult::Failure { error_message } => FetchResult::Failure { error_message },
        }
    }

    pub fn into_result(self) -> Result<(T, bool), String> {
        match self {
            FetchResult::Success { data, is_mock } => Ok((data, is_mock)),
            FetchResult::Failure { error_message } => Err(error_message),
        }
    }
}

// --- Platforms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Reddit, Platform::TikTok, Platform::YouTube];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    /// Name of the collection property in scraper-status payloads.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Platform::Reddit => "posts",
            Platform::TikTok | Platform::YouTube => "videos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = TrendLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reddit" => Ok(Platform::Reddit),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            other => Err(TrendLensError::UnsupportedPlatform(other.to_string())),
        }
    }
}

// --- Content ---

/// A social-media post or video, kept as the raw upstream object.
/// Field names vary by source, so accessors probe the shared field chains.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(pub Map<String, Value>);

impl ContentItem {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn id(&self) -> Option<String> {
        self.0.get("id").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn title(&self) -> Option<String> {
        TITLE_FIELDS.lookup_str(&self.0)
    }

    pub fn author(&self) -> Option<String> {
        AUTHOR_FIELDS.lookup_str(&self.0)
    }

    pub fn url(&self) -> Option<String> {
        self.0.get("url").and_then(Value::as_str).map(str::to_string)
    }

    pub fn raw_date(&self) -> Option<&Value> {
        DATE_FIELDS.lookup(&self.0)
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        fields::extract_date(&self.0)
    }

    /// Full text from the first present content field.
    pub fn text(&self) -> Option<String> {
        CONTENT_FIELDS.lookup_str(&self.0)
    }

    /// Text for list views, truncated to 200 characters.
    pub fn display_text(&self) -> Option<String> {
        fields::extract_display_text(&self.0)
    }
}

/// Sort content newest-first; undated records keep their positions.
pub fn sort_by_date(items: &mut Vec<ContentItem>) {
    fields::sort_newest_first(items, ContentItem::date);
}

// --- Lenient deserializers ---

/// Any value that is not an array deserializes to an empty list; array
/// elements that do not fit `T` are dropped.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Any value that is not an object deserializes to `T::default()`.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => T::default(),
    })
}

// --- Topic model ---

/// Sentinel id of the catch-all "Other" topic.
pub const OTHER_TOPIC_ID: i64 = -1;
pub const OTHER_TOPIC_NAME: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub coherence_score: f64,
}

impl Topic {
    pub fn is_other(&self) -> bool {
        self.id == OTHER_TOPIC_ID
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// Topic id (as string) → date (`YYYY-MM-DD`) → document count.
pub type TopicCounts = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicModelResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub topics: Vec<Topic>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub topic_counts_by_date: TopicCounts,
    #[serde(default, deserialize_with = "lenient_object")]
    pub metrics: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModelRequest {
    pub start_date: String,
    pub end_date: String,
    pub platforms: Vec<Platform>,
    pub num_topics: u32,
}

// --- Predictions and stats ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub topic: String,
    #[serde(default)]
    pub current_volume: u64,
    #[serde(default)]
    pub predicted_volume: u64,
    #[serde(default)]
    pub growth_rate: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub horizon_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

/// Platform name → per-day post counts.
pub type DailyStats = BTreeMap<String, Vec<DailyCount>>;

/// Non-object payloads give no platforms; a platform whose series is not an
/// array gets an empty series.
pub fn lenient_daily_stats<'de, D>(deserializer: D) -> Result<DailyStats, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(platforms)) = value else {
        return Ok(DailyStats::new());
    };
    Ok(platforms
        .into_iter()
        .map(|(platform, series)| (platform, lenient_vec::<_, DailyCount>(series).unwrap_or_default()))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<ContentItem>>,
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<ContentItem>>,
}

/// Anything but an array is treated as absent; non-object elements are dropped.
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<ContentItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(ContentItem::from_value).collect()),
        _ => None,
    })
}

impl PlatformStatus {
    /// Recent items, whichever collection key the platform uses.
    pub fn items(&self) -> &[ContentItem] {
        self.posts
            .as_deref()
            .or(self.videos.as_deref())
            .unwrap_or(&[])
    }
}

/// Platform name → scraper health.
pub type ScraperStatus = BTreeMap<String, PlatformStatus>;

/// Keeps only entries that read as a platform status; sibling fields such as
/// a top-level `timestamp` are skipped.
pub fn lenient_scraper_status<'de, D>(deserializer: D) -> Result<ScraperStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(entries)) = value else {
        return Ok(ScraperStatus::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(platform, entry)| {
            if !entry.is_object() {
                return None;
            }
            match serde_json::from_value::<PlatformStatus>(entry) {
                Ok(status) => Some((platform, status)),
                Err(e) => {
                    tracing::debug!(%platform, error = %e, "Skipping unreadable scraper status entry");
                    None
                }
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub platform: String,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub records_last_24h: u64,
    #[serde(default)]
    pub last_scraped_at: Option<String>,
}

// --- Pipelines ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Completed,
    Running,
    Failed,
    Pending,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Completed => write!(f, "completed"),
            PipelineStatus::Running => write!(f, "running"),
            PipelineStatus::Failed => write!(f, "failed"),
            PipelineStatus::Pending => write!(f, "pending"),
            PipelineStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: PipelineStatus,
    /// Seconds.
    #[serde(default)]
    pub runtime: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub steps: Vec<PipelineStep>,
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub next_scheduled_run: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub average_runtime: Option<f64>,
    #[serde(default)]
    pub status: PipelineStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    pub id: String,
    pub pipeline_id: String,
    #[serde(default)]
    pub status: PipelineStatus,
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub trigger: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionAck {
    pub execution_id: String,
    pub pipeline_id: String,
    pub status: String,
    pub started_at: String,
    #[serde(default)]
    pub message: String,
}

// --- Models ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub version: String,
    pub created_at: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub metrics: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub model_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub metrics: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub history: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDrift {
    pub feature: String,
    pub drift_score: f64,
    pub drifted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub model_name: String,
    pub drift_detected: bool,
    #[serde(default)]
    pub drift_score: f64,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub features: Vec<FeatureDrift>,
    #[serde(default)]
    pub checked_at: Option<String>,
}

// --- Logs ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl LogEntry {
    /// Parse a `timestamp level message` line. Lines with fewer than three
    /// parts keep the whole line as an `INFO` message with no timestamp.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let mut parts = line.splitn(3, char::is_whitespace);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ts), Some(level), Some(message)) => Some(Self {
                timestamp: ts.to_string(),
                level: level.to_ascii_uppercase(),
                message: message.trim().to_string(),
            }),
            _ => Some(Self {
                timestamp: String::new(),
                level: "INFO".to_string(),
                message: line.to_string(),
            }),
        }
    }
}

/// Parse newline-delimited log text, skipping blank lines.
pub fn parse_log_lines(text: &str) -> Vec<LogEntry> {
    text.lines().filter_map(LogEntry::parse_line).collect()
}

// --- Mock-data status event ---

/// Name of the broadcast event carrying [`MockDataEvent`].
pub const MOCK_DATA_EVENT: &str = "mock-data-status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockDataEvent {
    pub using_mock_data: bool,
}
