//! Fetch-layer behaviour against a scripted backend.
//!
//! - Transient failures retry with linear backoff, then fall back to mock data
//! - Permanent failures surface immediately and never fall back
//! - The mock-data flag tracks which path produced the data on screen
//! - MLOps routes fall back to the mock API server

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use trendlens_client::testing::{RecordingClock, ScriptedTransport};
use trendlens_client::{
    ApiResponse, Endpoint, FetchError, FetchOptions, NoMocks, TrendClient,
};
use trendlens_common::{Config, Platform};

const API: &str = "http://api.test";
const MOCK_API: &str = "http://mock-api.test";

fn config() -> Config {
    Config {
        api_url: API.to_string(),
        mock_api_url: MOCK_API.to_string(),
        drift_api_url: API.to_string(),
        force_mock: false,
        timeout: Duration::from_millis(500),
        max_retries: 3,
        retry_delay: Duration::from_millis(10),
    }
}

fn client(transport: ScriptedTransport) -> (TrendClient, Arc<ScriptedTransport>, Arc<RecordingClock>) {
    let transport = Arc::new(transport);
    let clock = Arc::new(RecordingClock::new());
    let client = TrendClient::new(config())
        .with_transport(transport.clone())
        .with_clock(clock.clone());
    (client, transport, clock)
}

fn server_error() -> trendlens_client::Result<ApiResponse> {
    Ok(ApiResponse::new(500, r#"{"error": "upstream exploded"}"#))
}

// =========================================================================
// Retry then fall back
// =========================================================================

#[tokio::test]
async fn three_server_errors_fall_back_to_mock_posts() {
    let (client, transport, clock) = client(ScriptedTransport::new().repeat(API, 3, server_error()));

    let result = client.fetch_recent_data(Platform::Reddit, 10).await;

    assert!(result.is_success());
    assert!(result.is_mock());
    let items = result.data().unwrap();
    assert!(!items.is_empty() && items.len() <= 10);
    assert!(client.status().get());

    let reddit_titles: Vec<String> = trendlens_mock::get_mock_data("reddit", usize::MAX)
        .iter()
        .filter_map(|item| item.title())
        .collect();
    for item in items {
        assert_eq!(item.get("platform"), Some(&json!("reddit")));
        assert!(item.get("subreddit").is_some());
        assert!(reddit_titles.contains(&item.title().unwrap()));
    }

    assert_eq!(transport.calls_to(API), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_millis(10), Duration::from_millis(20)]
    );
}

#[tokio::test]
async fn recovers_on_a_later_attempt() {
    let transport = ScriptedTransport::new()
        .fail(API, FetchError::Network("connection reset".into()))
        .json(API, 200, json!({"posts": [{"id": "a", "created_at": "2025-05-01T00:00:00Z"}]}));
    let (client, transport, clock) = client(transport);

    let result = client.fetch_recent_data(Platform::Reddit, 10).await;

    assert!(result.is_success());
    assert!(!result.is_mock());
    assert_eq!(result.data().unwrap()[0].id().as_deref(), Some("a"));
    assert!(!client.status().get());
    assert_eq!(transport.calls_to(API), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(10)]);
}

#[tokio::test]
async fn timeouts_are_retried() {
    let transport = ScriptedTransport::new().repeat(
        API,
        3,
        Err(FetchError::Timeout(Duration::from_millis(500))),
    );
    let (client, transport, _clock) = client(transport);

    let result = client.fetch_daily_stats().await;

    assert!(result.is_mock());
    assert_eq!(result.data().unwrap().len(), 3);
    assert_eq!(transport.calls_to(API), 3);
}

#[tokio::test]
async fn success_after_mock_clears_the_flag() {
    let transport = ScriptedTransport::new()
        .repeat(API, 3, server_error())
        .json(API, 200, json!([{"platform": "reddit", "total_records": 10}]));
    let (client, _transport, _clock) = client(transport);

    assert!(client.fetch_source_stats().await.is_mock());
    assert!(client.status().get());

    let live = client.fetch_source_stats().await;
    assert!(live.is_success() && !live.is_mock());
    assert!(!client.status().get());
}

#[tokio::test]
async fn flag_changes_are_broadcast() {
    let (client, _transport, _clock) = client(ScriptedTransport::new().repeat(API, 3, server_error()));
    let mut events = client.status().events();

    client.fetch_scraper_status().await;

    assert!(events.recv().await.unwrap().using_mock_data);
}

#[tokio::test]
async fn no_substitute_returns_last_error() {
    let transport = Arc::new(ScriptedTransport::new().repeat(API, 3, server_error()));
    let client = TrendClient::new(config())
        .with_transport(transport.clone())
        .with_clock(Arc::new(RecordingClock::new()))
        .with_mocks(Arc::new(NoMocks));

    let result = client.fetch_daily_stats().await;

    assert_eq!(
        result.error_message(),
        Some("Server error (status 500): upstream exploded")
    );
    assert!(client.status().get());
}

#[tokio::test]
async fn force_mock_config_starts_flagged() {
    let client = TrendClient::new(Config {
        force_mock: true,
        ..config()
    });
    assert!(client.status().get());
}

// =========================================================================
// Defensive stats parsing
// =========================================================================

#[tokio::test]
async fn daily_stats_with_null_series_reads_as_empty() {
    let body = json!({
        "reddit": null,
        "tiktok": [{"date": "2025-05-01", "count": 40}, {"date": "2025-05-02", "count": 52}]
    });
    let (client, _transport, _clock) = client(ScriptedTransport::new().json(API, 200, body));

    let result = client.fetch_daily_stats().await;

    let stats = result.data().unwrap();
    assert!(!result.is_mock());
    assert!(stats["reddit"].is_empty());
    assert_eq!(stats["tiktok"].len(), 2);
}

#[tokio::test]
async fn scraper_status_ignores_sibling_fields() {
    let body = json!({
        "reddit": {"running": true, "total_posts": 120, "posts": [{"id": "p1"}]},
        "tiktok": {"running": false, "total_posts": 0, "videos": null},
        "timestamp": "2025-05-01T00:00:00Z"
    });
    let (client, _transport, _clock) = client(ScriptedTransport::new().json(API, 200, body));

    let result = client.fetch_scraper_status().await;

    let status = result.data().unwrap();
    assert_eq!(status.len(), 2);
    assert_eq!(status["reddit"].items().len(), 1);
    assert!(status["tiktok"].items().is_empty());
}

// =========================================================================
// Permanent failures
// =========================================================================

#[tokio::test]
async fn client_errors_are_not_retried() {
    let transport = ScriptedTransport::new().json(API, 404, json!({"error": "no such route"}));
    let (client, transport, clock) = client(transport);

    let result = client.fetch_scraper_status().await;

    assert_eq!(
        result.error_message(),
        Some("Server error (status 404): no such route")
    );
    assert_eq!(transport.calls_to(API), 1);
    assert!(clock.sleeps().is_empty());
    assert!(!client.status().get());
}

#[tokio::test]
async fn malformed_body_fails_without_fallback() {
    let transport = ScriptedTransport::new().text(API, 200, "{\"posts\": [");
    let (client, transport, _clock) = client(transport);

    let result = client.fetch_recent_data(Platform::TikTok, 5).await;

    assert!(!result.is_success());
    assert!(result.error_message().unwrap().starts_with("Malformed response"));
    assert_eq!(transport.calls_to(API), 1);
    assert!(!client.status().get());
}

#[tokio::test]
async fn throttling_is_retried() {
    let transport = ScriptedTransport::new()
        .text(API, 429, "slow down")
        .json(API, 200, json!({"data": []}));
    let (client, transport, _clock) = client(transport);

    let result = client.fetch_predictions().await;

    assert_eq!(result.data().map(Vec::len), Some(0));
    assert_eq!(transport.calls_to(API), 2);
}

// =========================================================================
// Options
// =========================================================================

#[tokio::test]
async fn force_mock_skips_the_network() {
    let (client, transport, _clock) = client(ScriptedTransport::new());

    let result = client
        .fetch_with_fallback(
            &Endpoint::RecentData {
                platform: "youtube".into(),
                limit: 3,
            },
            FetchOptions::mock(),
        )
        .await;

    assert!(result.is_mock());
    assert_eq!(result.data().unwrap().len(), 3);
    assert!(transport.requests().is_empty());
    assert!(client.status().get());
}

#[tokio::test]
async fn zero_retries_makes_no_attempt() {
    let (client, transport, clock) = client(ScriptedTransport::new());

    let result = client
        .fetch_with_fallback(&Endpoint::DbAnalysis, FetchOptions::default().with_max_retries(0))
        .await;

    assert!(result.is_mock());
    assert!(transport.requests().is_empty());
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn zero_retries_without_substitute_reports_missing_mock() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = TrendClient::new(config())
        .with_transport(transport)
        .with_clock(Arc::new(RecordingClock::new()))
        .with_mocks(Arc::new(NoMocks));

    let result = client
        .fetch_with_fallback(&Endpoint::Logs, FetchOptions::default().with_max_retries(0))
        .await;

    assert_eq!(
        result.error_message(),
        Some("No mock data available for GET /api/logs")
    );
}

#[tokio::test]
async fn per_call_delay_override() {
    let (client, _transport, clock) = client(ScriptedTransport::new());

    client
        .fetch_with_fallback(
            &Endpoint::DailyStats,
            FetchOptions::default()
                .with_max_retries(4)
                .with_retry_delay(Duration::from_millis(100)),
        )
        .await;

    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
        ]
    );
}

// =========================================================================
// Normalization
// =========================================================================

#[tokio::test]
async fn first_array_property_is_lifted() {
    let transport = ScriptedTransport::new().json(API, 200, json!({"weirdKey": [1, 2, 3], "otherKey": "x"}));
    let (client, _transport, _clock) = client(transport);

    let result = client
        .fetch_with_fallback(&Endpoint::DbAnalysis, FetchOptions::default())
        .await;

    assert_eq!(result.data(), Some(&vec![json!(1), json!(2), json!(3)]));
}

#[tokio::test]
async fn recent_data_is_sorted_and_limited() {
    let body = json!({"videos": [
        {"id": "old", "timestamp": "2025-05-01T08:00:00Z"},
        {"id": "undated"},
        {"id": "new", "scraped_at": "2025-05-03T08:00:00Z"},
        {"id": "mid", "created_at": "2025-05-02T08:00:00Z"}
    ]});
    let (client, _transport, _clock) = client(ScriptedTransport::new().json(API, 200, body));

    let result = client.fetch_recent_data(Platform::TikTok, 3).await;

    let ids: Vec<String> = result
        .data()
        .unwrap()
        .iter()
        .filter_map(|item| item.id())
        .collect();
    assert_eq!(ids, vec!["new", "undated", "mid"]);
}

// =========================================================================
// Mock API server fallback
// =========================================================================

#[tokio::test]
async fn mlops_falls_back_to_mock_api_server() {
    let transport = ScriptedTransport::new()
        .repeat(API, 3, server_error())
        .json(
            MOCK_API,
            200,
            json!([{"id": "trend_analysis", "name": "Trend Analysis", "status": "completed"}]),
        );
    let (client, transport, _clock) = client(transport);

    let result = client.fetch_pipelines().await;

    assert!(result.is_mock());
    assert_eq!(result.data().unwrap()[0].id, "trend_analysis");
    assert_eq!(transport.calls_to(MOCK_API), 1);
    assert_eq!(
        transport.requests().last().unwrap().path(),
        "/api/mlops/pipelines"
    );
}

#[tokio::test]
async fn mlops_with_mock_server_down_returns_real_error() {
    let (client, transport, _clock) = client(ScriptedTransport::new().repeat(API, 3, server_error()));

    let result = client.fetch_model_versions("topic_model").await;

    assert_eq!(
        result.error_message(),
        Some("Server error (status 500): upstream exploded")
    );
    assert_eq!(transport.calls_to(MOCK_API), 1);
}

#[tokio::test]
async fn logs_parse_from_text() {
    let text = "2025-05-01T10:00:00Z info reddit scraper started\n\n2025-05-01T10:05:00Z ERROR quota hit\n";
    let (client, _transport, _clock) = client(ScriptedTransport::new().text(API, 200, text));

    let logs = client.fetch_platform_log(Platform::Reddit).await;

    let entries = logs.data().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, "INFO");
    assert_eq!(entries[1].message, "quota hit");
}
