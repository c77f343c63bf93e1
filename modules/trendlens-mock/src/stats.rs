use std::collections::BTreeMap;

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use trendlens_common::{
    DailyCount, DailyStats, Platform, PlatformStatus, ScraperStatus, SourceStats,
};

use crate::content::{mock_content, sample_count};

/// Number of recent items embedded in each platform's scraper status.
const STATUS_PREVIEW_ITEMS: usize = 5;

fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Per-platform daily post counts for the last `days` days, oldest first.
pub fn generate_mock_daily_stats(days: usize) -> DailyStats {
    let mut rng = rand::rng();
    let today = Utc::now().date_naive();
    let mut stats = BTreeMap::new();

    for platform in Platform::ALL {
        let base = match platform {
            Platform::Reddit => 420,
            Platform::TikTok => 260,
            Platform::YouTube => 150,
        };
        let series = (0..days)
            .rev()
            .map(|offset| DailyCount {
                date: (today - Duration::days(offset as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                count: base + rng.random_range(0..base / 2),
            })
            .collect();
        stats.insert(platform.to_string(), series);
    }
    stats
}

/// Scraper health for every platform, with a handful of recent items each.
pub fn generate_mock_scraper_status() -> ScraperStatus {
    let mut rng = rand::rng();
    Platform::ALL
        .into_iter()
        .map(|platform| {
            let items = mock_content(platform, STATUS_PREVIEW_ITEMS);
            let (posts, videos) = match platform {
                Platform::Reddit => (Some(items), None),
                Platform::TikTok | Platform::YouTube => (None, Some(items)),
            };
            let status = PlatformStatus {
                running: rng.random_bool(0.8),
                total_posts: rng.random_range(5_000..50_000),
                last_update: Some(minutes_ago(rng.random_range(1..45))),
                posts,
                videos,
            };
            (platform.to_string(), status)
        })
        .collect()
}

pub fn generate_mock_source_stats() -> Vec<SourceStats> {
    let mut rng = rand::rng();
    Platform::ALL
        .into_iter()
        .map(|platform| SourceStats {
            platform: platform.to_string(),
            total_records: rng.random_range(10_000..120_000),
            records_last_24h: rng.random_range(200..2_500),
            last_scraped_at: Some(minutes_ago(rng.random_range(1..60))),
        })
        .collect()
}

/// Scraper log text in the `timestamp level message` line format.
pub fn generate_mock_logs(platform: Option<Platform>) -> String {
    let platforms: Vec<Platform> = match platform {
        Some(p) => vec![p],
        None => Platform::ALL.to_vec(),
    };
    let mut lines = Vec::new();
    for (i, platform) in platforms.iter().enumerate() {
        let base = (platforms.len() - i) as i64 * 30;
        lines.push(format!("{} INFO {platform} scraper started", minutes_ago(base)));
        lines.push(format!(
            "{} INFO {platform} fetched {} records",
            minutes_ago(base - 5),
            sample_count(*platform)
        ));
        lines.push(format!(
            "{} WARNING {platform} rate limit approaching, backing off",
            minutes_ago(base - 10)
        ));
        lines.push(format!("{} INFO {platform} scraper idle", minutes_ago(base - 15)));
    }
    lines.join("\n")
}
