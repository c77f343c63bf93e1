// Synthetic topic-model output.
// Shape matches the backend's POST /api/topic-model response exactly.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde_json::{json, Map, Value};
use trendlens_common::{
    Prediction, TimeRange, Topic, TopicCounts, TopicModelResponse, OTHER_TOPIC_ID,
    OTHER_TOPIC_NAME,
};

/// Lowest count any topic reports for a day.
pub const MIN_TOPIC_COUNT: u64 = 1;

/// Topic names, in the order topics are handed out.
pub const TOPIC_NAME_POOL: &[&str] = &[
    "Artificial Intelligence",
    "Climate Change",
    "Personal Finance",
    "Sports",
    "Gaming",
    "Health & Wellness",
    "Politics",
    "Travel",
    "Food & Cooking",
    "Remote Work",
];

const BASE_DAILY_COUNT: f64 = 40.0;
const SINE_AMPLITUDE: f64 = 18.0;
const NOISE_RANGE: i64 = 8;

fn keywords_for(name: &str) -> Vec<String> {
    let words: &[&str] = match name {
        "Artificial Intelligence" => &["ai", "llm", "chatgpt", "model", "openai"],
        "Climate Change" => &["climate", "heat", "emissions", "solar", "weather"],
        "Personal Finance" => &["budget", "savings", "inflation", "rates", "mortgage"],
        "Sports" => &["game", "final", "team", "season", "highlights"],
        "Gaming" => &["indie", "steam", "speedrun", "release", "console"],
        "Health & Wellness" => &["sleep", "fitness", "diet", "study", "heart"],
        "Politics" => &["election", "council", "policy", "vote", "bill"],
        "Travel" => &["trip", "hostel", "flight", "beach", "backpacking"],
        "Food & Cooking" => &["recipe", "salad", "grocery", "meal", "kitchen"],
        "Remote Work" => &["remote", "office", "hiring", "wfh", "commute"],
        OTHER_TOPIC_NAME => &["misc", "general", "other"],
        _ => &["keyword1", "keyword2", "keyword3"],
    };
    words.iter().map(|w| w.to_string()).collect()
}

/// Name for the `index`-th topic, cycling through the pool with a numeric suffix.
fn topic_name(index: usize) -> String {
    let base = TOPIC_NAME_POOL[index % TOPIC_NAME_POOL.len()];
    match index / TOPIC_NAME_POOL.len() {
        0 => base.to_string(),
        round => format!("{base} {}", round + 1),
    }
}

/// Inclusive list of dates; empty when either bound is unparseable or start is after end.
pub fn date_range(start_date: &str, end_date: &str) -> Vec<NaiveDate> {
    let (Ok(start), Ok(end)) = (
        NaiveDate::parse_from_str(start_date, "%Y-%m-%d"),
        NaiveDate::parse_from_str(end_date, "%Y-%m-%d"),
    ) else {
        tracing::warn!(start_date, end_date, "Unparseable topic-model date range");
        return Vec::new();
    };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Smooth, plausible per-day count: a phase-shifted sine on day-of-month plus bounded noise.
fn daily_count(topic_index: usize, date: NaiveDate, rng: &mut impl Rng) -> u64 {
    let phase = topic_index as f64 * 0.9;
    let wave = ((date.day() as f64 / 4.0) + phase).sin() * SINE_AMPLITUDE;
    let noise = rng.random_range(-NOISE_RANGE..=NOISE_RANGE) as f64;
    let scaled = (BASE_DAILY_COUNT - topic_index as f64 * 2.5).max(10.0);
    let value = (scaled + wave + noise).round();
    if value < MIN_TOPIC_COUNT as f64 {
        MIN_TOPIC_COUNT
    } else {
        value as u64
    }
}

/// Generate `num_topics` named topics plus the reserved "Other" topic.
pub fn generate_mock_topic_model(
    num_topics: usize,
    start_date: &str,
    end_date: &str,
) -> TopicModelResponse {
    let mut rng = rand::rng();
    let dates = date_range(start_date, end_date);

    let mut topics: Vec<Topic> = (0..num_topics)
        .map(|i| {
            let name = topic_name(i);
            let base = TOPIC_NAME_POOL[i % TOPIC_NAME_POOL.len()];
            Topic {
                id: i as i64,
                keywords: keywords_for(base),
                name,
                weight: round3(rng.random_range(0.05..0.25)),
                coherence_score: round3(rng.random_range(0.35..0.75)),
            }
        })
        .collect();

    topics.push(Topic {
        id: OTHER_TOPIC_ID,
        name: OTHER_TOPIC_NAME.to_string(),
        keywords: keywords_for(OTHER_TOPIC_NAME),
        weight: round3(rng.random_range(0.01..0.05)),
        coherence_score: 0.0,
    });

    let mut counts: TopicCounts = BTreeMap::new();
    let mut total_documents = 0u64;
    for topic in topics.iter().filter(|t| !t.is_other()) {
        let per_day: BTreeMap<String, u64> = dates
            .iter()
            .map(|date| {
                let count = daily_count(topic.id as usize, *date, &mut rng);
                total_documents += count;
                (date.format("%Y-%m-%d").to_string(), count)
            })
            .collect();
        counts.insert(topic.id.to_string(), per_day);
    }

    let named = topics.iter().filter(|t| !t.is_other()).count().max(1) as f64;
    let mean_coherence =
        topics.iter().filter(|t| !t.is_other()).map(|t| t.coherence_score).sum::<f64>() / named;

    let mut metrics = Map::new();
    metrics.insert("coherence_score".into(), json!(round3(mean_coherence)));
    metrics.insert("diversity".into(), json!(round3(rng.random_range(0.6..0.95))));
    metrics.insert("num_documents".into(), json!(total_documents));
    metrics.insert("num_topics".into(), json!(num_topics));

    TopicModelResponse {
        topics,
        topic_counts_by_date: counts,
        metrics,
        time_range: TimeRange {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        },
    }
}

/// Growth predictions for the first `count` pool topics.
pub fn generate_mock_predictions(count: usize) -> Vec<Prediction> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let current = rng.random_range(200..5_000u64);
            let growth: f64 = rng.random_range(-0.3..0.8);
            Prediction {
                topic: topic_name(i),
                current_volume: current,
                predicted_volume: ((current as f64) * (1.0 + growth)).max(0.0).round() as u64,
                growth_rate: round3(growth),
                confidence: round3(rng.random_range(0.55..0.95)),
                horizon_days: 7,
            }
        })
        .collect()
}

/// Topic-level analysis rows, shaped like GET /api/db/analysis.
pub fn generate_mock_analysis(count: usize) -> Vec<Value> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            json!({
                "topic": topic_name(i),
                "sentiment": round3(rng.random_range(-0.6..0.8)),
                "positive": rng.random_range(20..70u32),
                "neutral": rng.random_range(10..40u32),
                "negative": rng.random_range(5..30u32),
                "sample_size": rng.random_range(100..2_000u32),
            })
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_topics_over_three_days() {
        let model = generate_mock_topic_model(5, "2025-05-01", "2025-05-03");
        assert_eq!(model.topics.len(), 6);
        assert_eq!(model.topics.iter().filter(|t| t.is_other()).count(), 1);

        for topic in model.topics.iter().filter(|t| !t.is_other()) {
            let per_day = model
                .topic_counts_by_date
                .get(&topic.id.to_string())
                .expect("counts for every named topic");
            let dates: Vec<&str> = per_day.keys().map(String::as_str).collect();
            assert_eq!(dates, vec!["2025-05-01", "2025-05-02", "2025-05-03"]);
            assert!(per_day.values().all(|c| *c >= MIN_TOPIC_COUNT));
        }
        assert!(!model.topic_counts_by_date.contains_key(&OTHER_TOPIC_ID.to_string()));
    }

    #[test]
    fn other_topic_uses_sentinel_id() {
        let model = generate_mock_topic_model(2, "2025-05-01", "2025-05-01");
        let other = model.topics.last().unwrap();
        assert_eq!(other.id, OTHER_TOPIC_ID);
        assert_eq!(other.name, OTHER_TOPIC_NAME);
    }

    #[test]
    fn names_cycle_past_the_pool() {
        let n = TOPIC_NAME_POOL.len() + 2;
        let model = generate_mock_topic_model(n, "2025-05-01", "2025-05-02");
        assert_eq!(model.topics.len(), n + 1);
        assert_eq!(model.topics[TOPIC_NAME_POOL.len()].name, format!("{} 2", TOPIC_NAME_POOL[0]));
        assert_eq!(
            model.topics[TOPIC_NAME_POOL.len()].keywords,
            model.topics[0].keywords
        );
    }

    #[test]
    fn unmapped_names_get_placeholder_keywords() {
        assert_eq!(keywords_for("Basket Weaving"), vec!["keyword1", "keyword2", "keyword3"]);
    }

    #[test]
    fn inverted_range_has_no_dates() {
        let model = generate_mock_topic_model(3, "2025-05-03", "2025-05-01");
        assert!(model.topic_counts_by_date.values().all(|days| days.is_empty()));
        assert_eq!(model.time_range.start_date, "2025-05-03");
    }

    #[test]
    fn zero_topics_still_has_other() {
        let model = generate_mock_topic_model(0, "2025-05-01", "2025-05-03");
        assert_eq!(model.topics.len(), 1);
        assert!(model.topic_counts_by_date.is_empty());
    }

    #[test]
    fn predictions_are_consistent() {
        for p in generate_mock_predictions(4) {
            assert!(p.confidence >= 0.55 && p.confidence <= 0.95);
            assert_eq!(p.horizon_days, 7);
        }
    }
}
