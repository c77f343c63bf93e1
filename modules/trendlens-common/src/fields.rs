//! Field-name fallback chains.
//!
//! Upstream scrapers disagree on field names: a Reddit post carries
//! `created_at`, a YouTube record `scraped_at`, a TikTok video `timestamp`.
//! Every consumer probes the same ordered candidate list, so the lists live here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Maximum number of characters shown for a record's display text.
pub const DISPLAY_TEXT_LIMIT: usize = 200;

const ELLIPSIS: &str = "...";

/// Epoch values above this are treated as milliseconds rather than seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// An ordered list of candidate keys. The first key present with a non-null value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain {
    pub keys: &'static [&'static str],
}

pub const DATE_FIELDS: FieldChain = FieldChain {
    keys: &["scraped_at", "created_at", "timestamp", "date"],
};

pub const CONTENT_FIELDS: FieldChain = FieldChain {
    keys: &["text", "content", "body", "description"],
};

pub const AUTHOR_FIELDS: FieldChain = FieldChain {
    keys: &["author", "username", "channel_title", "channel"],
};

pub const TITLE_FIELDS: FieldChain = FieldChain {
    keys: &["title", "name"],
};

impl FieldChain {
    /// Return the first present, non-null value along the chain.
    pub fn lookup<'a>(&self, object: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| !value.is_null())
    }

    /// Like [`lookup`](Self::lookup), rendering scalars as strings.
    pub fn lookup_str(&self, object: &Map<String, Value>) -> Option<String> {
        self.lookup(object).and_then(value_as_string)
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the date formats seen across scrapers: RFC 3339, naive date-times
/// (assumed UTC), bare dates, and numeric epochs in seconds or milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            if raw.abs() >= EPOCH_MILLIS_THRESHOLD {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(raw) = s.parse::<i64>() {
        return parse_date(&Value::from(raw));
    }
    None
}

/// The record's date: the first field in [`DATE_FIELDS`] that parses.
pub fn extract_date(object: &Map<String, Value>) -> Option<DateTime<Utc>> {
    DATE_FIELDS.lookup(object).and_then(parse_date)
}

/// The record's display text, truncated to [`DISPLAY_TEXT_LIMIT`] characters.
pub fn extract_display_text(object: &Map<String, Value>) -> Option<String> {
    CONTENT_FIELDS
        .lookup_str(object)
        .map(|text| truncate_display(&text, DISPLAY_TEXT_LIMIT))
}

/// Truncate on a character boundary, appending an ellipsis when anything was cut.
pub fn truncate_display(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Sort newest-first by the date `date_of` extracts.
///
/// Items without a date keep their slot. Dated items are stably sorted among
/// the remaining slots, so equal dates preserve insertion order and sorting a
/// sorted list is a no-op.
pub fn sort_newest_first<T, F>(items: &mut Vec<T>, date_of: F)
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let dates: Vec<Option<DateTime<Utc>>> = items.iter().map(&date_of).collect();
    let dated_slots: Vec<usize> = dates
        .iter()
        .enumerate()
        .filter_map(|(idx, date)| date.map(|_| idx))
        .collect();
    if dated_slots.len() < 2 {
        return;
    }

    let mut taken: Vec<Option<T>> = std::mem::take(items).into_iter().map(Some).collect();
    let mut dated: Vec<(DateTime<Utc>, T)> = dated_slots
        .iter()
        .filter_map(|&idx| Some((dates[idx]?, taken[idx].take()?)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    for (slot, (_, item)) in dated_slots.into_iter().zip(dated) {
        taken[slot] = Some(item);
    }
    *items = taken.into_iter().flatten().collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn date_chain_prefers_scraped_at() {
        let record = obj(json!({
            "created_at": "2025-05-01T00:00:00Z",
            "scraped_at": "2025-05-02T00:00:00Z",
        }));
        let date = extract_date(&record).unwrap();
        assert_eq!(date.to_rfc3339(), "2025-05-02T00:00:00+00:00");
    }

    #[test]
    fn null_fields_are_skipped() {
        let record = obj(json!({"scraped_at": null, "timestamp": "2025-05-03"}));
        let date = extract_date(&record).unwrap();
        assert_eq!(date.date_naive().to_string(), "2025-05-03");
    }

    #[test]
    fn epoch_seconds_and_millis() {
        let secs = parse_date(&json!(1_700_000_000)).unwrap();
        let millis = parse_date(&json!(1_700_000_000_000i64)).unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn naive_datetime_with_space() {
        let date = parse_date(&json!("2025-05-01 13:45:00")).unwrap();
        assert_eq!(date.to_rfc3339(), "2025-05-01T13:45:00+00:00");
    }

    #[test]
    fn garbage_date_is_none() {
        assert!(parse_date(&json!("yesterday-ish")).is_none());
        assert!(parse_date(&json!({"nested": true})).is_none());
    }

    #[test]
    fn content_chain_order() {
        let record = obj(json!({"description": "d", "body": "b"}));
        assert_eq!(extract_display_text(&record).as_deref(), Some("b"));
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let long = "x".repeat(250);
        let record = obj(json!({ "text": long }));
        let shown = extract_display_text(&record).unwrap();
        assert_eq!(shown.chars().count(), DISPLAY_TEXT_LIMIT + ELLIPSIS.len());
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn exact_limit_is_not_truncated() {
        let text = "é".repeat(DISPLAY_TEXT_LIMIT);
        assert_eq!(truncate_display(&text, DISPLAY_TEXT_LIMIT), text);
    }

    #[test]
    fn sort_keeps_undated_items_in_place() {
        let mut items = vec![
            (1, Some("2025-05-01")),
            (2, None),
            (3, Some("2025-05-03")),
            (4, Some("2025-05-02")),
        ];
        sort_newest_first(&mut items, |(_, d)| d.and_then(|d| parse_date(&json!(d))));
        let ids: Vec<i32> = items.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let mut items = vec![(1, "2025-05-01"), (2, "2025-05-01"), (3, "2025-05-02")];
        sort_newest_first(&mut items, |(_, d)| parse_date(&json!(d)));
        let ids: Vec<i32> = items.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut items = vec![
            (1, Some("2025-04-30")),
            (2, None),
            (3, Some("2025-05-03")),
            (4, None),
            (5, Some("2025-05-03")),
        ];
        let date_of = |(_, d): &(i32, Option<&str>)| d.and_then(|d| parse_date(&json!(d)));
        sort_newest_first(&mut items, date_of);
        let once = items.clone();
        sort_newest_first(&mut items, date_of);
        assert_eq!(items, once);
    }
}
