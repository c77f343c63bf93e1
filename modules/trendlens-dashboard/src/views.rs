// Plain-text renderings of fetched data.

use std::fmt::Write;

use trendlens_common::{
    ContentItem, DriftReport, ExecutionAck, LogEntry, PipelineDescriptor, ScraperStatus,
    TopicModelResponse,
};

pub const MOCK_BANNER: &str =
    "!! Backend unavailable: showing SAMPLE data. Numbers below are not real.";

pub fn recent(platform: &str, items: &[ContentItem]) -> String {
    let mut out = format!("Recent {platform} content ({} items)\n", items.len());
    for item in items {
        let date = item
            .date()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        let author = item.author().unwrap_or_else(|| "anonymous".to_string());
        let _ = writeln!(out, "- [{date}] {author}");
        if let Some(title) = item.title() {
            let _ = writeln!(out, "    {title}");
        }
        if let Some(text) = item.display_text() {
            let _ = writeln!(out, "    {text}");
        }
    }
    out
}

pub fn topics(model: &TopicModelResponse) -> String {
    let mut out = format!(
        "Topics {} .. {}\n",
        model.time_range.start_date, model.time_range.end_date
    );
    for topic in &model.topics {
        let total: u64 = model
            .topic_counts_by_date
            .get(&topic.id.to_string())
            .map(|days| days.values().sum())
            .unwrap_or(0);
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:>6} docs  [{}]",
            topic.id,
            topic.name,
            total,
            topic.keywords.join(", ")
        );
    }
    if let Some(coherence) = model.metrics.get("coherence_score") {
        let _ = writeln!(out, "coherence: {coherence}");
    }
    out
}

pub fn pipelines(pipelines: &[PipelineDescriptor]) -> String {
    let mut out = String::new();
    for p in pipelines {
        let _ = writeln!(
            out,
            "{:<16} {:<10} last run {}",
            p.id,
            p.status.to_string(),
            p.last_run.as_deref().unwrap_or("never")
        );
        for step in &p.steps {
            let _ = writeln!(out, "    - {} ({})", step.name, step.status);
        }
    }
    out
}

pub fn execution(ack: &ExecutionAck) -> String {
    format!(
        "Execution {} of {} {} at {}",
        ack.execution_id, ack.pipeline_id, ack.status, ack.started_at
    )
}

pub fn drift(report: &DriftReport) -> String {
    let verdict = if report.drift_detected { "DRIFT DETECTED" } else { "stable" };
    let mut out = format!(
        "{}: {verdict} (score {:.2}, threshold {:.2})\n",
        report.model_name, report.drift_score, report.threshold
    );
    for f in &report.features {
        let mark = if f.drifted { "*" } else { " " };
        let _ = writeln!(out, " {mark} {:<16} {:.2}", f.feature, f.drift_score);
    }
    out
}

pub fn scraper_status(status: &ScraperStatus) -> String {
    let mut out = String::new();
    for (platform, s) in status {
        let state = if s.running { "running" } else { "stopped" };
        let _ = writeln!(
            out,
            "{platform:<8} {state:<8} {:>8} posts  updated {}",
            s.total_posts,
            s.last_update.as_deref().unwrap_or("never")
        );
    }
    out
}

pub fn logs(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(out, "{:<22} {:<8} {}", e.timestamp, e.level, e.message);
    }
    out
}
