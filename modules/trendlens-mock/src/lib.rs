//! trendlens-mock: synthetic data for running the dashboard without a backend.
//!
//! Every generator returns the same shape the real API does; only the
//! fetch layer's mock-data flag tells consumers the data is synthetic.

pub mod content;
pub mod stats;
pub mod topics;

pub use content::{get_mock_data, mock_content, sample_count};
pub use stats::{
    generate_mock_daily_stats, generate_mock_logs, generate_mock_scraper_status,
    generate_mock_source_stats,
};
pub use topics::{
    date_range, generate_mock_analysis, generate_mock_predictions, generate_mock_topic_model,
    MIN_TOPIC_COUNT, TOPIC_NAME_POOL,
};
