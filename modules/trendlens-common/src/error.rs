use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
