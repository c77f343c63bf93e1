use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No mock data available for {0}")]
    NoMockDataAvailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Build a server error, preferring the `error`/`message` field of a JSON body.
    pub fn server(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());
        FetchError::Server { status, message }
    }

    /// Transient failures are retried; everything else surfaces immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => true,
            FetchError::Server { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            FetchError::MalformedResponse(_)
            | FetchError::NoMockDataAvailable(_)
            | FetchError::InvalidRequest(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            FetchError::InvalidRequest(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_extracts_json_message() {
        let err = FetchError::server(404, r#"{"error": "etl not found"}"#);
        assert_eq!(err.to_string(), "Server error (status 404): etl not found");
        assert!(!err.is_transient());
    }

    #[test]
    fn server_error_keeps_plain_body() {
        let err = FetchError::server(502, "Bad Gateway\n");
        assert_eq!(
            err,
            FetchError::Server {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
        assert!(err.is_transient());
    }

    #[test]
    fn throttling_is_transient() {
        assert!(FetchError::server(429, "").is_transient());
        assert!(FetchError::server(408, "").is_transient());
        assert!(!FetchError::server(400, "").is_transient());
    }

    #[test]
    fn timeout_message() {
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(1500)).to_string(),
            "Request timed out after 1500ms"
        );
    }
}
