use std::time::Duration;

use crate::error::TrendLensError;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_MOCK_API_URL: &str = "http://localhost:3001";
const DEFAULT_TIMEOUT_MS: u64 = 45_000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Dashboard configuration loaded from environment variables.
/// Read once at startup; there is no hot-reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Backends
    pub api_url: String,
    pub mock_api_url: String,
    pub drift_api_url: String,

    // Fetch behaviour
    pub force_mock: bool,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            mock_api_url: DEFAULT_MOCK_API_URL.to_string(),
            drift_api_url: DEFAULT_API_URL.to_string(),
            force_mock: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, TrendLensError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TrendLensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = non_empty(lookup("TRENDLENS_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let drift_api_url =
            non_empty(lookup("TRENDLENS_DRIFT_API_URL")).unwrap_or_else(|| api_url.clone());

        Ok(Self {
            mock_api_url: trim_slash(
                non_empty(lookup("TRENDLENS_MOCK_API_URL"))
                    .unwrap_or_else(|| DEFAULT_MOCK_API_URL.to_string()),
            ),
            force_mock: parse_bool("TRENDLENS_USE_MOCK_DATA", lookup("TRENDLENS_USE_MOCK_DATA"))?,
            timeout: Duration::from_millis(parse_number(
                "TRENDLENS_TIMEOUT_MS",
                lookup("TRENDLENS_TIMEOUT_MS"),
                DEFAULT_TIMEOUT_MS,
            )?),
            max_retries: parse_number(
                "TRENDLENS_MAX_RETRIES",
                lookup("TRENDLENS_MAX_RETRIES"),
                DEFAULT_MAX_RETRIES,
            )?,
            retry_delay: Duration::from_millis(parse_number(
                "TRENDLENS_RETRY_DELAY_MS",
                lookup("TRENDLENS_RETRY_DELAY_MS"),
                DEFAULT_RETRY_DELAY_MS,
            )?),
            api_url: trim_slash(api_url),
            drift_api_url: trim_slash(drift_api_url),
        })
    }

    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  TRENDLENS_API_URL: {}", self.api_url);
        tracing::info!("  TRENDLENS_MOCK_API_URL: {}", self.mock_api_url);
        tracing::info!("  TRENDLENS_DRIFT_API_URL: {}", self.drift_api_url);
        tracing::info!("  TRENDLENS_USE_MOCK_DATA: {}", self.force_mock);
        tracing::info!(
            timeout_ms = self.timeout.as_millis() as u64,
            max_retries = self.max_retries,
            retry_delay_ms = self.retry_delay.as_millis() as u64,
            "  Fetch policy"
        );
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_bool(key: &str, value: Option<String>) -> Result<bool, TrendLensError> {
    match non_empty(value).map(|v| v.to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(TrendLensError::Config(format!("{key} must be a boolean, got {v:?}"))),
        },
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, TrendLensError> {
    match non_empty(value) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| TrendLensError::Config(format!("{key} must be a number, got {v:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn drift_url_falls_back_to_api_url() {
        let config = Config::from_lookup(lookup(&[("TRENDLENS_API_URL", "http://api:9000/")])).unwrap();
        assert_eq!(config.api_url, "http://api:9000");
        assert_eq!(config.drift_api_url, "http://api:9000");
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("TRENDLENS_USE_MOCK_DATA", "TRUE"),
            ("TRENDLENS_TIMEOUT_MS", "500"),
            ("TRENDLENS_MAX_RETRIES", "0"),
            ("TRENDLENS_RETRY_DELAY_MS", "25"),
            ("TRENDLENS_DRIFT_API_URL", "http://drift:5000"),
        ]))
        .unwrap();
        assert!(config.force_mock);
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_delay, Duration::from_millis(25));
        assert_eq!(config.drift_api_url, "http://drift:5000");
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("TRENDLENS_MAX_RETRIES", "three")])).unwrap_err();
        assert!(matches!(err, TrendLensError::Config(_)));
    }

    #[test]
    fn invalid_bool_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("TRENDLENS_USE_MOCK_DATA", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("TRENDLENS_USE_MOCK_DATA"));
    }
}
