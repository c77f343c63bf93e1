// Bounded retry for a single logical request.
//
// The loop is an explicit state machine so the sequence of attempts and waits
// can be asserted on directly:
//
//   Attempting(1) -> Waiting(1) -> Attempting(2) -> ... -> FallingBack -> Done
//
// Permanent errors and successes go straight to Done.

use std::time::Duration;

use trendlens_common::Config;

use crate::clock::Clock;
use crate::endpoint::ApiRequest;
use crate::error::FetchError;
use crate::transport::{ApiResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, not additional ones. Zero makes no attempt.
    pub max_retries: u32,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Base delay, scaled linearly by the attempt number.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            timeout: config.timeout,
            retry_delay: config.retry_delay,
        }
    }

    /// Wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

/// Per-call overrides; `None` falls back to the client's [`Config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub force_mock: Option<bool>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl FetchOptions {
    pub fn mock() -> Self {
        Self {
            force_mock: Some(true),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }

    /// Resolve against config: `(force_mock, policy)`.
    pub fn resolve(&self, config: &Config) -> (bool, RetryPolicy) {
        let defaults = RetryPolicy::from_config(config);
        let policy = RetryPolicy {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
        };
        (self.force_mock.unwrap_or(config.force_mock), policy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Attempting(u32),
    Waiting(u32),
    FallingBack,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Succeeded(ApiResponse),
    /// Permanent failure; no retry, no fallback.
    Rejected(FetchError),
    /// Every attempt failed transiently. Carries the last error, if any attempt ran.
    Exhausted(Option<FetchError>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryReport {
    pub outcome: AttemptOutcome,
    pub attempts: u32,
    pub history: Vec<FetchState>,
}

pub struct RetryMachine<'a> {
    transport: &'a dyn Transport,
    clock: &'a dyn Clock,
    policy: RetryPolicy,
}

impl<'a> RetryMachine<'a> {
    pub fn new(transport: &'a dyn Transport, clock: &'a dyn Clock, policy: RetryPolicy) -> Self {
        Self {
            transport,
            clock,
            policy,
        }
    }

    pub async fn run(&self, request: &ApiRequest) -> RetryReport {
        let mut history = Vec::new();
        let mut attempts = 0;
        let mut last_error = None;
        let mut outcome = None;
        let mut state = if self.policy.max_retries == 0 {
            FetchState::FallingBack
        } else {
            FetchState::Attempting(1)
        };

        loop {
            history.push(state);
            state = match state {
                FetchState::Attempting(n) => {
                    attempts = n;
                    match attempt(self.transport, request, self.policy.timeout).await {
                        Ok(response) => {
                            outcome = Some(AttemptOutcome::Succeeded(response));
                            FetchState::Done
                        }
                        Err(e) if e.is_transient() => {
                            tracing::warn!(
                                method = %request.method,
                                path = %request.path(),
                                attempt = n,
                                max_retries = self.policy.max_retries,
                                status = ?e.status(),
                                error = %e,
                                "Fetch attempt failed"
                            );
                            last_error = Some(e);
                            if n < self.policy.max_retries {
                                FetchState::Waiting(n)
                            } else {
                                FetchState::FallingBack
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                method = %request.method,
                                path = %request.path(),
                                attempt = n,
                                status = ?e.status(),
                                error = %e,
                                "Fetch rejected"
                            );
                            outcome = Some(AttemptOutcome::Rejected(e));
                            FetchState::Done
                        }
                    }
                }
                FetchState::Waiting(n) => {
                    let delay = self.policy.delay_after(n);
                    tracing::debug!(attempt = n, delay_ms = delay.as_millis() as u64, "Waiting before retry");
                    self.clock.sleep(delay).await;
                    FetchState::Attempting(n + 1)
                }
                FetchState::FallingBack => {
                    outcome = Some(AttemptOutcome::Exhausted(last_error.take()));
                    FetchState::Done
                }
                FetchState::Done => break,
            };
        }

        RetryReport {
            outcome: outcome.unwrap_or(AttemptOutcome::Exhausted(None)),
            attempts,
            history,
        }
    }
}

/// One request with the per-attempt timeout; non-2xx becomes a server error.
pub async fn attempt(
    transport: &dyn Transport,
    request: &ApiRequest,
    timeout: Duration,
) -> Result<ApiResponse, FetchError> {
    let response = tokio::time::timeout(timeout, transport.send(request, timeout))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;
    if response.is_success() {
        Ok(response)
    } else {
        Err(FetchError::server(response.status, &response.body))
    }
}
