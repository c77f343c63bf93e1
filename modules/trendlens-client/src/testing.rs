//! In-memory transport and clock for exercising the fetch layer without a
//! network or real time.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::clock::Clock;
use crate::endpoint::ApiRequest;
use crate::error::{FetchError, Result};
use crate::transport::{ApiResponse, Transport};

/// Replays queued responses per base URL and records every request.
/// A base URL with nothing queued behaves like a refused connection.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<ApiResponse>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(self, base_url: &str, response: Result<ApiResponse>) -> Self {
        lock(&self.scripts)
            .entry(base_url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn json(self, base_url: &str, status: u16, body: Value) -> Self {
        self.push(base_url, Ok(ApiResponse::new(status, body.to_string())))
    }

    pub fn text(self, base_url: &str, status: u16, body: &str) -> Self {
        self.push(base_url, Ok(ApiResponse::new(status, body)))
    }

    pub fn fail(self, base_url: &str, error: FetchError) -> Self {
        self.push(base_url, Err(error))
    }

    /// Queue the same response `times` times.
    pub fn repeat(mut self, base_url: &str, times: usize, response: Result<ApiResponse>) -> Self {
        for _ in 0..times {
            self = self.push(base_url, response.clone());
        }
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn calls_to(&self, base_url: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.base_url == base_url)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest, _timeout: Duration) -> Result<ApiResponse> {
        lock(&self.requests).push(request.clone());
        lock(&self.scripts)
            .get_mut(&request.base_url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(FetchError::Network(format!("connection refused: {}", request.base_url))))
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
