use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::endpoint::{ApiRequest, HttpMethod};
use crate::error::{FetchError, Result};

/// Raw HTTP response: status plus the undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request. Retry and fallback live above this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest, timeout: Duration) -> Result<ApiResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Join base URL, path segments and query pairs; segments are percent-encoded individually.
pub fn build_url(request: &ApiRequest) -> Result<Url> {
    let mut url = Url::parse(&request.base_url)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidRequest(format!("cannot-be-a-base URL: {}", request.base_url)))?
        .pop_if_empty()
        .extend(request.segments.iter());
    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(request.query.iter());
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest, timeout: Duration) -> Result<ApiResponse> {
        let url = build_url(request)?;
        let builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let resp = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::from(e)
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::from(e)
            }
        })?;
        Ok(ApiResponse { status, body })
    }
}
