//! trendlens-client: resilient access to the TrendLens backend.
//!
//! Calls go through a bounded retry loop; once the backend has given up they
//! fall back to static mock data (or the mock API server for MLOps routes),
//! and [`MockDataStatus`] tells the UI that what it shows is synthetic.

pub mod client;
pub mod clock;
pub mod endpoint;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod retry;
pub mod status;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::TrendClient;
pub use clock::{Clock, TokioClock};
pub use endpoint::{ApiRequest, Backend, Endpoint, HttpMethod, ResponseFormat};
pub use error::{FetchError, Result};
pub use fallback::{MockSource, NoMocks, StaticMocks};
pub use normalize::{normalize, Normalized, Shape};
pub use retry::{AttemptOutcome, FetchOptions, FetchState, RetryMachine, RetryPolicy, RetryReport};
pub use status::MockDataStatus;
pub use transport::{ApiResponse, HttpTransport, Transport};
