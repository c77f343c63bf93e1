//! trendlens-mock-server: the TrendLens REST surface backed by canned and
//! generated data, so the dashboard runs with no real backend.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::MockState;
