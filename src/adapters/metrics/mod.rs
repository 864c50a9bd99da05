//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics rendered on the API's `/metrics` route. Liveness
//! and readiness probes live with the HTTP routes in `adapters::api`.

pub mod prometheus;

pub use self::prometheus::MetricsRegistry;
