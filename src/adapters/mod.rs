//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure and exposes the use cases over HTTP. Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: axum HTTP routes and error mapping
//! - `metrics`: Prometheus metrics export
//! - `persistence`: JSON listing snapshots

pub mod api;
pub mod metrics;
pub mod persistence;
