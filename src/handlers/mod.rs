//! HTTP handlers for the exporter's endpoints.
//!
//! This module provides:
//! - `metrics`: Prometheus text exposition at /metrics
//! - `root`: landing page at /

pub mod metrics;
pub mod root;

pub use metrics::metrics_handler;
pub use root::root_handler;
