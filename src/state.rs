//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers and used by the background sampling task.

use prometheus::{Gauge, Registry};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::metrics::ProcessMetrics;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests and the sampling task.
pub struct AppState {
    pub registry: Registry,
    pub metrics: ProcessMetrics,
    pub scrape_duration: Gauge,
    pub pass_duration: Gauge,
    pub pass_success: Gauge,
    pub config: Arc<Config>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}
