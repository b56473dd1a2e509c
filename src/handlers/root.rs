//! Root endpoint handler for the landing page.
//!
//! This module provides the `/` endpoint handler that displays a small
//! landing page linking to the metrics endpoint.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let version = env!("CARGO_PKG_VERSION");

    let uptime_secs = state.start_time.elapsed().as_secs();
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;
    let uptime_str = format!("{}h {}m {}s", hours, minutes, seconds);

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>procmem-exporter</title>
</head>
<body>
    <h1>procmem-exporter</h1>
    <p>PSS memory and process counts grouped by canonical program name.</p>
    <p>Version {version} &mdash; up {uptime}</p>
    <ul>
        <li><a href="/metrics">/metrics</a> &mdash; Prometheus-compatible metrics endpoint</li>
    </ul>
</body>
</html>"#,
        version = version,
        uptime = uptime_str
    );

    Html(html)
}
