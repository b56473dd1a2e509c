//! procmem-exporter library.
//!
//! Periodically samples the process table, sums proportional resident
//! memory (PSS) per canonical program name, and republishes the totals as
//! Prometheus gauges together with per-name process counts.
//!
//! The sampling cycle is a four-stage pipeline, each stage testable with
//! synthetic inputs:
//!
//! 1. enumerate live processes ([`process::ProcessLister`])
//! 2. canonicalize names and measure memory ([`process::canonical_name`],
//!    [`process::MemoryReader`])
//! 3. aggregate per-name sums and counts ([`sampler::run_pass`])
//! 4. reconcile against the previously exposed label set
//!    ([`reconciler::ExposureReconciler`])

pub mod cli;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod process;
pub mod reconciler;
pub mod sampler;
pub mod scheduler;
pub mod state;

// Re-export main types for convenience
pub use metrics::ProcessMetrics;
pub use reconciler::{ExposureReconciler, MetricSink};
pub use sampler::{run_pass, PassAggregate};
