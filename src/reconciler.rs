//! Reconciliation of pass aggregates against the exposed metric set.
//!
//! The reconciler owns the set of canonical names currently published in
//! the metric sink. Each pass it upserts the fresh values, then retracts
//! every series whose name no longer appears, so metrics for dead process
//! groups never linger.

use ahash::AHashSet as HashSet;
use tracing::debug;

use crate::sampler::PassAggregate;

/// Label-keyed gauge sink written by the reconciler.
///
/// Implemented by the Prometheus gauge vectors in production and by
/// recording fakes in tests. Operations are local and infallible.
pub trait MetricSink {
    fn set_memory_bytes(&self, name: &str, bytes: u64);
    fn set_process_count(&self, name: &str, count: u64);
    /// Deletes the series for `name` from both gauges.
    fn remove(&self, name: &str);
}

/// Tracks which canonical names are currently exposed and applies the
/// minimal set of upserts and deletes to make the sink match a new pass.
#[derive(Debug, Default)]
pub struct ExposureReconciler {
    exposed: HashSet<String>,
}

impl ExposureReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one pass's aggregate to the sink.
    ///
    /// Upserts run before pruning, so a name present in consecutive passes
    /// is never transiently deleted and re-added within one cycle. A name
    /// counts as present while it appears in either mapping; this keeps the
    /// count series of a live process alive even when every memory read for
    /// it failed this pass.
    pub fn reconcile<S: MetricSink>(&mut self, aggregate: &PassAggregate, sink: &S) {
        for (name, bytes) in &aggregate.bytes_by_name {
            sink.set_memory_bytes(name, *bytes);
            self.exposed.insert(name.clone());
        }
        for (name, count) in &aggregate.counts_by_name {
            sink.set_process_count(name, *count);
            self.exposed.insert(name.clone());
        }

        // Clean up dead data.
        let stale: Vec<String> = self
            .exposed
            .iter()
            .filter(|name| {
                !aggregate.bytes_by_name.contains_key(*name)
                    && !aggregate.counts_by_name.contains_key(*name)
            })
            .cloned()
            .collect();
        for name in stale {
            debug!("Retracting metrics for vanished process group {}", name);
            sink.remove(&name);
            self.exposed.remove(&name);
        }
    }

    /// Names currently published in the sink.
    pub fn exposed(&self) -> &HashSet<String> {
        &self.exposed
    }
}
