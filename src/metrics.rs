//! Prometheus metrics definitions for procmem-exporter.
//!
//! This module defines the two exported gauge vectors, both labeled by the
//! canonical process name, and implements the sink interface the
//! reconciler writes through.

use prometheus::{GaugeVec, Opts, Registry};

use crate::reconciler::MetricSink;

/// The exporter's gauge vectors, registered once at startup.
#[derive(Clone)]
pub struct ProcessMetrics {
    /// node_os_process_memory{procname} — summed PSS bytes.
    pub process_memory: GaugeVec,
    /// node_os_num_processes{procname} — live process count.
    pub num_processes: GaugeVec,
}

impl ProcessMetrics {
    /// Creates and registers both gauge vectors with the registry.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let process_memory = GaugeVec::new(
            Opts::new(
                "process_memory",
                "Number of bytes allocated by process name (sum of all matching)",
            )
            .namespace("node")
            .subsystem("os"),
            &["procname"],
        )?;
        let num_processes = GaugeVec::new(
            Opts::new(
                "num_processes",
                "Number of processes of a certain kind existing",
            )
            .namespace("node")
            .subsystem("os"),
            &["procname"],
        )?;

        registry.register(Box::new(process_memory.clone()))?;
        registry.register(Box::new(num_processes.clone()))?;

        Ok(Self {
            process_memory,
            num_processes,
        })
    }
}

impl MetricSink for ProcessMetrics {
    fn set_memory_bytes(&self, name: &str, bytes: u64) {
        self.process_memory
            .with_label_values(&[name])
            .set(bytes as f64);
    }

    fn set_process_count(&self, name: &str, count: u64) {
        self.num_processes
            .with_label_values(&[name])
            .set(count as f64);
    }

    fn remove(&self, name: &str) {
        // A name may have been written to only one of the gauges; removing
        // an unknown label set is not an error worth surfacing.
        let _ = self.process_memory.remove_label_values(&[name]);
        let _ = self.num_processes.remove_label_values(&[name]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_names(registry: &Registry, metric: &str) -> Vec<String> {
        registry
            .gather()
            .iter()
            .filter(|f| f.get_name() == metric)
            .flat_map(|f| f.get_metric())
            .flat_map(|m| m.get_label())
            .filter(|l| l.get_name() == "procname")
            .map(|l| l.get_value().to_string())
            .collect()
    }

    #[test]
    fn test_set_then_remove_roundtrip() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry).unwrap();

        metrics.set_memory_bytes("foo", 153_600);
        metrics.set_process_count("foo", 3);

        assert_eq!(
            series_names(&registry, "node_os_process_memory"),
            vec!["foo"]
        );
        assert_eq!(series_names(&registry, "node_os_num_processes"), vec!["foo"]);

        metrics.remove("foo");

        assert!(series_names(&registry, "node_os_process_memory").is_empty());
        assert!(series_names(&registry, "node_os_num_processes").is_empty());
    }

    #[test]
    fn test_remove_of_unknown_name_is_harmless() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry).unwrap();
        metrics.remove("never-seen");
    }
}
