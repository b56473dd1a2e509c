//! Tests for the scheduled pass driver.
//!
//! The pass body is a plain function, so ticks can be injected
//! synchronously without a running timer.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use prometheus::{Gauge, Registry};
use tempfile::TempDir;

use procmem_exporter::config::Config;
use procmem_exporter::process::{
    ProcessLister, ProcessObservation, ProcfsLister, ProcfsMemoryReader,
};
use procmem_exporter::reconciler::ExposureReconciler;
use procmem_exporter::scheduler::run_scheduled_pass;
use procmem_exporter::state::{AppState, SharedState};
use procmem_exporter::ProcessMetrics;

/// Lister standing in for an unavailable process table.
struct FailingLister;

impl ProcessLister for FailingLister {
    fn list(&self) -> io::Result<Vec<ProcessObservation>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
}

fn test_state() -> SharedState {
    let registry = Registry::new();
    let metrics = ProcessMetrics::new(&registry).unwrap();
    let scrape_duration = Gauge::new("test_scrape_duration_seconds", "test").unwrap();
    let pass_duration = Gauge::new("test_pass_duration_seconds", "test").unwrap();
    let pass_success = Gauge::new("test_pass_success", "test").unwrap();

    Arc::new(AppState {
        registry,
        metrics,
        scrape_duration,
        pass_duration,
        pass_success,
        config: Arc::new(Config::default()),
        start_time: Instant::now(),
    })
}

fn series_count(state: &SharedState, metric: &str) -> usize {
    state
        .registry
        .gather()
        .iter()
        .filter(|f| f.get_name() == metric)
        .map(|f| f.get_metric().len())
        .sum()
}

#[test]
fn test_successful_pass_publishes_and_marks_success() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("1");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("cmdline"), b"/usr/bin/foo\0").unwrap();
    std::fs::write(dir.join("comm"), "foo\n").unwrap();
    std::fs::write(dir.join("smaps"), "Pss: 12 kB\n").unwrap();

    let state = test_state();
    let lister = ProcfsLister::new(root.path());
    let reader = ProcfsMemoryReader::new(root.path());
    let mut reconciler = ExposureReconciler::new();

    run_scheduled_pass(&state, &lister, &reader, &mut reconciler);

    assert_eq!(state.pass_success.get(), 1.0);
    assert_eq!(series_count(&state, "node_os_process_memory"), 1);
    assert_eq!(series_count(&state, "node_os_num_processes"), 1);
}

#[test]
fn test_enumeration_failure_abandons_pass_and_keeps_exposed_state() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("1");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("cmdline"), b"/usr/bin/foo\0").unwrap();
    std::fs::write(dir.join("comm"), "foo\n").unwrap();
    std::fs::write(dir.join("smaps"), "Pss: 12 kB\n").unwrap();

    let state = test_state();
    let lister = ProcfsLister::new(root.path());
    let reader = ProcfsMemoryReader::new(root.path());
    let mut reconciler = ExposureReconciler::new();

    // Tick N succeeds and exposes foo.
    run_scheduled_pass(&state, &lister, &reader, &mut reconciler);
    let exposed_before = reconciler.exposed().clone();

    // Tick N+1 cannot enumerate: nothing is retracted or recomputed.
    run_scheduled_pass(&state, &FailingLister, &reader, &mut reconciler);

    assert_eq!(state.pass_success.get(), 0.0);
    assert_eq!(*reconciler.exposed(), exposed_before);
    assert_eq!(series_count(&state, "node_os_process_memory"), 1);
    assert_eq!(series_count(&state, "node_os_num_processes"), 1);
}
