//! Fixed-interval driver for sampling passes.
//!
//! One background task runs passes strictly sequentially: enumerate the
//! process table, aggregate memory and counts per canonical name, then
//! reconcile against the previously exposed label set. A pass that runs
//! long delays the next tick rather than overlapping it.

use std::time::{Duration, Instant};

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::process::{MemoryReader, ProcessLister, ProcfsLister, ProcfsMemoryReader};
use crate::reconciler::ExposureReconciler;
use crate::sampler::run_pass;
use crate::state::SharedState;

/// Time between sampling passes.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs one complete sampling pass and reconciles the result into the
/// exported gauges.
///
/// An enumeration failure abandons the pass entirely: nothing is
/// aggregated, the reconciler state and exposed series stay untouched, and
/// the next scheduled tick is the retry. Per-process failures are handled
/// inside the aggregation pass.
pub fn run_scheduled_pass<L, R>(
    state: &SharedState,
    lister: &L,
    reader: &R,
    reconciler: &mut ExposureReconciler,
) where
    L: ProcessLister,
    R: MemoryReader,
{
    let start = Instant::now();

    let observations = match lister.list() {
        Ok(observations) => observations,
        Err(e) => {
            error!("Error fetching process list: {}", e);
            state.pass_success.set(0.0);
            return;
        }
    };

    let aggregate = run_pass(&observations, reader);
    reconciler.reconcile(&aggregate, &state.metrics);

    state.pass_duration.set(start.elapsed().as_secs_f64());
    state.pass_success.set(1.0);

    debug!(
        "Sampling pass completed: {} processes, {} groups exposed, {:.2}ms",
        observations.len(),
        reconciler.exposed().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
}

/// Background sampling loop, spawned once at startup.
///
/// The first tick of a tokio interval completes immediately, which gives
/// the initial pass at startup; afterwards passes run once per interval
/// for the lifetime of the process.
pub async fn run_sampler(state: SharedState) {
    let proc_root = state.config.effective_proc_root();
    let lister = ProcfsLister::new(&proc_root);
    let reader = ProcfsMemoryReader::new(&proc_root);
    let mut reconciler = ExposureReconciler::new();

    info!(
        "Sampling {} every {}s",
        proc_root.display(),
        SAMPLE_INTERVAL.as_secs()
    );

    let mut ticker = time::interval(SAMPLE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        run_scheduled_pass(&state, &lister, &reader, &mut reconciler);
    }
}
