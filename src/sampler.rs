//! Per-pass aggregation of process memory and counts.
//!
//! One sampling pass consumes the current process list and folds it into
//! two mappings keyed by canonical name: summed PSS bytes and live process
//! counts. The mappings are transient; the reconciler diffs them against
//! the previously exposed label set.

use ahash::AHashMap as HashMap;
use tracing::debug;

use crate::process::{canonical_name, MemoryReader, ProcessObservation};

/// Result of one sampling pass.
///
/// A name keys `bytes_by_name` only when at least one process contributed a
/// successfully read memory value under it; it keys `counts_by_name` when
/// at least one process mapped to it, read success or not.
#[derive(Debug, Default)]
pub struct PassAggregate {
    pub bytes_by_name: HashMap<String, u64>,
    pub counts_by_name: HashMap<String, u64>,
}

/// Runs one aggregation pass over a process snapshot.
///
/// Every observation increments its canonical name's count. A failed memory
/// read is logged with the offending process's identity and skipped; it
/// never aborts the pass or affects other processes. Summation is
/// commutative, so observation order does not matter.
pub fn run_pass<R: MemoryReader>(
    observations: &[ProcessObservation],
    reader: &R,
) -> PassAggregate {
    let mut aggregate = PassAggregate::default();

    for obs in observations {
        let name = canonical_name(&obs.executable);
        *aggregate.counts_by_name.entry(name.clone()).or_insert(0) += 1;

        match reader.read_pss_bytes(obs.pid) {
            Ok(bytes) => {
                *aggregate.bytes_by_name.entry(name).or_insert(0) += bytes;
            }
            Err(e) => {
                debug!(
                    "No memory data for process {} ({}): {}",
                    obs.pid, obs.executable, e
                );
            }
        }
    }

    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SmapsError;
    use std::io;

    /// Reader serving canned results per pid; unknown pids fail like a
    /// vanished process would.
    struct FakeReader {
        by_pid: HashMap<u32, u64>,
    }

    impl FakeReader {
        fn new(entries: &[(u32, u64)]) -> Self {
            Self {
                by_pid: entries.iter().copied().collect(),
            }
        }
    }

    impl MemoryReader for FakeReader {
        fn read_pss_bytes(&self, pid: u32) -> Result<u64, SmapsError> {
            self.by_pid.get(&pid).copied().ok_or_else(|| {
                SmapsError::Io(io::Error::from(io::ErrorKind::NotFound))
            })
        }
    }

    fn obs(pid: u32, executable: &str) -> ProcessObservation {
        ProcessObservation {
            pid,
            executable: executable.to_string(),
        }
    }

    #[test]
    fn test_same_name_processes_aggregate_additively() {
        let reader = FakeReader::new(&[(1, 100), (2, 50)]);
        let procs = vec![obs(1, "/usr/bin/foo"), obs(2, "/usr/local/sbin/foo")];

        let agg = run_pass(&procs, &reader);

        assert_eq!(agg.bytes_by_name["foo"], 150);
        assert_eq!(agg.counts_by_name["foo"], 2);
        assert_eq!(agg.bytes_by_name.len(), 1);
    }

    #[test]
    fn test_failed_read_still_counts_the_process() {
        let reader = FakeReader::new(&[(1, 4096)]);
        let procs = vec![obs(1, "/usr/bin/alive"), obs(2, "/usr/bin/gone")];

        let agg = run_pass(&procs, &reader);

        assert_eq!(agg.counts_by_name["alive"], 1);
        assert_eq!(agg.counts_by_name["gone"], 1);
        assert_eq!(agg.bytes_by_name["alive"], 4096);
        assert!(!agg.bytes_by_name.contains_key("gone"));
    }

    #[test]
    fn test_failed_read_of_grouped_process_keeps_partial_sum() {
        // One of two "foo" processes vanished mid-pass; the other still
        // contributes bytes and both contribute to the count.
        let reader = FakeReader::new(&[(1, 100)]);
        let procs = vec![obs(1, "/usr/bin/foo"), obs(2, "/usr/bin/foo")];

        let agg = run_pass(&procs, &reader);

        assert_eq!(agg.bytes_by_name["foo"], 100);
        assert_eq!(agg.counts_by_name["foo"], 2);
    }

    #[test]
    fn test_zero_byte_read_still_keys_bytes_map() {
        let reader = FakeReader::new(&[(7, 0)]);
        let agg = run_pass(&[obs(7, "tiny")], &reader);

        assert_eq!(agg.bytes_by_name["tiny"], 0);
        assert_eq!(agg.counts_by_name["tiny"], 1);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let reader = FakeReader::new(&[(1, 10), (2, 20), (3, 30)]);
        let mut procs = vec![
            obs(1, "/usr/bin/a"),
            obs(2, "/usr/bin/b"),
            obs(3, "/usr/bin/a"),
        ];

        let forward = run_pass(&procs, &reader);
        procs.reverse();
        let backward = run_pass(&procs, &reader);

        assert_eq!(forward.bytes_by_name, backward.bytes_by_name);
        assert_eq!(forward.counts_by_name, backward.counts_by_name);
        assert_eq!(forward.bytes_by_name["a"], 40);
    }

    #[test]
    fn test_empty_snapshot_yields_empty_aggregate() {
        let reader = FakeReader::new(&[]);
        let agg = run_pass(&[], &reader);
        assert!(agg.bytes_by_name.is_empty());
        assert!(agg.counts_by_name.is_empty());
    }
}
