//! Proportional set size accounting from /proc/<pid>/smaps.
//!
//! This module sums the `Pss:` lines of a process's memory-map accounting
//! file. PSS attributes shared pages fairly across every process mapping
//! them, so summing it per group gives a non-overlapping byte total.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure modes of a single smaps read.
///
/// Both variants mean "no memory data available for this process" to the
/// caller; neither is fatal to a sampling pass.
#[derive(Debug, Error)]
pub enum SmapsError {
    /// The accounting file could not be opened or read, typically because
    /// the process exited between listing and read, or permission was denied.
    #[error("failed to read smaps: {0}")]
    Io(#[from] io::Error),

    /// A `Pss:` line carried a payload that did not parse as an integer.
    #[error("invalid Pss value {value:?}")]
    InvalidValue { value: String },
}

/// Reads one process's smaps-style accounting file and returns the summed
/// proportional set size in bytes.
///
/// Every line with the exact prefix `Pss:` contributes; the kernel reports
/// the value in kB, so it is multiplied by 1024 before summing. A file with
/// no matching lines legitimately yields zero. An unparseable `Pss:` payload
/// fails the whole read; partial sums are discarded.
pub fn read_pss_bytes(path: &Path) -> Result<u64, SmapsError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut total = 0u64;
    for line in reader.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix("Pss:") {
            let kb: u64 = rest
                .split_whitespace()
                .next()
                .unwrap_or("")
                .parse()
                .map_err(|_| SmapsError::InvalidValue {
                    value: rest.trim().to_string(),
                })?;
            total += kb * 1024;
        }
    }

    Ok(total)
}

/// Seam for reading a process's proportional memory by pid, so sampling
/// passes can run against fabricated accounting data in tests.
pub trait MemoryReader {
    fn read_pss_bytes(&self, pid: u32) -> Result<u64, SmapsError>;
}

/// Production reader backed by `<root>/<pid>/smaps`.
pub struct ProcfsMemoryReader {
    root: PathBuf,
}

impl ProcfsMemoryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MemoryReader for ProcfsMemoryReader {
    fn read_pss_bytes(&self, pid: u32) -> Result<u64, SmapsError> {
        read_pss_bytes(&self.root.join(pid.to_string()).join("smaps"))
    }
}
