//! Process discovery from the /proc filesystem.
//!
//! This module enumerates live processes and yields, per process, its pid
//! and the raw executable identifier later reduced by the canonicalizer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One live process as seen by a single sampling pass.
#[derive(Debug, Clone)]
pub struct ProcessObservation {
    pub pid: u32,
    /// Raw command path or kernel-thread identifier, not yet canonicalized.
    pub executable: String,
}

/// Seam for process enumeration, so sampling passes can run against
/// fabricated process lists in tests.
///
/// An `Err` means the listing as a whole is unavailable and the current
/// pass must be abandoned; individual unreadable processes are skipped
/// inside `list` instead.
pub trait ProcessLister {
    fn list(&self) -> io::Result<Vec<ProcessObservation>>;
}

/// Production lister scanning numeric directories under a proc root.
pub struct ProcfsLister {
    root: PathBuf,
}

impl ProcfsLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProcessLister for ProcfsLister {
    fn list(&self) -> io::Result<Vec<ProcessObservation>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let p = entry.path();
            let name = match p.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            // A process may exit between read_dir and here; skip it.
            let executable = match read_executable(&p) {
                Some(v) => v,
                None => continue,
            };
            out.push(ProcessObservation { pid, executable });
        }
        Ok(out)
    }
}

/// Reads the raw executable identifier for one process.
///
/// Prefers argv[0] from `cmdline`, which is usually a full path and lets
/// the canonicalizer strip generic directories. Kernel threads have an
/// empty cmdline, so `comm` is the fallback.
fn read_executable(proc_path: &Path) -> Option<String> {
    let cmd = proc_path.join("cmdline");
    if let Ok(content) = fs::read(&cmd) {
        if let Some(first) = content.split(|&b| b == 0u8).next() {
            if !first.is_empty() {
                if let Ok(s) = std::str::from_utf8(first) {
                    return Some(s.to_string());
                }
            }
        }
    }

    let comm = proc_path.join("comm");
    if let Ok(s) = fs::read_to_string(&comm) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.to_string());
        }
    }
    None
}
