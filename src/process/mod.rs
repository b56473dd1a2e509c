//! Process-related modules for discovery, naming, and memory accounting.
//!
//! This module provides:
//! - `canonical`: canonical program name derivation
//! - `memory`: PSS parsing from /proc/<pid>/smaps
//! - `scanner`: process discovery from /proc

pub mod canonical;
pub mod memory;
pub mod scanner;

// Re-export commonly used types
pub use canonical::canonical_name;
pub use memory::{read_pss_bytes, MemoryReader, ProcfsMemoryReader, SmapsError};
pub use scanner::{ProcessLister, ProcessObservation, ProcfsLister};
