//! Audio processing pipelines

pub mod batch;
pub mod plan;

pub use batch::{BatchTrimmer, TrimOutcome, discover_assets, ensure_output_folder, resolve_output_folder};
pub use plan::{TrimPlan, TrimWindow};

use crate::error::AudioError;
use std::path::PathBuf;

/// Counters of one batch run; every discovered file lands in exactly one bucket
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Files trimmed and written
    pub processed: usize,
    /// Files at or below the minimum duration
    pub skipped: usize,
    /// Files that could not be opened, trimmed or written
    pub failed: usize,
    /// Where outputs were written
    pub output_folder: PathBuf,
    /// Failed files with their errors, in processing order
    pub failures: Vec<(PathBuf, AudioError)>,
}

impl BatchResult {
    /// Number of files the batch looked at
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}
