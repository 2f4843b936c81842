//! Comparison workload balancing.
//!
//! Splits the files queued for content comparison into batches, one per
//! worker, keeping total byte counts as even as the greedy bound allows.

use crate::sync::plan::CompareFile;

/// Cores left to the runtime and the rest of the system.
const RESERVED_CORES: usize = 2;

/// One worker's share of the comparison workload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Files assigned to this worker.
    pub files: Vec<CompareFile>,
    /// Sum of the assigned file sizes.
    pub total_bytes: u64,
}

/// Number of comparison workers to run when no override is given.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(RESERVED_CORES).max(1)
}

/// Partition files across `worker_count` batches by greedy size balancing.
///
/// Files are placed largest first, each into the batch with the smallest
/// running total (the first such batch on ties), which keeps the heaviest
/// batch within one largest-file of an even split. Batches may stay empty
/// when there are fewer files than workers.
pub fn distribute(mut files: Vec<CompareFile>, worker_count: usize) -> Vec<Batch> {
    let mut batches = vec![Batch::default(); worker_count.max(1)];

    files.sort_by(|a, b| b.size.cmp(&a.size));

    for file in files {
        if let Some(batch) = batches.iter_mut().min_by_key(|batch| batch.total_bytes) {
            batch.total_bytes += file.size;
            batch.files.push(file);
        }
    }

    batches
}
