//! Content comparison workers.
//!
//! Each worker owns one batch of files and hashes both sides of every pair
//! concurrently, re-copying the files whose digests differ.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::error;

use crate::sync::distribute::Batch;
use crate::sync::error::SyncError;
use crate::sync::executor::copy_file;
use crate::sync::hash::digest_file_async;
use crate::sync::plan::CompareFile;

/// Counters reported by one worker after its batch completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files whose digests were compared.
    pub examined: usize,
    /// Files re-copied because their contents differed.
    pub copied: usize,
    /// Files skipped after a read, hash, or copy failure.
    pub failed: usize,
    /// Bytes read for hashing, both sides combined.
    pub bytes_hashed: u64,
}

impl BatchReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.examined += other.examined;
        self.copied += other.copied;
        self.failed += other.failed;
        self.bytes_hashed += other.bytes_hashed;
    }
}

/// Outcome of one file pair.
enum FileOutcome {
    /// Digests matched; nothing to do.
    Unchanged { bytes_hashed: u64 },
    /// Digests differed and the copy succeeded.
    Copied { bytes_hashed: u64 },
    /// The pair could not be compared or re-copied.
    Failed,
}

/// Compare every file in the batch, copying changed ones.
///
/// All files are processed concurrently and a failure on one never stops
/// the others. The returned report aggregates the per-file outcomes.
pub async fn compare_batch(batch: Batch, source_root: PathBuf, replica_root: PathBuf) -> BatchReport {
    let outcomes = join_all(
        batch
            .files
            .iter()
            .map(|file| compare_file(file, &source_root, &replica_root)),
    )
    .await;

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Unchanged { bytes_hashed } => {
                report.examined += 1;
                report.bytes_hashed += bytes_hashed;
            }
            FileOutcome::Copied { bytes_hashed } => {
                report.examined += 1;
                report.copied += 1;
                report.bytes_hashed += bytes_hashed;
            }
            FileOutcome::Failed => report.failed += 1,
        }
    }
    report
}

/// Hash both sides of one pair and copy the source over on mismatch.
///
/// Failures are logged here and surface only in the outcome counters.
async fn compare_file(file: &CompareFile, source_root: &Path, replica_root: &Path) -> FileOutcome {
    let rel = match file.path.strip_prefix(source_root) {
        Ok(rel) => rel,
        Err(_) => {
            error!(
                "{}",
                SyncError::OutsideRoot {
                    path: file.path.clone(),
                    root: source_root.to_path_buf(),
                }
            );
            return FileOutcome::Failed;
        }
    };
    let replica_path = replica_root.join(rel);

    let source_digest = match digest_file_async(&file.path).await {
        Ok(digest) => digest,
        Err(source) => {
            error!(
                "{}",
                SyncError::Hash {
                    path: file.path.clone(),
                    source,
                }
            );
            return FileOutcome::Failed;
        }
    };
    let replica_digest = match digest_file_async(&replica_path).await {
        Ok(digest) => digest,
        Err(source) => {
            error!(
                "{}",
                SyncError::Hash {
                    path: replica_path,
                    source,
                }
            );
            return FileOutcome::Failed;
        }
    };

    let bytes_hashed = source_digest.size + replica_digest.size;
    if source_digest.hash == replica_digest.hash {
        return FileOutcome::Unchanged { bytes_hashed };
    }

    // copy_file logs its own outcome
    match copy_file(&file.path, &replica_path) {
        Ok(()) => FileOutcome::Copied { bytes_hashed },
        Err(_) => FileOutcome::Failed,
    }
}
