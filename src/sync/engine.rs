//! Run orchestration.
//!
//! Drives one mirror pass end to end: scan both trees, reconcile them into
//! a plan, apply the structural changes, then fan the content comparisons
//! out across workers and wait for all of them.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use tracing::{error, info};

use crate::sync::distribute::{default_worker_count, distribute};
use crate::sync::executor::apply_plan;
use crate::sync::plan::{compare_files, reconcile};
use crate::sync::scan::{scan_tree, ScanPolicy, TreeSnapshot};
use crate::sync::worker::{compare_batch, BatchReport};

/// Tunables for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Comparison worker count; defaults to the core count minus a small
    /// reserve.
    pub workers: Option<usize>,
    /// Treatment of unreadable entries during scans.
    pub scan_policy: ScanPolicy,
}

/// Counters for one completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    /// Entries found under the source root.
    pub source_entries: usize,
    /// Entries found under the replica root.
    pub replica_entries: usize,
    /// Entries removed from the replica.
    pub deleted: usize,
    /// Entries mirrored into the replica.
    pub created: usize,
    /// Structural actions that failed.
    pub structural_failures: usize,
    /// File pairs whose digests were compared.
    pub compared: usize,
    /// Files re-copied because their contents differed.
    pub copied: usize,
    /// File pairs abandoned after a read, hash, or copy failure.
    pub compare_failures: usize,
    /// Bytes read for hashing across all workers.
    pub bytes_hashed: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Run one mirror pass from `source_root` into `replica_root`.
///
/// Safe to invoke repeatedly; no state survives between runs.
pub async fn run_sync(
    source_root: &Path,
    replica_root: &Path,
    options: SyncOptions,
) -> Result<RunReport> {
    ensure!(
        source_root.is_dir(),
        "{} is not a valid directory path",
        source_root.display()
    );
    ensure!(
        replica_root.is_dir(),
        "{} is not a valid directory path",
        replica_root.display()
    );

    let started = Instant::now();
    info!(
        "Synchronization of {} into {} started",
        source_root.display(),
        replica_root.display()
    );

    let source_snapshot = scan_snapshot(source_root, options.scan_policy).await?;
    let replica_snapshot = scan_snapshot(replica_root, options.scan_policy).await?;
    let source_entries = source_snapshot.len();
    let replica_entries = replica_snapshot.len();

    let plan = reconcile(source_snapshot, replica_snapshot);
    let files = compare_files(&plan, source_root);

    let apply = {
        let source = source_root.to_path_buf();
        let replica = replica_root.to_path_buf();
        tokio::task::spawn_blocking(move || apply_plan(&plan, &source, &replica))
            .await
            .context("Plan application task failed")?
    };

    let worker_count = options.workers.unwrap_or_else(default_worker_count);
    let mut handles = Vec::new();
    for batch in distribute(files, worker_count) {
        if batch.files.is_empty() {
            continue;
        }
        let source = source_root.to_path_buf();
        let replica = replica_root.to_path_buf();
        handles.push(tokio::spawn(compare_batch(batch, source, replica)));
    }

    let mut compared = BatchReport::default();
    for handle in handles {
        match handle.await {
            Ok(report) => compared.merge(report),
            Err(e) => error!("Comparison worker failed: {e}"),
        }
    }

    let report = RunReport {
        source_entries,
        replica_entries,
        deleted: apply.deleted,
        created: apply.created,
        structural_failures: apply.failed,
        compared: compared.examined,
        copied: compared.copied,
        compare_failures: compared.failed,
        bytes_hashed: compared.bytes_hashed,
        elapsed: started.elapsed(),
    };
    info!(
        "Synchronization ended in {:.2}s: {} deleted, {} created, {} compared, {} copied, {} hashed, {} failed",
        report.elapsed.as_secs_f64(),
        report.deleted,
        report.created,
        report.compared,
        report.copied,
        humansize::format_size(report.bytes_hashed, humansize::BINARY),
        report.structural_failures + report.compare_failures,
    );

    Ok(report)
}

/// Scan one tree on the blocking pool.
async fn scan_snapshot(root: &Path, policy: ScanPolicy) -> Result<TreeSnapshot> {
    let root = root.to_path_buf();
    let snapshot = tokio::task::spawn_blocking(move || scan_tree(&root, policy))
        .await
        .context("Scan task failed")??;
    Ok(snapshot)
}
