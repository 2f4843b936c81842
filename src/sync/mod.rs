//! One-way directory mirroring.
//!
//! This module implements the full pipeline: scan both trees, reconcile
//! them into a plan, apply structural changes, then hash-compare shared
//! files across balanced workers and re-copy real content changes.

pub mod distribute;
pub mod engine;
pub mod error;
pub mod executor;
pub mod hash;
pub mod plan;
pub mod scan;
pub mod worker;

pub use distribute::{default_worker_count, distribute, Batch};
pub use engine::{run_sync, RunReport, SyncOptions};
pub use error::SyncError;
pub use executor::{apply_plan, copy_file, create_dir, remove_entry, ApplyStats};
pub use hash::{digest_bytes, digest_file, digest_file_async, FileDigest};
pub use plan::{compare_files, reconcile, Action, CompareFile, PlannedEntry, SyncPlan};
pub use scan::{scan_tree, EntryKind, ScanEntry, ScanPolicy, TreeSnapshot};
pub use worker::{compare_batch, BatchReport};
