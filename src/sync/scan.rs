//! Directory tree scanning.
//!
//! Walks one root recursively and produces a snapshot of every entry below
//! it, keyed by path relative to that root.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tracing::error;

use crate::sync::error::SyncError;

/// How to treat entries that cannot be read during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Fail the scan on the first unreadable entry (default).
    ///
    /// An incomplete source snapshot would mark live replica paths for
    /// deletion, so the scan refuses to continue instead.
    #[default]
    Abort,
    /// Log the entry at ERROR and leave it out of the snapshot.
    Skip,
}

/// What kind of node an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, or any non-directory node such as a symlink.
    File,
    /// A directory.
    Directory,
}

/// One scanned entry: its kind plus the size recorded at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEntry {
    /// The kind of node.
    pub kind: EntryKind,
    /// Size in bytes; zero for directories.
    pub size: u64,
}

/// Snapshot of one tree: relative path to entry.
pub type TreeSnapshot = BTreeMap<PathBuf, ScanEntry>;

/// Scan a directory tree into a snapshot.
///
/// Hidden entries are included and symlinks are recorded without being
/// followed. The root itself is not part of the snapshot.
pub fn scan_tree(root: &Path, policy: ScanPolicy) -> Result<TreeSnapshot, SyncError> {
    let mut snapshot = TreeSnapshot::new();

    for entry_result in WalkDir::new(root)
        .parallelism(jwalk::Parallelism::RayonNewPool(0))
        .skip_hidden(false)
        .follow_links(false)
    {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => match policy {
                ScanPolicy::Abort => return Err(walk_error(root, e)),
                ScanPolicy::Skip => {
                    error!("{}", walk_error(root, e));
                    continue;
                }
            },
        };

        let path = entry.path();
        // The walk yields the root itself with an empty relative path;
        // everything else sits strictly below it.
        let rel = match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => continue,
        };

        let scanned = if entry.file_type().is_dir() {
            ScanEntry {
                kind: EntryKind::Directory,
                size: 0,
            }
        } else {
            // Stat without following so dangling symlinks still scan; their
            // reads fail later as ordinary per-file errors.
            let size = match fs::symlink_metadata(&path) {
                Ok(meta) => meta.len(),
                Err(source) => match policy {
                    ScanPolicy::Abort => return Err(SyncError::Scan { path, source }),
                    ScanPolicy::Skip => {
                        error!("{}", SyncError::Scan { path, source });
                        continue;
                    }
                },
            };
            ScanEntry {
                kind: EntryKind::File,
                size,
            }
        };

        snapshot.insert(rel, scanned);
    }

    Ok(snapshot)
}

/// Turn a walk error into a scan error, pinning it to the closest known path.
fn walk_error(fallback: &Path, err: jwalk::Error) -> SyncError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "unreadable directory entry"));
    SyncError::Scan { path, source }
}
