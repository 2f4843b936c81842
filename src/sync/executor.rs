//! Plan execution.
//!
//! Applies the structural half of a plan: removal of replica-only entries
//! followed by creation of source-only ones. Content comparison is handled
//! separately by the workers, which reuse the copy primitive from here.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;
use tracing::{error, info};

use crate::sync::error::SyncError;
use crate::sync::plan::{Action, SyncPlan};
use crate::sync::scan::EntryKind;

/// Counters for one plan application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Entries removed from the replica.
    pub deleted: usize,
    /// Entries mirrored into the replica.
    pub created: usize,
    /// Entries whose removal or creation failed.
    pub failed: usize,
}

/// Apply the structural actions of a plan.
///
/// Deletes run strictly before creates so a path that changed kind never
/// collides with a stale node of the old kind. Failures are logged and
/// counted; they never abort the pass.
pub fn apply_plan(plan: &SyncPlan, source_root: &Path, replica_root: &Path) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for (rel, entry) in &plan.replica {
        if entry.action != Action::Delete {
            continue;
        }
        let target = replica_root.join(rel);
        // A directory removed earlier in the pass takes its children with
        // it; those are already gone, not failures.
        if fs::symlink_metadata(&target).is_err() {
            continue;
        }
        match remove_entry(&target) {
            Ok(()) => stats.deleted += 1,
            Err(_) => stats.failed += 1,
        }
    }

    for (rel, entry) in &plan.source {
        if entry.action != Action::Create {
            continue;
        }
        let result = match entry.kind {
            EntryKind::Directory => create_dir(&replica_root.join(rel)),
            EntryKind::File => copy_file(&source_root.join(rel), &replica_root.join(rel)),
        };
        match result {
            Ok(()) => stats.created += 1,
            Err(_) => stats.failed += 1,
        }
    }

    stats
}

/// Remove one replica entry, logging the outcome.
///
/// Directories are removed recursively. Symlinks are removed as plain
/// nodes, never followed.
pub fn remove_entry(path: &Path) -> Result<(), SyncError> {
    let removal = fs::symlink_metadata(path).and_then(|meta| {
        if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    });
    match removal {
        Ok(()) => {
            info!("{} was successfully deleted", path.display());
            Ok(())
        }
        Err(source) => {
            let err = SyncError::Delete {
                path: path.to_path_buf(),
                source,
            };
            error!("{err}");
            Err(err)
        }
    }
}

/// Create one replica directory, logging the outcome.
pub fn create_dir(path: &Path) -> Result<(), SyncError> {
    match fs::create_dir_all(path) {
        Ok(()) => {
            info!("Folder {} was successfully created", path.display());
            Ok(())
        }
        Err(source) => {
            let err = SyncError::CreateDir {
                path: path.to_path_buf(),
                source,
            };
            error!("{err}");
            Err(err)
        }
    }
}

/// Copy one file into the replica, logging the outcome.
///
/// Parent directories are created as needed and the source's modification
/// and access times are carried over, so an unchanged file keeps a stable
/// timestamp across runs.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    match copy_with_times(from, to) {
        Ok(()) => {
            info!(
                "File {} was successfully copied to {}",
                from.display(),
                to.display()
            );
            Ok(())
        }
        Err(source) => {
            let err = SyncError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            };
            error!("{err}");
            Err(err)
        }
    }
}

fn copy_with_times(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)?;

    let meta = fs::metadata(from)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(to, atime, mtime)?;

    Ok(())
}
