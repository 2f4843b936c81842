//! Plan construction.
//!
//! Reconciles the source and replica snapshots into per-side action maps
//! and selects the files that need content comparison.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::sync::scan::{EntryKind, TreeSnapshot};

/// What to do with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Present only in the source: mirror it into the replica.
    Create,
    /// Present only in the replica: remove it.
    Delete,
    /// Present on both sides: compare contents.
    Compare,
}

/// A scanned entry together with its planned action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedEntry {
    /// The kind of node.
    pub kind: EntryKind,
    /// Size in bytes at scan time.
    pub size: u64,
    /// The action decided for this entry.
    pub action: Action,
}

/// The plan for one run: one action map per side.
///
/// Built once from the two snapshots and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Source entries, each `Create` or `Compare`.
    pub source: BTreeMap<PathBuf, PlannedEntry>,
    /// Replica entries, each `Delete` or `Compare`.
    pub replica: BTreeMap<PathBuf, PlannedEntry>,
}

/// A file queued for content comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareFile {
    /// Absolute path on the source side.
    pub path: PathBuf,
    /// Size at scan time, used for load balancing.
    pub size: u64,
}

/// Reconcile the two snapshots into a plan.
///
/// A relative path present on both sides is marked `Compare` in both maps,
/// regardless of kind. Source-only paths become `Create`, replica-only
/// paths become `Delete`.
pub fn reconcile(source: TreeSnapshot, replica: TreeSnapshot) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for (path, entry) in &source {
        let action = if replica.contains_key(path) {
            Action::Compare
        } else {
            Action::Create
        };
        plan.source.insert(
            path.clone(),
            PlannedEntry {
                kind: entry.kind,
                size: entry.size,
                action,
            },
        );
    }

    for (path, entry) in replica {
        let action = if source.contains_key(&path) {
            Action::Compare
        } else {
            Action::Delete
        };
        plan.replica.insert(
            path,
            PlannedEntry {
                kind: entry.kind,
                size: entry.size,
                action,
            },
        );
    }

    plan
}

/// Collect the files that need content comparison.
///
/// Only paths whose source-side entry is a file qualify; directories are
/// structural and never compared.
pub fn compare_files(plan: &SyncPlan, source_root: &Path) -> Vec<CompareFile> {
    plan.source
        .iter()
        .filter(|(_, entry)| entry.action == Action::Compare && entry.kind == EntryKind::File)
        .map(|(path, entry)| CompareFile {
            path: source_root.join(path),
            size: entry.size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::scan::ScanEntry;

    fn file(size: u64) -> ScanEntry {
        ScanEntry {
            kind: EntryKind::File,
            size,
        }
    }

    fn dir() -> ScanEntry {
        ScanEntry {
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    fn snapshot(entries: &[(&str, ScanEntry)]) -> TreeSnapshot {
        entries
            .iter()
            .map(|(path, entry)| (PathBuf::from(path), *entry))
            .collect()
    }

    #[test]
    fn test_reconcile_source_only_is_create() {
        let plan = reconcile(snapshot(&[("new.txt", file(3))]), TreeSnapshot::new());

        assert_eq!(plan.source[Path::new("new.txt")].action, Action::Create);
        assert!(plan.replica.is_empty());
    }

    #[test]
    fn test_reconcile_replica_only_is_delete() {
        let plan = reconcile(TreeSnapshot::new(), snapshot(&[("stale.txt", file(3))]));

        assert_eq!(plan.replica[Path::new("stale.txt")].action, Action::Delete);
        assert!(plan.source.is_empty());
    }

    #[test]
    fn test_reconcile_shared_path_is_compare_on_both_sides() {
        let plan = reconcile(
            snapshot(&[("a.txt", file(1)), ("only_src", dir())]),
            snapshot(&[("a.txt", file(2)), ("only_repl.txt", file(9))]),
        );

        assert_eq!(plan.source[Path::new("a.txt")].action, Action::Compare);
        assert_eq!(plan.replica[Path::new("a.txt")].action, Action::Compare);
        assert_eq!(plan.source[Path::new("only_src")].action, Action::Create);
        assert_eq!(
            plan.replica[Path::new("only_repl.txt")].action,
            Action::Delete
        );
    }

    #[test]
    fn test_reconcile_kind_mismatch_still_compares() {
        // Same relative path, file on one side and directory on the other
        let plan = reconcile(snapshot(&[("node", file(5))]), snapshot(&[("node", dir())]));

        assert_eq!(plan.source[Path::new("node")].action, Action::Compare);
        assert_eq!(plan.replica[Path::new("node")].action, Action::Compare);
    }

    #[test]
    fn test_compare_files_selects_source_side_files_only() {
        let plan = reconcile(
            snapshot(&[
                ("shared.txt", file(7)),
                ("shared_dir", dir()),
                ("fresh.txt", file(1)),
            ]),
            snapshot(&[("shared.txt", file(7)), ("shared_dir", dir())]),
        );

        let files = compare_files(&plan, Path::new("/src"));

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, Path::new("/src/shared.txt"));
        assert_eq!(files[0].size, 7);
    }

    #[test]
    fn test_compare_files_empty_plan() {
        let plan = SyncPlan::default();
        assert!(compare_files(&plan, Path::new("/src")).is_empty());
    }
}
