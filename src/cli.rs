//! Command line interface.
//!
//! Invalid paths are the only fatal input: both roots are validated here,
//! before any filesystem mutation can happen.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::sync::{ScanPolicy, SyncOptions};

#[derive(Debug, Parser)]
#[command(name = "specular")]
#[command(about = "One-way directory mirroring with hashed content comparison", version)]
pub struct Args {
    /// Source directory to mirror from
    #[arg(short, long, value_parser = dir_path)]
    pub source: PathBuf,

    /// Replica directory to mirror into
    #[arg(short, long, value_parser = dir_path)]
    pub replica: PathBuf,

    /// Log file path; logs go to stdout only when omitted
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Run interval in minutes; a single run when omitted
    #[arg(short, long)]
    pub interval: Option<f64>,

    /// Number of comparison workers; defaults to the core count minus two
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log unreadable entries and continue instead of failing the scan
    #[arg(long)]
    pub skip_unreadable: bool,
}

impl Args {
    /// Cross-flag checks that clap cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        let source = self
            .source
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", self.source.display()))?;
        let replica = self
            .replica
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", self.replica.display()))?;

        if source == replica {
            bail!("Source and replica must be different directories");
        }
        // Mirroring into one's own subtree would delete or duplicate
        // entries it is still reading.
        if source.starts_with(&replica) || replica.starts_with(&source) {
            bail!("Source and replica must not be nested within each other");
        }

        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval <= 0.0 {
                bail!("Interval must be a positive number of minutes");
            }
        }

        Ok(())
    }

    /// Engine options derived from the flags.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            workers: self.workers,
            scan_policy: if self.skip_unreadable {
                ScanPolicy::Skip
            } else {
                ScanPolicy::Abort
            },
        }
    }
}

/// Value parser accepting only paths to existing directories.
fn dir_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("{value} is not a valid directory path"))
    }
}
