//! Manage the on-disk state of one run: `target/gremlins/`.
//!
//! ```text
//! target/gremlins/
//!   lock.json       single-writer lock, held for the life of the run
//!   results.db      the incremental result cache (see crate::cache)
//!   coverage.map    the coverage map from the last baseline run
//!   instrumented/   a copy of the tree with every gremlin wired in
//!   logs/           one log file per scenario
//! ```

pub mod lock;

use std::fs;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

use crate::log_file::LogFile;
use crate::Result;

pub const LOCK_FILENAME: &str = "lock.json";
const RESULTS_FILENAME: &str = "results.db";
const COVERAGE_FILENAME: &str = "coverage.map";
const INSTRUMENTED_DIRNAME: &str = "instrumented";
const LOGS_DIRNAME: &str = "logs";

/// The output directory for one run, with a lock held for as long as this
/// value is alive.
pub struct OutputDir {
    path: Utf8PathBuf,
    _lock_file: fs::File,
}

impl OutputDir {
    /// Create (if needed) and lock the output directory.
    pub fn create_or_open(path: &Utf8Path) -> Result<OutputDir> {
        fs::create_dir_all(path).with_context(|| format!("failed to create output dir {path}"))?;
        fs::create_dir_all(path.join(LOGS_DIRNAME))?;
        let lock_file = lock::LockFile::acquire_lock(path)?;
        Ok(OutputDir {
            path: path.to_owned(),
            _lock_file: lock_file,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn results_path(&self) -> Utf8PathBuf {
        self.path.join(RESULTS_FILENAME)
    }

    pub fn coverage_path(&self) -> Utf8PathBuf {
        self.path.join(COVERAGE_FILENAME)
    }

    pub fn instrumented_dir(&self) -> Utf8PathBuf {
        self.path.join(INSTRUMENTED_DIRNAME)
    }

    pub fn logs_dir(&self) -> Utf8PathBuf {
        self.path.join(LOGS_DIRNAME)
    }

    /// Create a fresh log file for one scenario.
    pub fn create_log(&self, name_base: &str) -> Result<LogFile> {
        LogFile::create_in(&self.logs_dir(), name_base)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_or_open_makes_expected_layout() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap().join("gremlins");
        let output_dir = OutputDir::create_or_open(&path).unwrap();
        assert!(output_dir.path().join(LOCK_FILENAME).is_file());
        assert!(output_dir.logs_dir().is_dir());
    }
}
