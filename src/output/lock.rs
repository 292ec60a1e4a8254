//! A `lock.json` file indicating that the output directory is in use.

use std::fs::File;
use std::io::Write;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use camino::Utf8Path;
use fs2::FileExt;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::interrupt::check_interrupted;
use crate::Result;

use super::LOCK_FILENAME;

const LOCK_POLL: Duration = Duration::from_millis(100);

/// The contents of `lock.json`, written into the output directory and used as
/// a lock file so that two invocations don't try to write to the same
/// output directory simultaneously.
#[derive(Serialize)]
pub struct LockFile {
    gremlins_version: String,
    start_time: String,
    hostname: String,
    username: String,
}

impl LockFile {
    pub(super) fn new() -> LockFile {
        let start_time = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .expect("format current time");
        LockFile {
            gremlins_version: crate::VERSION.to_string(),
            start_time,
            hostname: whoami::fallible::hostname().unwrap_or_default(),
            username: whoami::username(),
        }
    }

    /// Block until acquiring a file lock on `lock.json` in the given output directory.
    ///
    /// Returns the `File` whose lifetime controls the file lock.
    pub fn acquire_lock(output_dir: &Utf8Path) -> Result<File> {
        let lock_path = output_dir.join(LOCK_FILENAME);
        let mut lock_file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context("open or create lock.json in existing directory")?;
        let mut first = true;
        while let Err(err) = lock_file.try_lock_exclusive() {
            if first {
                info!("Waiting for lock on {lock_path} ...: {err}");
                first = false;
            }
            check_interrupted()?;
            sleep(LOCK_POLL);
        }
        lock_file.set_len(0)?;
        lock_file
            .write_all(serde_json::to_string_pretty(&LockFile::new())?.as_bytes())
            .context("write lock.json")?;
        Ok(lock_file)
    }
}
