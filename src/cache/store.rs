//! On-disk storage for the result cache: a single JSON file, guarded by a
//! file lock so only one process writes at a time.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use tracing::warn;

use crate::result::GremlinResult;
use crate::Result;

/// The persisted result cache.
///
/// Corruption (a file that doesn't parse as JSON, for example after a crash
/// mid-write) is treated as an empty cache: the bad file is replaced rather
/// than causing the run to fail.
pub struct ResultCache {
    path: Utf8PathBuf,
    entries: HashMap<String, GremlinResult>,
    dirty: bool,
}

impl ResultCache {
    /// Open the cache file at `path`, creating an empty one if it doesn't exist.
    pub fn open(path: &Utf8Path) -> Result<ResultCache> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(%err, %path, "result cache is corrupt; starting a new one");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(%err, %path, "failed to read result cache; starting a new one");
                HashMap::new()
            }
        };
        Ok(ResultCache {
            path: path.to_owned(),
            entries,
            dirty: false,
        })
    }

    pub fn get(&self, key: &str) -> Option<&GremlinResult> {
        self.entries.get(key)
    }

    /// Record a result and immediately persist the whole cache, holding an
    /// exclusive lock for the duration of the write so that concurrent
    /// workers in other processes never interleave writes.
    pub fn put(&mut self, key: String, result: GremlinResult) -> Result<()> {
        self.entries.insert(key, result);
        self.save()
    }

    /// Record a result in memory without writing it to disk yet.
    ///
    /// Meant for a worker pool making many puts in quick succession: taking
    /// the file lock and rewriting the whole cache after every single one
    /// would serialize workers that are otherwise running in parallel. The
    /// result is visible to `get` right away; it's only durable once
    /// `flush` is called.
    pub fn put_deferred(&mut self, key: String, result: GremlinResult) {
        self.entries.insert(key, result);
        self.dirty = true;
    }

    /// Persist any results recorded through `put_deferred` since the last
    /// flush. A no-op if nothing is pending.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
            self.dirty = false;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let mut file = File::options()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let json = serde_json::to_string_pretty(&self.entries)?;
        file.set_len(0)?;
        file.write_all(json.as_bytes())?;
        FileExt::unlock(&file)?;
        Ok(())
    }
}
