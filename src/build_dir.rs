//! Copy the source tree into the output directory, and write instrumented
//! source files into the copy.

use std::fs;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::debug;

use crate::Result;

/// A copy of the source tree, with instrumented files substituted in, ready to build.
pub struct BuildDir {
    path: Utf8PathBuf,
}

impl BuildDir {
    /// Copy `tree_dir` into `dest_dir`, respecting `.gitignore`, and skipping `target/`.
    pub fn create(tree_dir: &Utf8Path, dest_dir: &Utf8Path) -> Result<BuildDir> {
        if dest_dir.exists() {
            fs::remove_dir_all(dest_dir)
                .with_context(|| format!("failed to clear stale build dir {dest_dir}"))?;
        }
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("failed to create build dir {dest_dir}"))?;
        let walker = WalkBuilder::new(tree_dir)
            .hidden(false)
            .filter_entry(|entry| entry.file_name() != "target")
            .build();
        for entry in walker {
            let entry = entry.context("failed to walk source tree")?;
            let from = Utf8Path::from_path(entry.path()).context("non-UTF-8 path in source tree")?;
            let relative = from.strip_prefix(tree_dir).expect("walked path is under tree_dir");
            if relative.as_str().is_empty() {
                continue;
            }
            let to = dest_dir.join(relative);
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                fs::create_dir_all(&to).with_context(|| format!("failed to create {to}"))?;
            } else {
                if let Some(parent) = to.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(from, &to).with_context(|| format!("failed to copy {from} to {to}"))?;
            }
        }
        debug!("copied {tree_dir} to {dest_dir}");
        Ok(BuildDir {
            path: dest_dir.to_owned(),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Overwrite a source file in the copy with instrumented text.
    pub fn write_source(&self, tree_relative_path: &Utf8Path, code: &str) -> Result<()> {
        let dest = self.path.join(tree_relative_path);
        fs::write(&dest, code).with_context(|| format!("failed to write instrumented source to {dest}"))
    }
}
