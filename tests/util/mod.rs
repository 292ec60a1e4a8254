#![allow(dead_code)] // not every integration test file uses every helper

//! Reusable utilities for `gremlins` integration tests.

use std::env;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazy_static::lazy_static;
use tempfile::TempDir;

/// A generous timeout for one `cargo-gremlins` invocation from the test
/// suite: long enough for a slow CI VM, short enough not to hang forever.
pub const OUTER_TIMEOUT: Duration = Duration::from_secs(60);

lazy_static! {
    pub static ref MAIN_BINARY: PathBuf = assert_cmd::cargo::cargo_bin("cargo-gremlins");
}

/// Build a `Command` for the binary under test, with a hermetic environment:
/// any `GREMLINS_*` or color-forcing variable set on the test runner's own
/// environment must not leak into the child process.
pub fn run() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(MAIN_BINARY.as_os_str());
    cmd.timeout(OUTER_TIMEOUT);
    env::vars()
        .map(|(k, _v)| k)
        .filter(|k| k.starts_with("GREMLINS_") || k == "CLICOLOR_FORCE" || k == "NO_COLOR")
        .for_each(|k| {
            cmd.env_remove(k);
        });
    cmd
}

/// Copy one `testdata/` fixture tree into a fresh temp directory and return it.
pub fn copy_of_testdata(tree_name: &str) -> TempDir {
    assert!(
        !tree_name.contains('/'),
        "testdata tree name {tree_name:?} should be just the directory name"
    );
    let tmp = TempDir::with_prefix(format!("gremlins-testdata-{tree_name}-")).unwrap();
    copy_testdata_to(tree_name, tmp.path());
    tmp
}

/// Copy the contents of `testdata/<tree_name>` into `dest`.
pub fn copy_testdata_to(tree_name: &str, dest: &Path) {
    let src = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(tree_name);
    copy_tree(&src, dest);
}

fn copy_tree(src: &Path, dest: &Path) {
    create_dir_all(dest).unwrap();
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().unwrap();
        if file_type.is_dir() {
            copy_tree(&entry.path(), &dest_path);
        } else {
            std::fs::copy(entry.path(), &dest_path).unwrap();
        }
    }
}
