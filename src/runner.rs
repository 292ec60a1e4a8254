//! Adapters over the host test runner: enumerate tests, and run a selected
//! subset with a deadline.

use std::thread::sleep;
use std::time::Duration;

use camino::Utf8Path;

use crate::log_file::LogFile;
use crate::process::{Process, ProcessStatus};
use crate::Result;

pub mod cargo_test;
pub mod nextest;

/// A host test runner: something that can list and invoke tests in a tree.
pub trait HostRunner: Send + Sync {
    /// List every test in `package` (or the whole workspace if `None`), as
    /// fully-qualified test ids.
    fn list_tests(&self, cwd: &Utf8Path, package: Option<&str>) -> Result<Vec<String>>;

    /// The argv that runs exactly `tests` (an empty slice means "run every test").
    fn test_argv(&self, package: Option<&str>, tests: &[String]) -> Vec<String>;
}

/// Run `tests` (or everything, if empty) with `env` set, and report what happened.
///
/// On failure, makes a best-effort attempt to identify which test actually
/// failed, by scanning the captured log for one of the requested test ids
/// alongside a conventional failure marker.
pub fn run_tests(
    runner: &dyn HostRunner,
    cwd: &Utf8Path,
    package: Option<&str>,
    tests: &[String],
    env: &[(&str, &str)],
    timeout: Duration,
    log_file: &mut LogFile,
) -> Result<(ProcessStatus, Option<String>)> {
    let argv = runner.test_argv(package, tests);
    let mut process = Process::start(&argv, env, cwd, timeout, log_file)?;
    loop {
        if let Some(status) = process.poll()? {
            let killing_test = match status {
                ProcessStatus::Failure => {
                    let log = log_file.get_log_content().unwrap_or_default();
                    find_failed_test(&log, tests)
                }
                ProcessStatus::Success | ProcessStatus::Timeout => None,
            };
            return Ok((status, killing_test));
        }
        sleep(Duration::from_millis(50));
    }
}

/// Scan test output for the name of the first test that looks like it failed.
fn find_failed_test(log: &str, tests: &[String]) -> Option<String> {
    for line in log.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("---- ") {
            if let Some(name) = rest.split(' ').next() {
                if tests.is_empty() || tests.iter().any(|t| t == name) {
                    return Some(name.to_owned());
                }
            }
        }
        if let Some(name) = line.strip_suffix(" ... FAILED") {
            if tests.is_empty() || tests.iter().any(|t| t == name) {
                return Some(name.to_owned());
            }
        }
    }
    if tests.len() == 1 {
        tests.first().cloned()
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_failed_test_from_libtest_style_summary_line() {
        let log = "running 2 tests\ntest a ... ok\ntest b ... FAILED\n\nfailures:\n\n---- b stdout ----\n";
        let found = find_failed_test(log, &["a".to_owned(), "b".to_owned()]);
        assert_eq!(found, Some("b".to_owned()));
    }

    #[test]
    fn single_selected_test_is_assumed_to_be_the_culprit_if_unparsed() {
        let found = find_failed_test("garbled output", &["only_test".to_owned()]);
        assert_eq!(found, Some("only_test".to_owned()));
    }
}
