//! Run tests with plain `cargo test`.

use camino::Utf8Path;

use crate::process::get_command_output;
use crate::runner::HostRunner;
use crate::Result;

pub struct CargoTestRunner;

impl HostRunner for CargoTestRunner {
    fn list_tests(&self, cwd: &Utf8Path, package: Option<&str>) -> Result<Vec<String>> {
        let mut argv = vec!["cargo", "test"];
        if let Some(package) = package {
            argv.push("--package");
            argv.push(package);
        }
        argv.extend(["--", "--list"]);
        let output = get_command_output(&argv, cwd)?;
        Ok(parse_list_output(&output))
    }

    fn test_argv(&self, package: Option<&str>, tests: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = vec!["cargo".into(), "test".into()];
        if let Some(package) = package {
            argv.push("--package".into());
            argv.push(package.into());
        }
        if !tests.is_empty() {
            argv.push("--".into());
            for test in tests {
                argv.push("--exact".into());
                argv.push(test.clone());
            }
        }
        argv
    }
}

/// Parse the output of `cargo test -- --list`, which prints one line per
/// test like `module::tests::name: test`, followed by a blank-line-separated
/// summary that we ignore.
fn parse_list_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_suffix(": test"))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_libtest_list_format() {
        let output = "module::tests::a: test\nmodule::tests::b: test\n\n2 tests, 0 benchmarks\n";
        assert_eq!(
            parse_list_output(output),
            vec!["module::tests::a".to_owned(), "module::tests::b".to_owned()]
        );
    }

    #[test]
    fn test_argv_selects_exact_tests() {
        let argv = CargoTestRunner.test_argv(Some("demo"), &["t::a".to_owned()]);
        assert_eq!(
            argv,
            vec!["cargo", "test", "--package", "demo", "--", "--exact", "t::a"]
        );
    }

    #[test]
    fn test_argv_with_no_tests_runs_everything() {
        let argv = CargoTestRunner.test_argv(None, &[]);
        assert_eq!(argv, vec!["cargo", "test"]);
    }
}
