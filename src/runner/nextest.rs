//! Run tests with `cargo nextest`, an alternative test runner with a faster
//! process-per-test model.

use camino::Utf8Path;
use nextest_metadata::TestListSummary;

use crate::process::get_command_output;
use crate::runner::HostRunner;
use crate::Result;

pub struct NextestRunner;

impl HostRunner for NextestRunner {
    fn list_tests(&self, cwd: &Utf8Path, package: Option<&str>) -> Result<Vec<String>> {
        let mut argv = vec!["cargo", "nextest", "list", "--message-format", "json"];
        if let Some(package) = package {
            argv.push("--package");
            argv.push(package);
        }
        let output = get_command_output(&argv, cwd)?;
        parse_list_json(&output)
    }

    fn test_argv(&self, package: Option<&str>, tests: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = vec!["cargo".into(), "nextest".into(), "run".into()];
        if let Some(package) = package {
            argv.push("--package".into());
            argv.push(package.into());
        }
        if !tests.is_empty() {
            argv.push("-E".into());
            argv.push(exact_test_filterset(tests));
        }
        argv
    }
}

/// Parse `cargo nextest list --message-format json` output into a flat list
/// of non-ignored, fully-qualified test names.
fn parse_list_json(output: &str) -> Result<Vec<String>> {
    let summary = TestListSummary::parse_json(output)?;
    let mut tests = Vec::new();
    for suite in summary.rust_suites.values() {
        for (name, case) in &suite.test_cases {
            if !case.ignored {
                tests.push(name.clone());
            }
        }
    }
    Ok(tests)
}

/// Build a nextest filterset expression selecting exactly the given test
/// names, e.g. `test(=a) + test(=b)`.
fn exact_test_filterset(tests: &[String]) -> String {
    tests
        .iter()
        .map(|name| format!("test(={name})"))
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filterset_combines_exact_test_names() {
        assert_eq!(
            exact_test_filterset(&["t::a".to_owned(), "t::b".to_owned()]),
            "test(=t::a) + test(=t::b)"
        );
    }

    #[test]
    fn test_argv_passes_filterset_for_selected_tests() {
        let argv = NextestRunner.test_argv(None, &["t::a".to_owned()]);
        assert_eq!(argv, vec!["cargo", "nextest", "run", "-E", "test(=t::a)"]);
    }

    #[test]
    fn test_argv_without_tests_runs_nothing_selected() {
        let argv = NextestRunner.test_argv(Some("demo-pkg"), &[]);
        assert_eq!(
            argv,
            vec!["cargo", "nextest", "run", "--package", "demo-pkg"]
        );
    }
}
