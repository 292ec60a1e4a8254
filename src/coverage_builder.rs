//! Build a [CoverageMap] by running the instrumented, unmutated tree once per
//! test, with a fresh coverage sink file each time.
//!
//! Running one test at a time rather than the whole suite in one pass costs
//! more wall-clock time, but removes any ambiguity about which test reached
//! which mutation point; the alternative would need the test harness itself
//! to report per-test reachability, which libtest doesn't expose.

use std::fs;
use std::time::Duration;

use camino::Utf8Path;
use tracing::warn;

use crate::catalogue::Catalogue;
use crate::coverage::CoverageMap;
use crate::log_file::LogFile;
use crate::runner::{run_tests, HostRunner};
use crate::runtime_injection::COVERAGE_SINK_VAR;
use crate::Result;

/// Run `tests` one at a time against the instrumented tree at `build_dir`,
/// and translate the gremlin ids each one touches into `(file, line)` hits.
pub fn collect(
    runner: &dyn HostRunner,
    build_dir: &Utf8Path,
    package: Option<&str>,
    tests: &[String],
    catalogue: &Catalogue,
    per_test_timeout: Duration,
    log_file: &mut LogFile,
) -> Result<CoverageMap> {
    let sink_dir = tempfile::tempdir()?;
    let mut hits = Vec::new();
    for test in tests {
        let sink_path = Utf8Path::from_path(sink_dir.path())
            .expect("tempdir path is UTF-8")
            .join("sink.txt");
        let _ = fs::remove_file(&sink_path);
        let env = [(COVERAGE_SINK_VAR, sink_path.as_str())];
        let (status, _) = run_tests(
            runner,
            build_dir,
            package,
            std::slice::from_ref(test),
            &env,
            per_test_timeout,
            log_file,
        )?;
        if status != crate::process::ProcessStatus::Success {
            warn!(%test, "test failed while collecting coverage; its reachable gremlins may be undercounted");
        }
        let Ok(touched) = fs::read_to_string(&sink_path) else {
            continue;
        };
        for gremlin_id in touched.lines().filter(|l| !l.is_empty()) {
            if let Some(gremlin) = catalogue.get(gremlin_id) {
                hits.push((
                    gremlin.source_file.tree_relative_path().to_owned(),
                    gremlin.span.start.line,
                    test.clone(),
                ));
            }
        }
    }
    Ok(CoverageMap::from_hits(hits))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::SourceFile;
    use std::sync::Arc;

    /// Stands in for the instrumented binary: writes the catalogue's one
    /// gremlin id to the coverage sink when run, the same way `touch()` would.
    struct FakeRunner(String);

    impl HostRunner for FakeRunner {
        fn list_tests(&self, _cwd: &Utf8Path, _package: Option<&str>) -> Result<Vec<String>> {
            Ok(vec![])
        }

        fn test_argv(&self, _package: Option<&str>, _tests: &[String]) -> Vec<String> {
            vec![
                "sh".into(),
                "-c".into(),
                format!("echo {} >> \"$GREMLINS_COVERAGE_SINK\"", self.0),
            ]
        }
    }

    #[test]
    fn collect_reads_touched_gremlins_back_from_the_sink() {
        let build_dir_handle = tempfile::tempdir().unwrap();
        let build_dir = Utf8Path::from_path(build_dir_handle.path()).unwrap();
        let source_file = Arc::new(SourceFile::for_tests(
            "src/lib.rs",
            "fn f() -> bool {\n    true\n}\n",
            "demo",
            true,
        ));
        let catalogue = Catalogue::build(vec![source_file]).unwrap();
        let gremlin_id = catalogue.iter().next().expect("one gremlin").id.clone();

        let mut log_file = LogFile::create_in(build_dir, "coverage").unwrap();
        let map = collect(
            &FakeRunner(gremlin_id.clone()),
            build_dir,
            None,
            &["t::a".to_owned()],
            &catalogue,
            Duration::from_secs(5),
            &mut log_file,
        )
        .unwrap();
        assert_eq!(
            map.covering_tests(camino::Utf8Path::new("src/lib.rs"), 2),
            vec!["t::a".to_owned()]
        );
    }
}
