//! Render a finished run's score either as colored console output or as JSON,
//! depending on the configured output mode.

use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::aggregator::MutationScore;
use crate::console::print_report;
use crate::Result;

#[derive(Serialize)]
struct JsonReport<'a> {
    total: usize,
    detected: usize,
    percentage: f64,
    survived: &'a [crate::aggregator::ScoredGremlin],
    by_file: &'a [crate::aggregator::FileScore],
}

/// Print the final report to stdout, as JSON if `json` is set.
pub fn report(score: &MutationScore, json: bool) {
    if json {
        let report = JsonReport {
            total: score.total,
            detected: score.detected,
            percentage: score.percentage(),
            survived: &score.survived,
            by_file: &score.by_file,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("failed to render JSON report: {err}"),
        }
    } else {
        print_report(score);
    }
}

/// Also persist the JSON report to `output_dir/gremlins.json`, regardless of
/// which format was printed to the console, so tooling can always find it.
pub fn write_json_report(score: &MutationScore, output_dir: &Utf8Path) -> Result<()> {
    let report = JsonReport {
        total: score.total,
        detected: score.detected,
        percentage: score.percentage(),
        survived: &score.survived,
        by_file: &score.by_file,
    };
    let path = output_dir.join("gremlins.json");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(serde_json::to_string_pretty(&report)?.as_bytes())?;
    Ok(())
}
