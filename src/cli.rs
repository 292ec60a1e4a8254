//! Command-line argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

use crate::shard::Shard;

/// Find untested code by injecting gremlins into your Rust code and checking
/// whether your test suite notices.
#[derive(Parser, Debug)]
#[command(name = "cargo-gremlins", bin_name = "cargo", version)]
pub enum Cargo {
    Gremlins(Args),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Only test these packages.
    #[arg(long, short = 'p', value_name = "NAME")]
    pub package: Vec<String>,

    /// Test all packages in the workspace.
    #[arg(long)]
    pub workspace: bool,

    /// Path to a directory within a package to test, used to select the
    /// default package when `--package`/`--workspace` are not given.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<Utf8PathBuf>,

    /// Only generate gremlins whose description matches this regex.
    #[arg(long, value_name = "REGEX")]
    pub re: Vec<String>,

    /// Exclude gremlins whose description matches this regex.
    #[arg(long, value_name = "REGEX")]
    pub exclude_re: Vec<String>,

    /// Only run gremlins listed in this file (format: `FILE:LINE:COL: DESCRIPTION in FUNCTION`).
    #[arg(long, value_name = "FILE")]
    pub only: Option<Utf8PathBuf>,

    /// Skip gremlins listed in this file, in the same format as `--only`.
    #[arg(long, value_name = "FILE")]
    pub skip: Option<Utf8PathBuf>,

    /// Run shard K of N, splitting the catalogue evenly.
    #[arg(long, value_name = "K/N")]
    pub shard: Option<Shard>,

    /// Number of gremlins to run in parallel. Defaults to the number of logical CPUs.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Timeout for running the tests selected for one gremlin.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Timeout for the one-time baseline/instrumentation build.
    #[arg(long, value_name = "SECS")]
    pub build_timeout: Option<f64>,

    /// Multiplier applied to the baseline test duration to compute the default per-gremlin timeout.
    #[arg(long, value_name = "X")]
    pub timeout_multiplier: Option<f64>,

    /// Multiplier applied to the baseline build duration to compute the default build timeout.
    #[arg(long, value_name = "X")]
    pub build_timeout_multiplier: Option<f64>,

    /// How to run the baseline: `run` it as normal, or `skip` it and assume it passes.
    #[arg(long, value_enum, default_value_t = BaselineStrategy::Run)]
    pub baseline: BaselineStrategy,

    /// Which host test runner to invoke.
    #[arg(long, value_enum, default_value_t = RunnerKind::CargoTest)]
    pub test_tool: RunnerKind,

    /// Subprocess start method.
    #[arg(long, value_enum, default_value_t = StartMethod::Auto)]
    pub start_method: StartMethod,

    /// Emit a machine-readable JSON report instead of (or in addition to) the console summary.
    #[arg(long)]
    pub json: bool,

    /// Directory to write gremlins state and reports into, relative to the workspace root.
    #[arg(long, value_name = "PATH", default_value = "target/gremlins")]
    pub output: Utf8PathBuf,

    /// Print what would be done without actually testing anything.
    #[arg(long)]
    pub list: bool,

    /// Disable the incremental result cache; re-test every gremlin from scratch.
    #[arg(long)]
    pub no_cache: bool,

    /// Show elapsed time for each phase.
    #[arg(long)]
    pub show_times: bool,

    /// Increase logging verbosity; repeat for more detail.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write a detailed log to this file, in addition to the per-scenario logs.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<Utf8PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum BaselineStrategy {
    #[default]
    Run,
    Skip,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum RunnerKind {
    #[default]
    CargoTest,
    Nextest,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum StartMethod {
    #[default]
    Auto,
    Spawn,
    Fork,
    Forkserver,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_bare_invocation() {
        let args = Args::parse_from(["cargo-gremlins"]);
        assert!(!args.workspace);
        assert_eq!(args.test_tool, RunnerKind::CargoTest);
    }

    #[test]
    fn parses_shard_and_jobs() {
        let args = Args::parse_from(["cargo-gremlins", "--shard", "1/4", "--jobs", "8"]);
        assert_eq!(args.shard.unwrap(), Shard { k: 1, n: 4 });
        assert_eq!(args.jobs, Some(8));
    }
}
