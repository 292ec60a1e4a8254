//! Configuration: CLI arguments merged with `gremlins.toml`.

use std::str::FromStr;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::cli::{Args, BaselineStrategy, RunnerKind, StartMethod};
use crate::shard::Shard;
use crate::Result;

/// The `[gremlins]` table of `gremlins.toml` at the root of the tree.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub test_timeout: Option<f64>,
    pub build_timeout: Option<f64>,
    pub timeout_multiplier: Option<f64>,
    pub build_timeout_multiplier: Option<f64>,
    pub exclude_globs: Vec<String>,
    pub exclude_re: Vec<String>,
    pub additional_cargo_args: Vec<String>,
    pub jobs: Option<usize>,
}

impl FromStr for ConfigFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl ConfigFile {
    /// Load `gremlins.toml` from the root of `tree_dir`, if it exists.
    pub fn load(tree_dir: &camino::Utf8Path) -> Result<ConfigFile> {
        let path = tree_dir.join("gremlins.toml");
        if !path.is_file() {
            return Ok(ConfigFile::default());
        }
        let text = std::fs::read_to_string(&path)?;
        text.parse()
    }
}

/// The fully resolved configuration for one run: CLI arguments take
/// precedence over `gremlins.toml`, which takes precedence over built-in defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub jobs: usize,
    pub test_timeout: Option<Duration>,
    pub build_timeout: Option<Duration>,
    pub minimum_test_timeout: Duration,
    pub test_timeout_multiplier: Option<f64>,
    pub build_timeout_multiplier: Option<f64>,
    pub show_times: bool,
    pub shard: Option<Shard>,
    pub baseline: BaselineStrategy,
    pub runner: RunnerKind,
    pub start_method: StartMethod,
    pub output_dir: Utf8PathBuf,
    pub no_cache: bool,
    pub list_only: bool,
    pub json: bool,
    pub additional_cargo_args: Vec<String>,
}

impl RunConfig {
    pub fn new(args: &Args, file: &ConfigFile) -> Result<RunConfig> {
        Ok(RunConfig {
            jobs: args.jobs.or(file.jobs).unwrap_or_else(num_cpus),
            test_timeout: args.timeout.or(file.test_timeout).map(Duration::from_secs_f64),
            build_timeout: args
                .build_timeout
                .or(file.build_timeout)
                .map(Duration::from_secs_f64),
            minimum_test_timeout: Duration::from_secs(20),
            test_timeout_multiplier: args.timeout_multiplier.or(file.timeout_multiplier),
            build_timeout_multiplier: args.build_timeout_multiplier.or(file.build_timeout_multiplier),
            show_times: args.show_times,
            shard: args.shard,
            baseline: args.baseline,
            runner: args.test_tool,
            start_method: args.start_method,
            output_dir: args.output.clone(),
            no_cache: args.no_cache,
            list_only: args.list,
            json: args.json,
            additional_cargo_args: file.additional_cargo_args.clone(),
        })
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
