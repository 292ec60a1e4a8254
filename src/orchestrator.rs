//! The end-to-end pipeline: discover gremlins, instrument a single build,
//! collect a coverage map, dispatch a worker pool, and report the result.

use std::collections::HashMap;
use std::env::current_dir;
use std::fs;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use camino::Utf8PathBuf;
use regex::Regex;
use tracing::info;

use crate::aggregator;
use crate::build_dir::BuildDir;
use crate::cache::ResultCache;
use crate::catalogue::Catalogue;
use crate::cli::{Args, BaselineStrategy, RunnerKind};
use crate::config::{ConfigFile, RunConfig};
use crate::console::Console;
use crate::coverage_builder;
use crate::exit_code;
use crate::filter::NameFilter;
use crate::gremlin::{Gremlin, GremlinSummary};
use crate::log_file::LogFile;
use crate::output::OutputDir;
use crate::pool::{self, PoolContext};
use crate::report;
use crate::result::GremlinResult;
use crate::runner::cargo_test::CargoTestRunner;
use crate::runner::nextest::NextestRunner;
use crate::runner::{run_tests, HostRunner};
use crate::runtime_injection;
use crate::test_index::TestIndex;
use crate::timeouts::Timeouts;
use crate::worker::WorkItem;
use crate::workspace::{PackageFilter, Workspace};
use crate::Result;

/// Run the whole tool from parsed CLI arguments; returns the process exit code.
pub fn main(args: &Args) -> Result<i32> {
    let start_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => Utf8PathBuf::try_from(current_dir().context("read current directory")?)
            .context("current directory is not UTF-8")?,
    };
    let workspace = Workspace::open(&start_dir)?;
    let config_file = ConfigFile::load(&workspace.dir)?;
    let config = RunConfig::new(args, &config_file)?;

    let package_filter = if !args.package.is_empty() {
        PackageFilter::explicit(args.package.clone())
    } else if args.workspace {
        PackageFilter::All
    } else {
        PackageFilter::Auto(start_dir)
    };

    let catalogue = workspace.discover(&package_filter)?;
    let gremlins = select_gremlins(&catalogue, args)?;

    if config.list_only {
        print_list(&gremlins, config.json);
        return Ok(exit_code::SUCCESS);
    }

    if gremlins.is_empty() {
        info!("no gremlins to test");
        return Ok(exit_code::SUCCESS);
    }

    let output_dir = OutputDir::create_or_open(&workspace.dir.join(&config.output_dir))?;
    let build_dir = BuildDir::create(&workspace.dir, &output_dir.instrumented_dir())?;
    instrument_tree(&workspace, &build_dir, &catalogue, &package_filter)?;

    let runner: Box<dyn HostRunner + Sync> = match config.runner {
        RunnerKind::CargoTest => Box::new(CargoTestRunner),
        RunnerKind::Nextest => Box::new(NextestRunner),
    };

    let mut baseline_log = output_dir.create_log("baseline")?;
    let (timeouts, baseline_ok) = run_baseline(
        runner.as_ref(),
        build_dir.path(),
        &config,
        &mut baseline_log,
    )?;
    if !baseline_ok {
        return Ok(exit_code::FOUND_PROBLEMS);
    }

    let all_tests = runner.list_tests(build_dir.path(), None)?;
    let coverage = coverage_builder::collect(
        runner.as_ref(),
        build_dir.path(),
        None,
        &all_tests,
        &catalogue,
        timeouts.test,
        &mut output_dir.create_log("coverage")?,
    )?;

    let work_items: Vec<WorkItem> = gremlins
        .iter()
        .map(|gremlin| {
            let covering = coverage.covering_tests(gremlin.source_file.tree_relative_path(), gremlin.span.start.line);
            WorkItem::gremlin(gremlin.clone(), covering)
        })
        .collect();

    let cache = Mutex::new(ResultCache::open(&output_dir.results_path())?);
    let test_index = TestIndex::build(catalogue.source_files());

    let pool_ctx = PoolContext {
        runner: runner.as_ref(),
        build_dir: build_dir.path(),
        logs_dir: &output_dir.logs_dir(),
        timeouts,
        no_cache: config.no_cache,
        test_index: &test_index,
    };

    let console = Console::start(work_items.len());
    for item in &work_items {
        console.gremlin_started(item.scenario.gremlin());
    }
    let results = pool::run(&pool_ctx, config.jobs, work_items, &cache)?;
    cache.lock().expect("cache lock").flush()?;
    for result in &results {
        if let Some(gremlin) = catalogue.get(&result.gremlin_id) {
            console.gremlin_finished(gremlin, result.status);
        }
    }

    let results_by_id: HashMap<String, GremlinResult> =
        results.into_iter().map(|r| (r.gremlin_id.clone(), r)).collect();
    let score = aggregator::aggregate(&catalogue, &results_by_id);
    report::report(&score, config.json);
    let _ = report::write_json_report(&score, output_dir.path());

    if score.survived.is_empty() {
        Ok(exit_code::SUCCESS)
    } else {
        Ok(exit_code::FOUND_PROBLEMS)
    }
}

/// Write the instrumentation for every gremlin into the build directory copy.
fn instrument_tree(
    workspace: &Workspace,
    build_dir: &BuildDir,
    catalogue: &Catalogue,
    package_filter: &PackageFilter,
) -> Result<()> {
    let mut by_path: HashMap<_, Vec<&Gremlin>> = HashMap::new();
    for gremlin in catalogue.iter() {
        by_path
            .entry(gremlin.source_file.tree_relative_path().to_owned())
            .or_default()
            .push(gremlin);
    }
    for (path, gremlins) in by_path {
        let code = gremlins[0].source_file.code();
        let instrumented = crate::instrumenter::instrument_source(code, &gremlins);
        build_dir.write_source(&path, &instrumented)?;
    }
    let packages = workspace.packages(package_filter)?;
    runtime_injection::inject(build_dir.path(), &packages)
}

/// Run the unmutated baseline once, to confirm the tree currently builds and
/// passes, and to calibrate per-gremlin timeouts.
fn run_baseline(
    runner: &(dyn HostRunner + Sync),
    build_dir: &camino::Utf8Path,
    config: &RunConfig,
    log_file: &mut LogFile,
) -> Result<(Timeouts, bool)> {
    if config.baseline == BaselineStrategy::Skip {
        info!("baseline skipped by configuration");
        return Ok((Timeouts::without_baseline(config), true));
    }
    let start = Instant::now();
    let (status, _) = run_tests(
        runner,
        build_dir,
        None,
        &[],
        &[],
        Timeouts::for_baseline(config).test,
        log_file,
    )?;
    let elapsed = start.elapsed();
    if status != crate::process::ProcessStatus::Success {
        info!("baseline failed; cannot test gremlins against a broken tree");
        return Ok((Timeouts::without_baseline(config), false));
    }
    let mut outcome = crate::outcome::ScenarioOutcome::default();
    outcome.push(crate::outcome::PhaseResult {
        phase: crate::outcome::Phase::Test,
        process_status: status,
        duration: elapsed,
    });
    Ok((Timeouts::from_baseline(&outcome, config), true))
}

/// Select which gremlins to test: everything in the catalogue, narrowed by
/// `--re`/`--exclude-re` and `--only`/`--skip` files, and then by `--shard`.
fn select_gremlins(catalogue: &Catalogue, args: &Args) -> Result<Vec<Gremlin>> {
    let include_re: Vec<Regex> = args
        .re
        .iter()
        .map(|pattern| Regex::new(pattern).with_context(|| format!("invalid --re pattern {pattern:?}")))
        .collect::<Result<_>>()?;
    let exclude_re: Vec<Regex> = args
        .exclude_re
        .iter()
        .map(|pattern| Regex::new(pattern).with_context(|| format!("invalid --exclude-re pattern {pattern:?}")))
        .collect::<Result<_>>()?;
    let only_filter = args
        .only
        .as_ref()
        .map(|path| load_name_filter(path))
        .transpose()?;
    let skip_filter = args
        .skip
        .as_ref()
        .map(|path| load_name_filter(path))
        .transpose()?;

    let mut selected: Vec<Gremlin> = catalogue
        .iter()
        .filter(|gremlin| {
            let description = gremlin.describe_change();
            if !include_re.is_empty() && !include_re.iter().any(|re| re.is_match(&description)) {
                return false;
            }
            if exclude_re.iter().any(|re| re.is_match(&description)) {
                return false;
            }
            if let Some(only) = &only_filter {
                if !only.matches(gremlin) {
                    return false;
                }
            }
            if let Some(skip) = &skip_filter {
                if skip.matches(gremlin) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    if let Some(shard) = args.shard {
        selected = shard.select(selected);
    }
    Ok(selected)
}

fn load_name_filter(path: &camino::Utf8Path) -> Result<NameFilter> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    Ok(text.lines().collect())
}

fn print_list(gremlins: &[Gremlin], json: bool) {
    if json {
        let summaries: Vec<GremlinSummary> = gremlins.iter().map(GremlinSummary::from).collect();
        if let Ok(text) = serde_json::to_string_pretty(&summaries) {
            println!("{text}");
        }
    } else {
        for gremlin in gremlins {
            println!("{}", gremlin.to_styled_string());
        }
    }
}
