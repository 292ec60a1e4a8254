//! Dispatch queued work across a fixed number of worker threads.
//!
//! Each worker repeatedly pulls the next [WorkItem] from a shared queue, runs
//! it to completion (consulting and then updating the result cache for
//! gremlin scenarios), and reports the outcome back over a channel. There's
//! one build of the instrumented tree shared by every worker; a gremlin
//! scenario only has a test phase, since which mutation is active is
//! selected at runtime rather than by rebuilding.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Sender};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use camino::Utf8Path;
use tracing::{info, warn};

use crate::cache::{cache_key, ResultCache};
use crate::hash::hash_source;
use crate::interrupt::check_interrupted;
use crate::log_file::LogFile;
use crate::result::{GremlinResult, GremlinStatus};
use crate::runner::{run_tests, HostRunner};
use crate::runtime_injection::ACTIVE_GREMLIN_VAR;
use crate::test_index::TestIndex;
use crate::timeouts::Timeouts;
use crate::worker::WorkItem;
use crate::Result;

/// Everything a worker needs that's shared read-only across the whole pool.
pub struct PoolContext<'a> {
    pub runner: &'a (dyn HostRunner + Sync),
    pub build_dir: &'a Utf8Path,
    pub logs_dir: &'a Utf8Path,
    pub timeouts: Timeouts,
    pub no_cache: bool,
    pub test_index: &'a TestIndex,
}

/// Run every item in `items` across `jobs` worker threads, returning one
/// result per gremlin scenario (the baseline, if present, is reported but
/// excluded from the gremlin-indexed return value).
pub fn run(
    ctx: &PoolContext,
    jobs: usize,
    items: Vec<WorkItem>,
    cache: &Mutex<ResultCache>,
) -> Result<Vec<GremlinResult>> {
    let queue = Mutex::new(VecDeque::from(items));
    let (tx, rx) = channel();
    let jobs = jobs.max(1);
    std::thread::scope(|scope| {
        for worker_id in 0..jobs {
            let queue = &queue;
            let tx: Sender<Result<Option<GremlinResult>>> = tx.clone();
            scope.spawn(move || {
                run_worker(worker_id, ctx, queue, cache, &tx);
            });
        }
        drop(tx);
        let mut results = Vec::new();
        for received in rx {
            match received {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(err) => warn!("worker error: {err:#}"),
            }
        }
        Ok(results)
    })
}

fn run_worker(
    worker_id: usize,
    ctx: &PoolContext,
    queue: &Mutex<VecDeque<WorkItem>>,
    cache: &Mutex<ResultCache>,
    tx: &Sender<Result<Option<GremlinResult>>>,
) {
    loop {
        if check_interrupted().is_err() {
            return;
        }
        let item = match queue.lock().expect("queue lock").pop_front() {
            Some(item) => item,
            None => return,
        };
        if !item.scenario.is_gremlin() {
            // The baseline is run separately, before the pool starts; skip
            // any stray copy that ended up on the queue.
            continue;
        }
        let _ = tx.send(run_one(worker_id, ctx, cache, item));
    }
}

fn run_one(
    worker_id: usize,
    ctx: &PoolContext,
    cache: &Mutex<ResultCache>,
    item: WorkItem,
) -> Result<Option<GremlinResult>> {
    let gremlin = item.scenario.gremlin().clone();
    info!(worker_id, gremlin = %gremlin.id, "testing gremlin");

    if item.covering_tests.is_empty() {
        info!(gremlin = %gremlin.id, "no test reaches this gremlin; marking as survived");
        return Ok(Some(GremlinResult {
            gremlin_id: gremlin.id,
            status: GremlinStatus::Survived,
            killing_test: None,
            duration: Duration::ZERO,
        }));
    }

    let source_hash = hash_source(gremlin.source_file.code());
    let tests_hash = ctx.test_index.covering_test_files_hash(&item.covering_tests);
    let key = cache_key(&gremlin.id, &source_hash, &tests_hash);

    if !ctx.no_cache {
        if let Some(cached) = cache.lock().expect("cache lock").get(&key) {
            info!(gremlin = %gremlin.id, "reusing cached result");
            return Ok(Some(cached.clone()));
        }
    }

    let mut log_file = LogFile::create_in(ctx.logs_dir, &gremlin.log_file_name_base())?;
    let env = [(ACTIVE_GREMLIN_VAR, gremlin.id.as_str())];
    let start = Instant::now();
    let (status, killing_test) = run_tests(
        ctx.runner,
        ctx.build_dir,
        Some(gremlin.package_name()),
        &item.covering_tests,
        &env,
        ctx.timeouts.test,
        &mut log_file,
    )?;
    let duration = start.elapsed();

    let status = match status {
        crate::process::ProcessStatus::Success => GremlinStatus::Survived,
        crate::process::ProcessStatus::Failure => GremlinStatus::Zapped,
        crate::process::ProcessStatus::Timeout => GremlinStatus::Timeout,
    };
    let result = GremlinResult {
        gremlin_id: gremlin.id.clone(),
        status,
        killing_test,
        duration,
    };

    if !ctx.no_cache {
        // Deferred: taking the file lock and rewriting the whole cache after
        // every gremlin would serialize workers that are otherwise running
        // in parallel. The orchestrator flushes once after the pool drains.
        cache
            .lock()
            .expect("cache lock")
            .put_deferred(key, result.clone());
    }
    Ok(Some(result))
}
