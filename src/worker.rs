//! A single unit of dispatchable work: test one gremlin (or the baseline)
//! against whichever tests can actually reach it.

use crate::scenario::Scenario;

/// One scenario queued for the worker pool, with the tests it should run.
///
/// An empty `covering_tests` list for a gremlin means no known test reaches
/// its mutation point at all; the pool treats that as an automatic survivor
/// without spawning a process for it. An empty list for the baseline instead
/// means "run the whole suite".
#[derive(Clone, Debug)]
pub struct WorkItem {
    pub scenario: Scenario,
    pub covering_tests: Vec<String>,
}

impl WorkItem {
    pub fn baseline() -> WorkItem {
        WorkItem {
            scenario: Scenario::Baseline,
            covering_tests: Vec::new(),
        }
    }

    pub fn gremlin(gremlin: crate::gremlin::Gremlin, covering_tests: Vec<String>) -> WorkItem {
        WorkItem {
            scenario: Scenario::Gremlin(gremlin),
            covering_tests,
        }
    }
}
