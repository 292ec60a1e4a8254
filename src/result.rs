//! The final, reportable result of testing one gremlin.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What happened when a gremlin's mutation was tested.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GremlinStatus {
    /// A selected test failed: the gremlin was caught.
    Zapped,
    /// Every selected test passed (or none were selected): the gremlin escaped notice.
    Survived,
    /// A selected test ran past its timeout. Counted as detected, on the
    /// theory that a mutation that hangs the program has still been noticed.
    Timeout,
    /// The build failed, or some other error prevented the gremlin from being tested at all.
    Error,
}

impl GremlinStatus {
    /// True if this status counts as "detected" for scoring purposes.
    pub fn is_detected(&self) -> bool {
        matches!(self, GremlinStatus::Zapped | GremlinStatus::Timeout)
    }
}

/// The outcome of testing a single gremlin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GremlinResult {
    pub gremlin_id: String,
    pub status: GremlinStatus,
    /// The test that caught the gremlin, if any.
    pub killing_test: Option<String>,
    pub duration: Duration,
}
