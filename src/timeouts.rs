//! Calculation of timeouts for the build and test phases.

use std::cmp::max;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::outcome::{Phase, ScenarioOutcome};

#[derive(Debug, Copy, Clone)]
pub struct Timeouts {
    pub build: Duration,
    pub test: Duration,
}

impl Timeouts {
    /// Timeouts to use while running the baseline itself: as generous as the
    /// user explicitly configured, or unbounded otherwise.
    pub fn for_baseline(config: &RunConfig) -> Timeouts {
        Timeouts {
            test: config.test_timeout.unwrap_or(Duration::MAX),
            build: config.build_timeout.unwrap_or(Duration::MAX),
        }
    }

    /// Timeouts derived from how long the baseline actually took.
    pub fn from_baseline(baseline: &ScenarioOutcome, config: &RunConfig) -> Timeouts {
        Timeouts {
            build: build_timeout(baseline.phase_result(Phase::Build).map(|pr| pr.duration), config),
            test: test_timeout(baseline.phase_result(Phase::Test).map(|pr| pr.duration), config),
        }
    }

    /// Timeouts to use when the baseline was skipped entirely.
    pub fn without_baseline(config: &RunConfig) -> Timeouts {
        Timeouts {
            build: build_timeout(None, config),
            test: test_timeout(None, config),
        }
    }
}

const FALLBACK_TIMEOUT_SECS: u64 = 300;

fn warn_fallback_timeout(phase_name: &str) {
    warn!(
        "An explicit {phase_name} timeout is recommended when the baseline is skipped; using {FALLBACK_TIMEOUT_SECS} seconds by default"
    );
}

fn phase_timeout(
    phase: Phase,
    explicit_timeout: Option<Duration>,
    baseline_duration: Option<Duration>,
    minimum: Duration,
    multiplier: f64,
    config: &RunConfig,
) -> Duration {
    if let Some(timeout) = explicit_timeout {
        return timeout;
    }
    match baseline_duration {
        Some(baseline_duration) => {
            let timeout = max(
                minimum,
                Duration::from_secs((baseline_duration.as_secs_f64() * multiplier).ceil() as u64),
            );
            if config.show_times {
                info!(
                    "Auto-set {} timeout to {}",
                    phase.name(),
                    humantime::format_duration(timeout)
                );
            }
            timeout
        }
        None => {
            warn_fallback_timeout(phase.name());
            Duration::from_secs(FALLBACK_TIMEOUT_SECS)
        }
    }
}

fn test_timeout(baseline_duration: Option<Duration>, config: &RunConfig) -> Duration {
    phase_timeout(
        Phase::Test,
        config.test_timeout,
        baseline_duration,
        config.minimum_test_timeout,
        config.test_timeout_multiplier.unwrap_or(5.0),
        config,
    )
}

fn build_timeout(baseline_duration: Option<Duration>, config: &RunConfig) -> Duration {
    phase_timeout(
        Phase::Build,
        config.build_timeout,
        baseline_duration,
        Duration::from_secs(20),
        config.build_timeout_multiplier.unwrap_or(2.0),
        config,
    )
}
