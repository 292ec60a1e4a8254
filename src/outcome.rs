//! The outcome of running one phase (build or test) of a scenario, and of a
//! scenario as a whole.

use std::time::Duration;

use serde::Serialize;

use crate::process::ProcessStatus;

/// A phase of work within one scenario.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum Phase {
    /// Building (or instrumenting) the tree.
    Build,
    /// Running the selected tests.
    Test,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Build => "build",
            Phase::Test => "test",
        }
    }
}

/// The result of running one phase.
#[derive(Debug, Clone)]
pub struct PhaseResult {
    pub phase: Phase,
    pub process_status: ProcessStatus,
    pub duration: Duration,
}

/// The accumulated results of running every phase of one scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioOutcome {
    pub phases: Vec<PhaseResult>,
}

impl ScenarioOutcome {
    pub fn push(&mut self, result: PhaseResult) {
        self.phases.push(result);
    }

    pub fn phase_result(&self, phase: Phase) -> Option<&PhaseResult> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// True if every phase completed successfully.
    pub fn success(&self) -> bool {
        self.phases
            .iter()
            .all(|p| matches!(p.process_status, ProcessStatus::Success))
    }

    pub fn timed_out(&self) -> bool {
        self.phases
            .iter()
            .any(|p| matches!(p.process_status, ProcessStatus::Timeout))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_outcome_has_no_phase_result() {
        let outcome = ScenarioOutcome::default();
        assert!(outcome.phase_result(Phase::Test).is_none());
    }

    #[test]
    fn outcome_success_requires_every_phase_ok() {
        let mut outcome = ScenarioOutcome::default();
        outcome.push(PhaseResult {
            phase: Phase::Build,
            process_status: ProcessStatus::Success,
            duration: Duration::from_secs(1),
        });
        assert!(outcome.success());
        outcome.push(PhaseResult {
            phase: Phase::Test,
            process_status: ProcessStatus::Failure,
            duration: Duration::from_secs(1),
        });
        assert!(!outcome.success());
    }
}
