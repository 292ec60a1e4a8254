//! A scenario is one thing the runner can build and test: either the
//! unmutated baseline, or a single gremlin.

use std::fmt;

use crate::gremlin::Gremlin;

/// A scenario is either the unmutated baseline, or one gremlin under test.
#[derive(Clone, Debug)]
pub enum Scenario {
    /// Build and test the tree with no mutation applied.
    Baseline,
    /// Build and test the tree with one gremlin applied.
    Gremlin(Gremlin),
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Baseline => f.write_str("baseline"),
            Scenario::Gremlin(gremlin) => gremlin.fmt(f),
        }
    }
}

impl Scenario {
    pub fn is_gremlin(&self) -> bool {
        matches!(self, Scenario::Gremlin { .. })
    }

    pub fn log_file_name_base(&self) -> String {
        match self {
            Scenario::Baseline => "baseline".into(),
            Scenario::Gremlin(gremlin) => gremlin.log_file_name_base(),
        }
    }

    /// Return the package that should be tested for this scenario,
    /// or `None` to test every package (as for the baseline).
    pub fn package_name(&self) -> Option<&str> {
        match self {
            Scenario::Gremlin(gremlin) => Some(gremlin.package_name()),
            Scenario::Baseline => None,
        }
    }

    pub fn gremlin(&self) -> &Gremlin {
        match self {
            Scenario::Gremlin(gremlin) => gremlin,
            Scenario::Baseline => panic!("not a gremlin scenario"),
        }
    }
}
