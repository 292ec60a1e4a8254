//! Roll individual gremlin results up into a mutation score and a ranked
//! list of survivors worth looking at first.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::catalogue::Catalogue;
use crate::gremlin::Gremlin;
use crate::result::{GremlinResult, GremlinStatus};

/// One gremlin's result paired with the gremlin it describes, for reporting.
#[derive(Clone, Debug, Serialize)]
pub struct ScoredGremlin {
    pub gremlin_id: String,
    pub file: String,
    pub line: usize,
    pub description: String,
    pub status: GremlinStatus,
    pub killing_test: Option<String>,
}

/// A per-file rollup of how many gremlins were zapped versus survived.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FileScore {
    pub file: String,
    pub zapped: usize,
    pub survived: usize,
    pub timeout: usize,
    pub error: usize,
}

impl FileScore {
    fn total(&self) -> usize {
        self.zapped + self.survived + self.timeout + self.error
    }
}

/// The full score for a run: overall percentage, per-file breakdown, and the
/// survivors ranked by how serious a miss they represent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MutationScore {
    pub total: usize,
    pub detected: usize,
    pub survived: Vec<ScoredGremlin>,
    pub by_file: Vec<FileScore>,
}

impl MutationScore {
    /// The fraction of gremlins detected, as a percentage. Defined as 0 when
    /// there was nothing to test, rather than dividing by zero.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.detected as f64 / self.total as f64
        }
    }
}

/// Build a [MutationScore] from the catalogue and the result recorded for
/// each gremlin in it.
///
/// Survivors are ranked by descending [crate::operator::Genre::severity],
/// then by file and line, so the findings most likely to matter come first.
pub fn aggregate(catalogue: &Catalogue, results: &HashMap<String, GremlinResult>) -> MutationScore {
    let mut by_file: HashMap<Utf8PathBuf, FileScore> = HashMap::new();
    let mut survived = Vec::new();
    let mut detected = 0;
    let mut total = 0;

    for gremlin in catalogue.iter() {
        let Some(result) = results.get(&gremlin.id) else {
            continue;
        };
        total += 1;
        let path = gremlin.source_file.tree_relative_path().to_owned();
        let entry = by_file.entry(path).or_insert_with(|| FileScore {
            file: gremlin.source_file.tree_relative_slashes(),
            ..Default::default()
        });
        match result.status {
            GremlinStatus::Zapped => entry.zapped += 1,
            GremlinStatus::Survived => entry.survived += 1,
            GremlinStatus::Timeout => entry.timeout += 1,
            GremlinStatus::Error => entry.error += 1,
        }
        if result.status.is_detected() {
            detected += 1;
        }
        if matches!(result.status, GremlinStatus::Survived) {
            survived.push(scored(gremlin, result));
        }
    }

    survived.sort_by(|a, b| {
        severity_of(catalogue, &b.gremlin_id)
            .cmp(&severity_of(catalogue, &a.gremlin_id))
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });

    let mut by_file: Vec<FileScore> = by_file.into_values().collect();
    by_file.sort_by(|a, b| a.file.cmp(&b.file));

    MutationScore {
        total,
        detected,
        survived,
        by_file,
    }
}

fn severity_of(catalogue: &Catalogue, gremlin_id: &str) -> u8 {
    catalogue
        .get(gremlin_id)
        .map(|g| g.genre.severity())
        .unwrap_or(0)
}

fn scored(gremlin: &Gremlin, result: &GremlinResult) -> ScoredGremlin {
    ScoredGremlin {
        gremlin_id: gremlin.id.clone(),
        file: gremlin.source_file.tree_relative_slashes(),
        line: gremlin.span.start.line,
        description: gremlin.describe_change(),
        status: result.status,
        killing_test: result.killing_test.clone(),
    }
}
