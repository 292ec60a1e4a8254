//! A line coverage map used to select, for each gremlin, the smallest set of
//! tests that might detect it.

use std::collections::{HashMap, HashSet};

use camino::Utf8PathBuf;

/// Coverage collected from a single instrumented baseline test run: for every
/// covered `(file, line)`, the set of test ids that executed it.
#[derive(Debug, Default, Clone)]
pub struct CoverageMap {
    by_location: HashMap<(Utf8PathBuf, usize), HashSet<String>>,
    lines_covered_by_test: HashMap<String, usize>,
    known_locations: bool,
}

impl CoverageMap {
    /// Build a coverage map from `(file, line, test_id)` hits.
    pub fn from_hits(hits: impl IntoIterator<Item = (Utf8PathBuf, usize, String)>) -> CoverageMap {
        let mut by_location: HashMap<(Utf8PathBuf, usize), HashSet<String>> = HashMap::new();
        let mut lines_covered_by_test: HashMap<String, usize> = HashMap::new();
        let mut known_locations = false;
        for (path, line, test_id) in hits {
            known_locations = true;
            if by_location
                .entry((path, line))
                .or_default()
                .insert(test_id.clone())
            {
                *lines_covered_by_test.entry(test_id).or_insert(0) += 1;
            }
        }
        CoverageMap {
            by_location,
            lines_covered_by_test,
            known_locations,
        }
    }

    /// Every test id that appears anywhere in the coverage map.
    pub fn all_test_ids(&self) -> HashSet<String> {
        self.lines_covered_by_test.keys().cloned().collect()
    }

    /// Tests that covered `(file, line)`, sorted by ascending specificity
    /// (the test that covers the fewest lines overall first), with ties
    /// broken lexicographically by test id.
    ///
    /// If this location has no recorded coverage at all (as opposed to
    /// recorded coverage by zero tests), that's treated as a gap in the
    /// instrumentation rather than genuinely-dead code: every known test is
    /// returned, erring on the side of running too much rather than missing
    /// a gremlin that could have been caught.
    pub fn covering_tests(&self, path: &camino::Utf8Path, line: usize) -> Vec<String> {
        let selected: HashSet<String> = match self.by_location.get(&(path.to_owned(), line)) {
            Some(tests) => tests.clone(),
            None if self.known_locations => self.all_test_ids(),
            None => HashSet::new(),
        };
        let mut selected: Vec<String> = selected.into_iter().collect();
        selected.sort_by(|a, b| {
            let specificity_a = self.lines_covered_by_test.get(a).copied().unwrap_or(0);
            let specificity_b = self.lines_covered_by_test.get(b).copied().unwrap_or(0);
            specificity_a.cmp(&specificity_b).then_with(|| a.cmp(b))
        });
        selected
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn path(s: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(s)
    }

    #[test]
    fn unhit_line_in_an_instrumented_file_over_approximates() {
        // A line with no recorded hits, but coverage recorded elsewhere in the
        // run, is treated as a gap in instrumentation rather than dead code.
        let map = CoverageMap::from_hits([(path("src/lib.rs"), 1, "t::a".to_owned())]);
        assert_eq!(map.covering_tests(path("src/lib.rs").as_path(), 99), vec!["t::a".to_owned()]);
    }

    #[test]
    fn covered_line_selects_only_its_tests() {
        let map = CoverageMap::from_hits([
            (path("src/lib.rs"), 5, "t::a".to_owned()),
            (path("src/lib.rs"), 5, "t::b".to_owned()),
            (path("src/lib.rs"), 9, "t::b".to_owned()),
        ]);
        let selected = map.covering_tests(path("src/lib.rs").as_path(), 5);
        assert_eq!(selected, vec!["t::a".to_owned(), "t::b".to_owned()]);
    }

    #[test]
    fn no_coverage_at_all_selects_nothing() {
        let map = CoverageMap::default();
        assert!(map.covering_tests(path("src/lib.rs").as_path(), 1).is_empty());
    }

    #[test]
    fn most_specific_test_sorts_first() {
        let map = CoverageMap::from_hits([
            (path("src/lib.rs"), 1, "t::broad".to_owned()),
            (path("src/lib.rs"), 2, "t::broad".to_owned()),
            (path("src/lib.rs"), 1, "t::narrow".to_owned()),
        ]);
        let selected = map.covering_tests(path("src/lib.rs").as_path(), 1);
        assert_eq!(selected, vec!["t::narrow".to_owned(), "t::broad".to_owned()]);
    }
}
