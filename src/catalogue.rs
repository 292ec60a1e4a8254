//! The catalogue: every gremlin, with stable ids, for one run.

use std::collections::HashMap;

use camino::Utf8PathBuf;

use crate::finder::{find_candidates, Candidate};
use crate::gremlin::Gremlin;
use crate::source::SourceFile;
use crate::Result;
use std::sync::Arc;

/// An immutable, ordered list of every gremlin discovered in a tree.
#[derive(Debug, Default)]
pub struct Catalogue {
    gremlins: Vec<Gremlin>,
    by_path: HashMap<Utf8PathBuf, Vec<usize>>,
    source_files: Vec<Arc<SourceFile>>,
}

impl Catalogue {
    /// Build a catalogue from every source file, in path order.
    ///
    /// Gremlin ids are a pure function of this input: the same set of files
    /// with the same content always produces the same ids in the same order.
    pub fn build(mut source_files: Vec<Arc<SourceFile>>) -> Result<Catalogue> {
        source_files.sort_by(|a, b| a.tree_relative_path().cmp(b.tree_relative_path()));
        let mut candidates: Vec<Candidate> = Vec::new();
        for source_file in &source_files {
            candidates.extend(find_candidates(source_file)?);
        }
        let width = candidates.len().to_string().len().max(3);
        let mut gremlins = Vec::with_capacity(candidates.len());
        let mut by_path: HashMap<Utf8PathBuf, Vec<usize>> = HashMap::new();
        for (i, candidate) in candidates.into_iter().enumerate() {
            let id = format!("g{:0width$}", i + 1, width = width);
            let path = candidate.source_file.tree_relative_path().to_owned();
            by_path.entry(path).or_default().push(i);
            gremlins.push(Gremlin {
                id,
                source_file: candidate.source_file,
                function: candidate.function,
                span: candidate.span,
                genre: candidate.genre,
                original_text: candidate.original_text,
                replacement_text: candidate.replacement_text,
            });
        }
        Ok(Catalogue {
            gremlins,
            by_path,
            source_files,
        })
    }

    /// Every source file reachable in the tree, including ones with no
    /// gremlins of their own (for example a file containing only tests).
    pub fn source_files(&self) -> &[Arc<SourceFile>] {
        &self.source_files
    }

    pub fn len(&self) -> usize {
        self.gremlins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gremlins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gremlin> {
        self.gremlins.iter()
    }

    pub fn gremlins_in(&self, path: &camino::Utf8Path) -> impl Iterator<Item = &Gremlin> {
        self.by_path
            .get(path)
            .into_iter()
            .flatten()
            .map(|&i| &self.gremlins[i])
    }

    pub fn get(&self, id: &str) -> Option<&Gremlin> {
        self.gremlins.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_are_dense_and_zero_padded() {
        let files = vec![Arc::new(SourceFile::for_tests(
            "src/lib.rs",
            "fn is_adult(age: u32) -> bool {\n    age >= 18\n}\n",
            "demo",
            true,
        ))];
        let catalogue = Catalogue::build(files).unwrap();
        assert!(!catalogue.is_empty());
        for gremlin in catalogue.iter() {
            assert!(gremlin.id.starts_with('g'));
            assert_eq!(gremlin.id.len(), 4); // g + 3 digits for a handful of gremlins
        }
    }

    #[test]
    fn build_is_deterministic() {
        let make = || {
            vec![Arc::new(SourceFile::for_tests(
                "src/lib.rs",
                "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n",
                "demo",
                true,
            ))]
        };
        let first: Vec<String> = Catalogue::build(make())
            .unwrap()
            .iter()
            .map(|g| g.id.clone())
            .collect();
        let second: Vec<String> = Catalogue::build(make())
            .unwrap()
            .iter()
            .map(|g| g.id.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_file_has_no_gremlins() {
        let files = vec![Arc::new(SourceFile::for_tests(
            "src/lib.rs",
            "// nothing to mutate here\n",
            "demo",
            true,
        ))];
        let catalogue = Catalogue::build(files).unwrap();
        assert!(catalogue.is_empty());
    }
}
