//! Maps each test id to the source file that defines it, so the result
//! cache can key a covering-tests hash on what those tests' files actually
//! contain, rather than on the tests' (stable) names.

use std::collections::HashMap;
use std::sync::Arc;

use syn::visit::{self, Visit};

use crate::ast::attr_is_test;
use crate::hash::{combine, hash_source, Digest256};
use crate::source::SourceFile;

/// Built once per run from every source file reachable in the tree, not just
/// the ones holding gremlins, so that a file containing only tests is still
/// indexed.
pub struct TestIndex {
    file_of_test: HashMap<String, Arc<SourceFile>>,
}

impl TestIndex {
    pub fn build(source_files: &[Arc<SourceFile>]) -> TestIndex {
        let mut file_of_test = HashMap::new();
        for source_file in source_files {
            let Ok(parsed) = syn::parse_file(source_file.code()) else {
                continue;
            };
            let mut visitor = TestVisitor {
                path: Vec::new(),
                source_file: Arc::clone(source_file),
                file_of_test: &mut file_of_test,
            };
            visitor.visit_file(&parsed);
        }
        TestIndex { file_of_test }
    }

    /// The combined hash of every distinct source file that defines one of
    /// `test_ids`: the hashes are sorted before combining, so the result
    /// doesn't depend on the order tests were selected in.
    pub fn covering_test_files_hash(&self, test_ids: &[String]) -> Digest256 {
        let mut hashes: Vec<Digest256> = test_ids
            .iter()
            .filter_map(|id| self.file_of_test.get(id))
            .map(|source_file| hash_source(source_file.code()))
            .collect();
        hashes.sort();
        hashes.dedup();
        combine(hashes.iter().map(String::as_str))
    }
}

struct TestVisitor<'a> {
    path: Vec<String>,
    source_file: Arc<SourceFile>,
    file_of_test: &'a mut HashMap<String, Arc<SourceFile>>,
}

impl<'ast> Visit<'ast> for TestVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.path.push(node.ident.to_string());
        visit::visit_item_mod(self, node);
        self.path.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if node.attrs.iter().any(attr_is_test) {
            let mut segments = self.path.clone();
            segments.push(node.sig.ident.to_string());
            self.file_of_test
                .insert(segments.join("::"), Arc::clone(&self.source_file));
        }
        // Deliberately not calling visit::visit_item_fn: a test function's
        // own body isn't itself a place another test can be declared.
    }
}
