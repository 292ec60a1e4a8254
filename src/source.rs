//! A single source file discovered within a package, and the text in it.

use std::sync::Arc;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::package::Package;
use crate::path::Utf8PathSlashes;
use crate::Result;

/// A source file within a tree, with its text and the package it belongs to.
///
/// `SourceFile` is cheap to clone: the text is shared via [`Arc`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceFile {
    /// Path relative to the root of the tree.
    tree_relative_path: Utf8PathBuf,

    /// Full text of the file, normalized to Unix line endings.
    code: Arc<String>,

    /// The package that owns this file.
    pub package: Arc<Package>,

    /// True if this file is one of the package's top-level source files
    /// (the entry point of a `lib` or `bin` target), as opposed to a file
    /// reached only via a `mod` declaration.
    pub is_top: bool,
}

impl SourceFile {
    /// Load a source file from disk.
    ///
    /// `tree_relative_path` is relative to `tree_path`. Returns `Ok(None)`
    /// if the path escapes the tree (for example via a `#[path]` attribute
    /// or `mod` declaration pointing outside it), since such files can't
    /// safely be attributed to this tree.
    pub fn load(
        tree_path: &Utf8Path,
        tree_relative_path: &Utf8Path,
        package: &Arc<Package>,
        is_top: bool,
    ) -> Result<Option<SourceFile>> {
        if tree_relative_path
            .components()
            .any(|c| c == camino::Utf8Component::ParentDir)
        {
            info!("Skipping source file outside of tree: {tree_relative_path}");
            return Ok(None);
        }
        let full_path = tree_path.join(tree_relative_path);
        let code = std::fs::read_to_string(&full_path)
            .with_context(|| format!("failed to read source file {full_path}"))?
            .replace("\r\n", "\n");
        Ok(Some(SourceFile {
            tree_relative_path: tree_relative_path.to_owned(),
            code: Arc::new(code),
            package: Arc::clone(package),
            is_top,
        }))
    }

    /// Construct a `SourceFile` directly from in-memory text, for tests.
    pub fn for_tests(
        tree_relative_path: impl Into<Utf8PathBuf>,
        code: impl Into<String>,
        package_name: &str,
        is_top: bool,
    ) -> SourceFile {
        let tree_relative_path = tree_relative_path.into();
        let package = Arc::new(Package {
            name: package_name.to_owned(),
            relative_manifest_path: Utf8PathBuf::from("Cargo.toml"),
            top_sources: vec![tree_relative_path.clone()],
        });
        SourceFile {
            tree_relative_path,
            code: Arc::new(code.into().replace("\r\n", "\n")),
            package,
            is_top,
        }
    }

    /// The full text of the file.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The path of this file, relative to the root of the tree.
    pub fn tree_relative_path(&self) -> &Utf8Path {
        &self.tree_relative_path
    }

    /// The path of this file, relative to the root of the tree, with
    /// forward slashes regardless of platform, for use in ids and messages.
    pub fn tree_relative_slashes(&self) -> String {
        self.tree_relative_path.to_slash_path()
    }

    /// Format a location within this file, like `src/lib.rs:10:5`.
    pub fn format_source_location(&self, line: usize, column: usize) -> String {
        format!("{}:{}:{}", self.tree_relative_slashes(), line, column)
    }
}

impl std::fmt::Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tree_relative_slashes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_missing_file_errors() {
        let package = Arc::new(Package {
            name: "nonexistent".to_owned(),
            relative_manifest_path: Utf8PathBuf::from("Cargo.toml"),
            top_sources: Vec::new(),
        });
        let result = SourceFile::load(
            Utf8Path::new("/nonexistent/tree"),
            Utf8Path::new("src/lib.rs"),
            &package,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_paths_outside_tree() {
        let package = Arc::new(Package {
            name: "pkg".to_owned(),
            relative_manifest_path: Utf8PathBuf::from("Cargo.toml"),
            top_sources: Vec::new(),
        });
        let result = SourceFile::load(
            Utf8Path::new("/some/tree"),
            Utf8Path::new("../escape.rs"),
            &package,
            false,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn for_tests_round_trips_code() {
        let sf = SourceFile::for_tests("src/lib.rs", "fn a() {}\n", "demo", true);
        assert_eq!(sf.code(), "fn a() {}\n");
        assert_eq!(sf.tree_relative_slashes(), "src/lib.rs");
        assert_eq!(sf.package.name, "demo");
        assert!(sf.is_top);
    }

    #[test]
    fn for_tests_normalizes_crlf() {
        let sf = SourceFile::for_tests("src/lib.rs", "fn a() {\r\n}\r\n", "demo", true);
        assert_eq!(sf.code(), "fn a() {\n}\n");
    }

    #[test]
    fn format_source_location_uses_slashes() {
        let sf = SourceFile::for_tests("src/nested/mod.rs", "", "demo", false);
        assert_eq!(sf.format_source_location(3, 7), "src/nested/mod.rs:3:7");
    }
}
