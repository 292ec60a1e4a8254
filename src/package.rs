//! Discover and represent cargo packages within a workspace.

use camino::Utf8PathBuf;

/// A package built and tested as a unit.
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct Package {
    /// The short name of the package, like "gremlins".
    pub name: String,

    /// The path of the `Cargo.toml` manifest file, relative to the top of the tree.
    pub relative_manifest_path: Utf8PathBuf,

    /// Top-level source files for this package (its library and binary targets),
    /// relative to the top of the tree. Discovery starts walking `mod` declarations
    /// from these files.
    pub top_sources: Vec<Utf8PathBuf>,
}
