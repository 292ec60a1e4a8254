//! Discover the packages and source files of a cargo workspace, and build the
//! catalogue of gremlins within it.

use std::fmt;
use std::panic::catch_unwind;
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context};
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, debug_span, warn};

use crate::catalogue::Catalogue;
use crate::discovery::discover_source_files;
use crate::interrupt::check_interrupted;
use crate::package::Package;
use crate::process::get_command_output;
use crate::Result;

pub struct Workspace {
    pub dir: Utf8PathBuf,
    metadata: cargo_metadata::Metadata,
}

impl fmt::Debug for Workspace {
    #[gremlins_attrs::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace").field("dir", &self.dir).finish()
    }
}

/// Which packages to mutate in a workspace.
#[derive(Debug, Clone)]
pub enum PackageFilter {
    /// Include every package in the workspace.
    All,
    /// Packages with the given names, from `--package`.
    Explicit(Vec<String>),
    /// Automatic behavior when invoked from a subdirectory, as per
    /// <https://doc.rust-lang.org/cargo/reference/workspaces.html#package-selection>.
    Auto(Utf8PathBuf),
}

impl PackageFilter {
    pub fn explicit<S: ToString, I: IntoIterator<Item = S>>(names: I) -> PackageFilter {
        PackageFilter::Explicit(names.into_iter().map(|s| s.to_string()).collect_vec())
    }

    /// Translate an auto package filter into either `All` or `Explicit`.
    pub fn resolve_auto(&self, metadata: &cargo_metadata::Metadata) -> Result<PackageFilter> {
        if let PackageFilter::Auto(dir) = &self {
            let package_dir = locate_project(dir, false)?;
            let workspace_dir = &metadata.workspace_root;
            for package in metadata.workspace_packages() {
                if package.manifest_path.parent().expect("remove Cargo.toml") == package_dir {
                    debug!("resolved auto package filter to {:?}", package.name);
                    return Ok(PackageFilter::explicit([&package.name]));
                }
            }
            ensure!(
                &package_dir == workspace_dir,
                "package {package_dir:?} doesn't match any child and doesn't match the workspace root {workspace_dir:?}?",
            );
            match catch_unwind(|| metadata.workspace_default_packages()) {
                Ok(dm) if dm.is_empty() => Ok(PackageFilter::All),
                Ok(dm) => Ok(PackageFilter::explicit(dm.into_iter().map(|pmeta| &pmeta.name))),
                Err(err) => {
                    warn!(
                        cargo_metadata_error =
                            err.downcast::<String>().expect("panic message is a string"),
                        "workspace_default_packages is not supported; testing all packages",
                    );
                    Ok(PackageFilter::All)
                }
            }
        } else {
            Ok(self.clone())
        }
    }
}

impl Workspace {
    /// Open the workspace containing a given directory.
    pub fn open<P: AsRef<Utf8Path>>(start_dir: P) -> Result<Self> {
        let dir = locate_project(start_dir.as_ref(), true)?;
        let manifest_path = dir.join("Cargo.toml");
        debug!(?manifest_path, ?dir, "find workspace root");
        check_interrupted()?;
        let metadata = cargo_metadata::MetadataCommand::new()
            .no_deps()
            .manifest_path(&manifest_path)
            .exec()
            .with_context(|| format!("failed to run cargo metadata on {manifest_path:?}"))?;
        debug!(workspace_root = ?metadata.workspace_root, "found workspace root");
        Ok(Workspace { dir, metadata })
    }

    /// Find packages to test, subject to the given filter.
    pub fn packages(&self, package_filter: &PackageFilter) -> Result<Vec<Arc<Package>>> {
        let package_filter = package_filter.resolve_auto(&self.metadata)?;
        let mut packages = Vec::new();
        for package_metadata in self
            .metadata
            .workspace_packages()
            .into_iter()
            .sorted_by_key(|p| &p.name)
        {
            check_interrupted()?;
            let name = &package_metadata.name;
            let _span = debug_span!("package", %name).entered();
            if let PackageFilter::Explicit(ref include_names) = package_filter {
                if !include_names.contains(name) {
                    continue;
                }
            }
            let manifest_path = &package_metadata.manifest_path;
            let relative_manifest_path = manifest_path
                .strip_prefix(&self.dir)
                .map_err(|_| {
                    anyhow!(
                        "manifest path {manifest_path:?} for package {name:?} is not within the \
                         detected source root {dir:?}",
                        dir = self.dir
                    )
                })?
                .to_owned();
            packages.push(Arc::new(Package {
                name: package_metadata.name.clone(),
                relative_manifest_path,
                top_sources: direct_package_sources(&self.dir, package_metadata)?,
            }));
        }
        if let PackageFilter::Explicit(ref names) = package_filter {
            for wanted in names {
                if !packages.iter().any(|found| found.name == *wanted) {
                    warn!("package {wanted:?} not found in source tree");
                }
            }
        }
        Ok(packages)
    }

    /// Discover every gremlin in the filtered packages, walking `mod`
    /// declarations outward from each package's top-level source files.
    pub fn discover(&self, package_filter: &PackageFilter) -> Result<Catalogue> {
        let packages = self.packages(package_filter)?;
        let mut top_sources = Vec::new();
        for package in &packages {
            for source in &package.top_sources {
                top_sources.push((source.clone(), Arc::clone(package)));
            }
        }
        let source_files = discover_source_files(&self.dir, &top_sources)?;
        Catalogue::build(source_files)
    }
}

/// Find the source files named by the `path` of targets in a package's
/// manifest that should be tested: library and binary targets.
fn direct_package_sources(
    workspace_root: &Utf8Path,
    package_metadata: &cargo_metadata::Package,
) -> Result<Vec<Utf8PathBuf>> {
    let mut found = Vec::new();
    let pkg_dir = package_metadata.manifest_path.parent().unwrap();
    for target in &package_metadata.targets {
        if should_mutate_target(target) {
            if let Ok(relpath) = target.src_path.strip_prefix(workspace_root).map(ToOwned::to_owned) {
                debug!("found source target {} of kind {:?}", relpath, target.kind);
                found.push(relpath);
            } else {
                warn!("{:?} is not in {:?}", target.src_path, pkg_dir);
            }
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn should_mutate_target(target: &cargo_metadata::Target) -> bool {
    target.kind.iter().any(|k| k.ends_with("lib") || k == "bin")
}

/// Return the path of the workspace or package directory enclosing `path`.
fn locate_project(path: &Utf8Path, workspace: bool) -> Result<Utf8PathBuf> {
    ensure!(path.is_dir(), "{path:?} is not a directory");
    let mut argv: Vec<&str> = vec!["cargo", "locate-project"];
    if workspace {
        argv.push("--workspace");
    }
    let stdout = get_command_output(&argv, path)
        .with_context(|| format!("run cargo locate-project in {path:?}"))?;
    let val: Value = serde_json::from_str(&stdout).context("parse cargo locate-project output")?;
    let cargo_toml_path: Utf8PathBuf = val["root"]
        .as_str()
        .with_context(|| format!("cargo locate-project output has no root: {stdout:?}"))?
        .to_owned()
        .into();
    debug!(?cargo_toml_path, "found project manifest");
    ensure!(cargo_toml_path.is_file(), "cargo locate-project root {cargo_toml_path:?} is not a file");
    let root = cargo_toml_path
        .parent()
        .ok_or_else(|| anyhow!("cargo locate-project root {cargo_toml_path:?} has no parent"))?
        .to_owned();
    ensure!(root.is_dir(), "apparent project root directory {root:?} is not a directory");
    Ok(root)
}

#[cfg(test)]
mod test {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn error_opening_outside_of_crate() {
        Workspace::open("/").unwrap_err();
    }

    #[test]
    fn open_subdirectory_of_crate_opens_the_crate() {
        let workspace = Workspace::open("testdata/small_well_tested/src")
            .expect("open source tree from subdirectory");
        let root = &workspace.dir;
        assert!(root.is_dir());
        assert!(root.join("Cargo.toml").is_file());
        assert_eq!(root.file_name().unwrap(), OsStr::new("small_well_tested"));
    }

    #[test]
    fn packages_lists_the_single_package() {
        let workspace = Workspace::open("testdata/small_well_tested").unwrap();
        let packages = workspace.packages(&PackageFilter::All).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].top_sources, vec![Utf8PathBuf::from("src/lib.rs")]);
    }

    #[test]
    fn discover_finds_gremlins_in_a_single_file_tree() {
        let workspace = Workspace::open("testdata/boundary").unwrap();
        let catalogue = workspace.discover(&PackageFilter::All).unwrap();
        assert!(!catalogue.is_empty());
    }
}
