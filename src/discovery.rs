//! Walk `mod` declarations outward from each package's top-level source
//! files, to find every file that's actually part of the compiled tree.
//!
//! Cargo's metadata only names the entry point of each target (`src/lib.rs`,
//! `src/main.rs`, ...); everything else is reached by following `mod foo;`
//! declarations, the same way rustc itself resolves them.

use std::sync::Arc;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::package::Package;
use crate::source::SourceFile;
use crate::Result;

/// Starting from `top_sources`, follow every `mod foo;` declaration and
/// return every reachable source file, each paired with the package it
/// belongs to.
pub fn discover_source_files(
    tree_dir: &Utf8Path,
    top_sources: &[(Utf8PathBuf, Arc<Package>)],
) -> Result<Vec<Arc<SourceFile>>> {
    let mut found = Vec::new();
    for (relative_path, package) in top_sources {
        walk_from(tree_dir, relative_path, package, true, &mut found)?;
    }
    Ok(found)
}

fn walk_from(
    tree_dir: &Utf8Path,
    relative_path: &Utf8Path,
    package: &Arc<Package>,
    is_top: bool,
    found: &mut Vec<Arc<SourceFile>>,
) -> Result<()> {
    if found
        .iter()
        .any(|sf: &Arc<SourceFile>| sf.tree_relative_path() == relative_path)
    {
        return Ok(());
    }
    let Some(source_file) = SourceFile::load(tree_dir, relative_path, package, is_top)? else {
        return Ok(());
    };
    let source_file = Arc::new(source_file);
    let module_dir = module_search_dir(relative_path);
    let submodules = parse_mod_declarations(source_file.code())
        .with_context(|| format!("failed to parse {relative_path}"))?;
    found.push(source_file);
    for name in submodules {
        if let Some(child_path) = resolve_module_path(tree_dir, &module_dir, &name) {
            walk_from(tree_dir, &child_path, package, false, found)?;
        } else {
            warn!("could not resolve `mod {name};` declared in {relative_path}");
        }
    }
    Ok(())
}

/// The directory that a file's inline (non-`path`-attributed) submodules
/// live under: `src/foo.rs`'s submodules live under `src/foo/`, while
/// `src/lib.rs` and `src/foo/mod.rs` keep submodules alongside themselves.
fn module_search_dir(relative_path: &Utf8Path) -> Utf8PathBuf {
    let dir = relative_path.parent().unwrap_or_else(|| Utf8Path::new(""));
    let stem = relative_path.file_stem().unwrap_or_default();
    if stem == "lib" || stem == "main" || stem == "mod" {
        dir.to_owned()
    } else {
        dir.join(stem)
    }
}

fn resolve_module_path(tree_dir: &Utf8Path, module_dir: &Utf8Path, name: &str) -> Option<Utf8PathBuf> {
    for candidate in [module_dir.join(format!("{name}.rs")), module_dir.join(name).join("mod.rs")] {
        if tree_dir.join(&candidate).is_file() {
            debug!("resolved `mod {name};` to {candidate}");
            return Some(candidate);
        }
    }
    None
}

/// Parse `code` and return the name of every `mod foo;` declaration (a
/// module with no inline body, meaning it lives in another file).
fn parse_mod_declarations(code: &str) -> Result<Vec<String>> {
    let file = syn::parse_file(code)?;
    Ok(collect_mod_decls(&file.items))
}

fn collect_mod_decls(items: &[syn::Item]) -> Vec<String> {
    let mut names = Vec::new();
    for item in items {
        if let syn::Item::Mod(item_mod) = item {
            if item_mod.content.is_none() {
                names.push(item_mod.ident.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_external_mod_declarations_only() {
        let code = "mod outside;\nmod inline { fn f() {} }\n";
        assert_eq!(parse_mod_declarations(code).unwrap(), vec!["outside".to_owned()]);
    }

    #[test]
    fn module_search_dir_for_lib_root_is_its_own_directory() {
        assert_eq!(module_search_dir(Utf8Path::new("src/lib.rs")), Utf8PathBuf::from("src"));
    }

    #[test]
    fn module_search_dir_for_named_file_is_a_sibling_directory() {
        assert_eq!(
            module_search_dir(Utf8Path::new("src/foo.rs")),
            Utf8PathBuf::from("src/foo")
        );
    }

    #[test]
    fn discover_walks_nested_modules() {
        let dir = tempfile::tempdir().unwrap();
        let tree_dir = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir_all(tree_dir.join("src/nested")).unwrap();
        std::fs::write(tree_dir.join("src/lib.rs"), "mod nested;\n").unwrap();
        std::fs::write(
            tree_dir.join("src/nested/mod.rs"),
            "mod leaf;\n",
        )
        .unwrap();
        std::fs::write(tree_dir.join("src/nested/leaf.rs"), "pub fn f() {}\n").unwrap();
        let package = Arc::new(Package {
            name: "demo".to_owned(),
            relative_manifest_path: "Cargo.toml".into(),
            top_sources: vec!["src/lib.rs".into()],
        });
        let found = discover_source_files(tree_dir, &[("src/lib.rs".into(), package)]).unwrap();
        let mut paths: Vec<String> = found.iter().map(|sf| sf.tree_relative_slashes()).collect();
        paths.sort();
        assert_eq!(paths, vec!["src/lib.rs", "src/nested/leaf.rs", "src/nested/mod.rs"]);
    }
}
