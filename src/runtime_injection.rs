//! A small module injected into the instrumented copy of the tree, giving
//! every mutation point a way to check whether it's the active gremlin and to
//! record that it was reached, without requiring a crate of its own.

use anyhow::Context;
use camino::Utf8Path;

use crate::package::Package;
use crate::Result;

/// Name of the module injected into each package's top-level source files.
pub const MODULE_NAME: &str = "__gremlins_runtime";

/// Environment variable read to decide which gremlin, if any, is active in this process.
pub const ACTIVE_GREMLIN_VAR: &str = "ACTIVE_GREMLIN";

/// Environment variable naming a file that mutation points should record their id into,
/// while building the coverage map.
pub const COVERAGE_SINK_VAR: &str = "GREMLINS_COVERAGE_SINK";

fn module_source() -> String {
    format!(
        r#"// Generated by the gremlin instrumenter. Do not edit; it's overwritten on every run.
pub const ACTIVE_GREMLIN_VAR: &str = {active_var:?};
const COVERAGE_SINK_VAR: &str = {sink_var:?};

static SEEN: ::std::sync::OnceLock<::std::sync::Mutex<::std::collections::HashSet<&'static str>>> =
    ::std::sync::OnceLock::new();

/// Record that a mutation point was reached during this process.
pub fn touch(id: &'static str) {{
    let Ok(path) = ::std::env::var(COVERAGE_SINK_VAR) else {{ return }};
    let mut seen = SEEN
        .get_or_init(|| ::std::sync::Mutex::new(::std::collections::HashSet::new()))
        .lock()
        .unwrap();
    if !seen.insert(id) {{
        return;
    }}
    if let Ok(mut file) = ::std::fs::OpenOptions::new().create(true).append(true).open(path) {{
        use ::std::io::Write;
        let _ = writeln!(file, "{{id}}");
    }}
}}
"#,
        active_var = ACTIVE_GREMLIN_VAR,
        sink_var = COVERAGE_SINK_VAR,
    )
}

/// Write the runtime module into the instrumented copy of the tree, and
/// prepend `mod __gremlins_runtime;` to every package's top-level source files.
///
/// `mod` declarations in a crate root resolve relative to that file's own
/// directory, so the module is written alongside each distinct directory a
/// top-level source file lives in (normally just `src/`).
pub fn inject(build_dir: &Utf8Path, packages: &[std::sync::Arc<Package>]) -> Result<()> {
    let source = module_source();
    for package in packages {
        let mut written_dirs = std::collections::HashSet::new();
        for top_source in &package.top_sources {
            let path = build_dir.join(top_source);
            if let Some(dir) = path.parent() {
                if written_dirs.insert(dir.to_owned()) {
                    let module_path = dir.join(format!("{MODULE_NAME}.rs"));
                    std::fs::write(&module_path, &source)
                        .with_context(|| format!("failed to write {module_path}"))?;
                }
            }
            let existing = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {path}"))?;
            if existing.contains(&format!("mod {MODULE_NAME}")) {
                continue;
            }
            let patched = format!("mod {MODULE_NAME};\n{existing}");
            std::fs::write(&path, patched).with_context(|| format!("failed to write {path}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn module_source_declares_touch() {
        assert!(module_source().contains("pub fn touch"));
        assert!(module_source().contains("ACTIVE_GREMLIN"));
    }

    #[test]
    fn inject_writes_runtime_module_and_patches_top_sources() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir_all(build_dir.join("src")).unwrap();
        std::fs::write(build_dir.join("src/lib.rs"), "pub fn a() {}\n").unwrap();
        let package = std::sync::Arc::new(Package {
            name: "demo".to_owned(),
            relative_manifest_path: "Cargo.toml".into(),
            top_sources: vec!["src/lib.rs".into()],
        });
        inject(build_dir, &[package]).unwrap();
        assert!(build_dir.join(format!("{MODULE_NAME}.rs")).is_file());
        let patched = std::fs::read_to_string(build_dir.join("src/lib.rs")).unwrap();
        assert!(patched.contains(&format!("mod {MODULE_NAME}")));
        assert!(patched.contains("pub fn a() {}"));
    }
}
