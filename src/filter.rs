//! Filter and exclude gremlins by name.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use camino::Utf8PathBuf;
use regex::Regex;
use tracing::{trace, warn};

use crate::gremlin::Gremlin;

/* When filtering by name, we match the filename and the function name, and the description
 * of the gremlin ("replace >= with >"), but not the line/column because they might easily
 * change as the tree is edited.
 *
 * First, pull all the names into a filter struct, that groups them by filename and function,
 * and then within that a list of descriptions.
 */

/// A filter that can match gremlins from a list, matching on filename, function name, and
/// description and ignoring line/column.
///
/// The filter can be applied as either an include or exclude filter.
#[derive(Debug, Default)]
pub struct NameFilter {
    /// Map from (path, function) to a list of descriptions.
    by_file: HashMap<(Utf8PathBuf, Option<String>), HashSet<String>>,
}

impl NameFilter {
    pub fn matches(&self, gremlin: &Gremlin) -> bool {
        self.by_file
            .get(&(
                gremlin.source_file.tree_relative_path().to_owned(),
                gremlin.function.as_ref().map(|f| f.function_name.clone()),
            ))
            .map(|descriptions| descriptions.contains(&gremlin.describe_change()))
            .unwrap_or(false)
    }
}

impl<S> FromIterator<S> for NameFilter
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = NameFilter::default();
        for line in iter.into_iter() {
            if let Some((path, function, description)) = parse_line(line.as_ref()) {
                filter
                    .by_file
                    .entry((path, function))
                    .or_default()
                    .insert(description);
            }
        }
        filter
    }
}

/// Parse a line into a filter entry.
///
/// The line is like: `src/lib.rs:10:5: replace >= with > in is_adult`,
/// or the line, line&col, or function name can be omitted.
///
/// Returns None and emits a warning if the line can't be parsed.
fn parse_line(line: &str) -> Option<(Utf8PathBuf, Option<String>, String)> {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    let line_re =
        LINE_RE.get_or_init(|| Regex::new(r#"^([^:]+)(?::\d+)?(?::\d+)?: (.+?)(?: in (.+))?$"#).unwrap());
    if let Some(captures) = line_re.captures(line) {
        trace!(?captures, ?line, "parse name filter line");
        let path: Utf8PathBuf = captures.get(1)?.as_str().into();
        let description = captures.get(2)?.as_str().to_string();
        let function = captures.get(3).map(|m| m.as_str().to_string());
        Some((path, function, description))
    } else {
        warn!(
            ?line,
            "Can't parse line as \"FILE:LINE:COL: DESCRIPTION in FUNCTION\""
        );
        None
    }
}

#[cfg(test)]
mod test {
    use super::parse_line;

    #[test]
    fn parse_line_without_line_col_or_function() {
        let line = "src/lib.rs: replace >= with >";
        assert_eq!(
            parse_line(line),
            Some(("src/lib.rs".into(), None, "replace >= with >".into()))
        );
    }

    #[test]
    fn parse_line_with_line_col_without_function() {
        let line = "src/lib.rs:123:45: replace >= with >";
        assert_eq!(
            parse_line(line),
            Some(("src/lib.rs".into(), None, "replace >= with >".into()))
        );
    }

    #[test]
    fn parse_line_with_function() {
        let line = "src/lib.rs:102:1: replace >= with > in is_adult";
        assert_eq!(
            parse_line(line),
            Some((
                "src/lib.rs".into(),
                Some("is_adult".into()),
                "replace >= with >".into()
            ))
        );
    }
}
