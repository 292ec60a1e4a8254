//! A single gremlin: one mutation that can be unleashed on the source tree.

use std::fmt;
use std::sync::Arc;

use console::style;
use serde::Serialize;

use crate::operator::Genre;
use crate::source::SourceFile;
use crate::span::Span;

/// The function (if any) enclosing a gremlin's mutation point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    pub function_name: String,
    pub return_type: syn::ReturnType,
    pub span: Span,
}

/// A single gremlin: a proposed textual replacement at one span of one source file.
#[derive(Clone, Debug)]
pub struct Gremlin {
    /// Stable, dense, 1-based identifier, formatted like `g001`.
    pub id: String,

    pub source_file: Arc<SourceFile>,

    /// The function enclosing this mutation point, if any (e.g. not for a
    /// mutation inside a `const` initializer).
    pub function: Option<Arc<Function>>,

    /// The span of source text that is replaced.
    pub span: Span,

    /// The category of mutation.
    pub genre: Genre,

    /// The original text at `span`.
    pub original_text: String,

    /// The text that replaces `original_text`.
    pub replacement_text: String,
}

impl Gremlin {
    /// The package that owns the mutated file.
    pub fn package_name(&self) -> &str {
        &self.source_file.package.name
    }

    /// The source text with this gremlin's mutation applied.
    pub fn mutated_code(&self) -> String {
        self.span.replace(self.source_file.code(), &self.replacement_text)
    }

    /// A short description of the change, independent of file/line, suitable
    /// for matching against `--only`/`--skip` name filters.
    pub fn describe_change(&self) -> String {
        format!("replace {} with {}", self.original_text, self.replacement_text)
    }

    /// A stable basename for this gremlin's log file.
    pub fn log_file_name_base(&self) -> String {
        format!("{}_{}", self.id, self.genre.to_string().to_lowercase())
    }

    /// A one-line human description, optionally including file:line:col.
    pub fn name(&self, show_line_col: bool) -> String {
        let location = if show_line_col {
            format!(
                "{} ",
                self.source_file
                    .format_source_location(self.span.start.line, self.span.start.column)
            )
        } else {
            format!("{} ", self.source_file.tree_relative_slashes())
        };
        let in_function = self
            .function
            .as_ref()
            .map(|f| format!(" in {}", f.function_name))
            .unwrap_or_default();
        format!("{location}{}{in_function}", self.describe_change())
    }

    /// Render this gremlin's name with the changed text highlighted, for interactive output.
    pub fn to_styled_string(&self) -> String {
        format!(
            "{} replace {} with {}{}",
            self.source_file.format_source_location(self.span.start.line, self.span.start.column),
            style(&self.original_text).red(),
            style(&self.replacement_text).green(),
            self.function
                .as_ref()
                .map(|f| format!(" in {}", f.function_name))
                .unwrap_or_default(),
        )
    }
}

impl fmt::Display for Gremlin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(true))
    }
}

impl PartialEq for Gremlin {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Gremlin {}

/// A serializable summary of a gremlin, for JSON reports and `--list` output.
#[derive(Serialize)]
pub struct GremlinSummary {
    pub id: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub genre: Genre,
    pub function: Option<String>,
    pub description: String,
}

impl From<&Gremlin> for GremlinSummary {
    fn from(g: &Gremlin) -> Self {
        GremlinSummary {
            id: g.id.clone(),
            file: g.source_file.tree_relative_slashes(),
            line: g.span.start.line,
            column: g.span.start.column,
            genre: g.genre,
            function: g.function.as_ref().map(|f| f.function_name.clone()),
            description: g.describe_change(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_gremlin() -> Gremlin {
        let source_file = Arc::new(SourceFile::for_tests(
            "src/lib.rs",
            "fn is_adult(age: u32) -> bool {\n    age >= 18\n}\n",
            "demo",
            true,
        ));
        Gremlin {
            id: "g001".to_owned(),
            source_file,
            function: Some(Arc::new(Function {
                function_name: "is_adult".to_owned(),
                return_type: syn::parse_str("-> bool").unwrap(),
                span: Span::quad(1, 1, 3, 2),
            })),
            span: Span::quad(2, 9, 2, 11),
            genre: Genre::Comparison,
            original_text: ">=".to_owned(),
            replacement_text: ">".to_owned(),
        }
    }

    #[test]
    fn describe_change_format() {
        assert_eq!(test_gremlin().describe_change(), "replace >= with >");
    }

    #[test]
    fn mutated_code_applies_replacement() {
        let g = test_gremlin();
        assert_eq!(
            g.mutated_code(),
            "fn is_adult(age: u32) -> bool {\n    age > 18\n}\n"
        );
    }

    #[test]
    fn name_includes_function() {
        assert!(test_gremlin().name(false).contains("in is_adult"));
    }
}
