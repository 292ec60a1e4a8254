//! The catalog of mutation operators: the ways a gremlin can corrupt a piece of code.

use strum::{Display, EnumIter};

/// The category of change a gremlin makes.
///
/// Variants are declared in the fixed priority order used when more than one
/// operator could plausibly apply to the same syntax node: comparison
/// operators are considered first, then boundary, boolean, return, and
/// finally arithmetic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumIter, serde::Serialize)]
pub enum Genre {
    /// All six comparison operators: `==`, `!=`, `<`, `<=`, `>`, `>=`.
    Comparison,
    /// An integer literal appearing in a comparison, shifted by one.
    Boundary,
    /// `&&`/`||`, a leading `!`, and boolean literals.
    Boolean,
    /// The value produced by a `return` expression or a function's tail expression.
    Return,
    /// Arithmetic operators: `+`, `-`, `*`, `/`, `%`.
    Arithmetic,
}

impl Genre {
    /// The fixed priority order in which operators are tried, lowest first.
    pub const PRIORITY_ORDER: [Genre; 5] = [
        Genre::Comparison,
        Genre::Boundary,
        Genre::Boolean,
        Genre::Return,
        Genre::Arithmetic,
    ];

    /// Relative priority, for sorting candidate mutations found at the same span.
    pub fn priority(&self) -> usize {
        Self::PRIORITY_ORDER
            .iter()
            .position(|g| g == self)
            .expect("every genre appears in PRIORITY_ORDER")
    }

    /// Relative severity used to rank survivors in reports.
    ///
    /// Mutations that change program logic (comparisons, booleans) indicate
    /// a more concerning test gap than ones that only nudge a numeric result.
    pub fn severity(&self) -> u8 {
        match self {
            Genre::Comparison | Genre::Boolean => 2,
            Genre::Boundary | Genre::Return => 1,
            Genre::Arithmetic => 0,
        }
    }
}
