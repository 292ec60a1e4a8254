//! The boundary operator: shift an integer literal appearing in a comparison
//! by one in each direction, the classic off-by-one a test suite should catch.
//!
//! Unlike the other binary-operator mutations, this one looks at an operand
//! rather than the operator itself, and only fires when the finder has
//! already established that the enclosing operator is a comparison.

use syn::{Expr, ExprLit, Lit, LitInt};

/// If `expr` is an integer literal, return its two boundary replacements, in
/// the order `n - 1` then `n + 1`, each rendered with the literal's own
/// suffix (so `18u32` mutates to `17u32` and `19u32`).
pub fn mutate(expr: &Expr) -> Vec<String> {
    let Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }) = expr else {
        return Vec::new();
    };
    neighbors(lit)
}

fn neighbors(lit: &LitInt) -> Vec<String> {
    let Ok(value) = lit.base10_parse::<i128>() else {
        return Vec::new();
    };
    let suffix = lit.suffix();
    [value.checked_sub(1), value.checked_add(1)]
        .into_iter()
        .flatten()
        .map(|n| format!("{n}{suffix}"))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn lit_expr(src: &str) -> Expr {
        syn::parse_str(src).unwrap()
    }

    #[test]
    fn literal_shifts_by_one_in_each_direction() {
        assert_eq!(mutate(&lit_expr("18")), vec!["17", "19"]);
    }

    #[test]
    fn suffix_is_preserved() {
        assert_eq!(mutate(&lit_expr("18u32")), vec!["17u32", "19u32"]);
    }

    #[test]
    fn non_literal_expression_has_no_boundary() {
        assert!(mutate(&lit_expr("age")).is_empty());
    }

    #[test]
    fn string_literal_is_not_a_boundary() {
        assert!(mutate(&lit_expr("\"18\"")).is_empty());
    }

    #[test]
    fn zero_shifts_in_both_directions() {
        assert_eq!(mutate(&lit_expr("0")), vec!["-1", "1"]);
    }
}
