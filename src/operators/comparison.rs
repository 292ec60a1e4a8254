//! The comparison operator: mutate any of the six comparison operators.
//!
//! Equality and inequality (`==`, `!=`) each have a single negation. The four
//! ordering operators (`<`, `<=`, `>`, `>=`) each have two plausible
//! replacements: the sibling that shares its direction, and the one that
//! reverses it.

use syn::BinOp;

/// True if `op` is one of the six operators this operator covers.
pub fn is_comparison(op: &BinOp) -> bool {
    matches!(
        op,
        BinOp::Eq(_) | BinOp::Ne(_) | BinOp::Lt(_) | BinOp::Le(_) | BinOp::Gt(_) | BinOp::Ge(_)
    )
}

/// Every mutated variant of a comparison operator, each paired with a short
/// description of the replacement operator, in the order gremlin ids should
/// be assigned.
pub fn mutate(op: &BinOp) -> Vec<(BinOp, &'static str)> {
    match op {
        BinOp::Lt(_) => vec![(BinOp::Le(Default::default()), "<="), (BinOp::Gt(Default::default()), ">")],
        BinOp::Le(_) => vec![(BinOp::Lt(Default::default()), "<"), (BinOp::Gt(Default::default()), ">")],
        BinOp::Gt(_) => vec![(BinOp::Ge(Default::default()), ">="), (BinOp::Lt(Default::default()), "<")],
        BinOp::Ge(_) => vec![(BinOp::Gt(Default::default()), ">"), (BinOp::Lt(Default::default()), "<")],
        BinOp::Eq(_) => vec![(BinOp::Ne(Default::default()), "!=")],
        BinOp::Ne(_) => vec![(BinOp::Eq(Default::default()), "==")],
        _ => vec![],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quote::ToTokens;

    fn descriptions(op: &BinOp) -> Vec<&'static str> {
        mutate(op).into_iter().map(|(_, desc)| desc).collect()
    }

    #[test]
    fn eq_becomes_ne() {
        let op: BinOp = syn::parse_quote!(==);
        assert_eq!(descriptions(&op), vec!["!="]);
    }

    #[test]
    fn ne_becomes_eq() {
        let op: BinOp = syn::parse_quote!(!=);
        assert_eq!(descriptions(&op), vec!["=="]);
    }

    #[test]
    fn lt_produces_both_variants() {
        let op: BinOp = syn::parse_quote!(<);
        assert_eq!(descriptions(&op), vec!["<=", ">"]);
    }

    #[test]
    fn ge_produces_both_variants_in_order() {
        let op: BinOp = syn::parse_quote!(>=);
        let variants = mutate(&op);
        assert_eq!(variants[0].1, ">");
        assert_eq!(variants[1].1, "<");
        assert_eq!(variants[0].0.to_token_stream().to_string(), ">");
    }

    #[test]
    fn other_ops_are_not_comparisons() {
        let op: BinOp = syn::parse_quote!(+);
        assert!(mutate(&op).is_empty());
        assert!(!is_comparison(&op));
    }

    #[test]
    fn is_comparison_recognizes_all_six_operators() {
        for src in ["==", "!=", "<", "<=", ">", ">="] {
            let op: BinOp = syn::parse_str(src).unwrap();
            assert!(is_comparison(&op), "{src} should be a comparison");
        }
    }
}
