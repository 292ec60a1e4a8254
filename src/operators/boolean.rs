//! The boolean operator: swap `&&`/`||`, drop a leading `not`, and flip a
//! boolean literal.

use syn::{BinOp, ExprLit, ExprUnary, Lit, UnOp};

use crate::pretty::ToPrettyString;

/// If `op` is a logical and/or, return its swap and a short description.
pub fn mutate_op(op: &BinOp) -> Option<(BinOp, &'static str)> {
    match op {
        BinOp::And(_) => Some((BinOp::Or(Default::default()), "||")),
        BinOp::Or(_) => Some((BinOp::And(Default::default()), "&&")),
        _ => None,
    }
}

/// If `expr` negates its operand with `!`, return the text of the operand
/// with the negation dropped.
pub fn mutate_not(expr: &ExprUnary) -> Option<String> {
    matches!(expr.op, UnOp::Not(_)).then(|| expr.expr.to_pretty_string())
}

/// If `expr` is a boolean literal, return the text of its flip.
pub fn mutate_bool_literal(expr: &ExprLit) -> Option<&'static str> {
    match &expr.lit {
        Lit::Bool(b) if b.value => Some("false"),
        Lit::Bool(_) => Some("true"),
        _ => None,
    }
}
