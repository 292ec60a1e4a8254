//! Walk a parsed source file and discover every point a gremln operator can attach to.

use std::sync::Arc;

use syn::visit::{self, Visit};
use syn::{Block, ImplItemFn, ItemFn, ReturnType, Stmt, TraitItemFn};
use tracing::debug;

use crate::ast::attrs_excluded;
use crate::gremlin::Function;
use crate::operator::Genre;
use crate::operators::{arithmetic, boolean, boundary, comparison, return_op};
use crate::pretty::ToPrettyString;
use crate::source::SourceFile;
use crate::span::Span;
use crate::Result;

/// One candidate mutation found in a file, before a stable id has been assigned.
pub struct Candidate {
    pub source_file: Arc<SourceFile>,
    pub function: Option<Arc<Function>>,
    pub span: Span,
    pub genre: Genre,
    pub original_text: String,
    pub replacement_text: String,
}

/// Parse `source_file` and return every candidate mutation in it, in
/// pre-order discovery order: for each node, in the fixed operator priority
/// order, before descending into its children. A single node can contribute
/// candidates from more than one operator, and an operator can contribute
/// more than one variant.
pub fn find_candidates(source_file: &Arc<SourceFile>) -> Result<Vec<Candidate>> {
    let parsed: syn::File = syn::parse_str(source_file.code())?;
    let mut visitor = DiscoveryVisitor {
        source_file: Arc::clone(source_file),
        current_function: None,
        candidates: Vec::new(),
    };
    visitor.visit_file(&parsed);
    Ok(visitor.candidates)
}

struct DiscoveryVisitor {
    source_file: Arc<SourceFile>,
    current_function: Option<Arc<Function>>,
    candidates: Vec<Candidate>,
}

impl DiscoveryVisitor {
    fn push(&mut self, span: Span, genre: Genre, original_text: impl Into<String>, replacement_text: impl Into<String>) {
        self.candidates.push(Candidate {
            source_file: Arc::clone(&self.source_file),
            function: self.current_function.clone(),
            span,
            genre,
            original_text: original_text.into(),
            replacement_text: replacement_text.into(),
        });
    }

    fn enter_function(&mut self, name: String, return_type: &ReturnType, span: Span) -> Option<Arc<Function>> {
        let previous = self.current_function.take();
        self.current_function = Some(Arc::new(Function {
            function_name: name,
            return_type: return_type.clone(),
            span,
        }));
        previous
    }

    fn leave_function(&mut self, previous: Option<Arc<Function>>) {
        self.current_function = previous;
    }

    /// Offer the return operator a mutation at the function's tail expression,
    /// if the block ends in an expression with no trailing semicolon.
    fn visit_tail_expression(&mut self, block: &Block) {
        let Some(Stmt::Expr(expr, None)) = block.stmts.last() else {
            return;
        };
        let Some(function) = self.current_function.clone() else {
            return;
        };
        self.offer_return_replacements(expr, &function.return_type);
    }

    fn offer_return_replacements(&mut self, expr: &syn::Expr, return_type: &ReturnType) {
        let span: Span = expr.to_pretty_span();
        let original = expr.to_pretty_string();
        for candidate in return_op::replacements_for_return_type(return_type) {
            if candidate.replacement == original {
                continue;
            }
            self.push(span, Genre::Return, original.clone(), candidate.replacement);
        }
    }

    /// Offer the boundary operator a mutation at `expr`, if it's an integer
    /// literal. Only called for the operands of a comparison.
    fn offer_boundary_replacements(&mut self, expr: &syn::Expr) {
        let replacements = boundary::mutate(expr);
        if replacements.is_empty() {
            return;
        }
        let span: Span = expr.to_pretty_span();
        let original = expr.to_pretty_string();
        for replacement in replacements {
            self.push(span, Genre::Boundary, original.clone(), replacement);
        }
    }
}

trait ToPrettySpan {
    fn to_pretty_span(&self) -> Span;
}

impl ToPrettySpan for syn::Expr {
    fn to_pretty_span(&self) -> Span {
        use syn::spanned::Spanned;
        self.span().into()
    }
}

impl<'ast> Visit<'ast> for DiscoveryVisitor {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        if attrs_excluded(&node.attrs) {
            debug!(name = %node.sig.ident, "skipping function");
            return;
        }
        let span: Span = {
            use syn::spanned::Spanned;
            node.block.brace_token.span.into()
        };
        let previous = self.enter_function(node.sig.ident.to_string(), &node.sig.output, span);
        self.visit_tail_expression(&node.block);
        visit::visit_item_fn(self, node);
        self.leave_function(previous);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        if attrs_excluded(&node.attrs) {
            debug!(name = %node.sig.ident, "skipping function");
            return;
        }
        let span: Span = {
            use syn::spanned::Spanned;
            node.block.brace_token.span.into()
        };
        let previous = self.enter_function(node.sig.ident.to_string(), &node.sig.output, span);
        self.visit_tail_expression(&node.block);
        visit::visit_impl_item_fn(self, node);
        self.leave_function(previous);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        if attrs_excluded(&node.attrs) {
            return;
        }
        if let Some(block) = &node.default {
            let span: Span = {
                use syn::spanned::Spanned;
                block.brace_token.span.into()
            };
            let previous = self.enter_function(node.sig.ident.to_string(), &node.sig.output, span);
            self.visit_tail_expression(block);
            visit::visit_trait_item_fn(self, node);
            self.leave_function(previous);
        }
    }

    fn visit_expr_return(&mut self, node: &'ast syn::ExprReturn) {
        if let (Some(expr), Some(function)) = (&node.expr, self.current_function.clone()) {
            self.offer_return_replacements(expr, &function.return_type);
        }
        visit::visit_expr_return(self, node);
    }

    fn visit_expr_binary(&mut self, node: &'ast syn::ExprBinary) {
        let span: Span = {
            use syn::spanned::Spanned;
            node.op.span().into()
        };
        let original = crate::pretty::tokens_to_pretty_string(&node.op);
        for (_, replacement) in comparison::mutate(&node.op) {
            self.push(span, Genre::Comparison, original.clone(), replacement);
        }
        if comparison::is_comparison(&node.op) {
            self.offer_boundary_replacements(&node.left);
            self.offer_boundary_replacements(&node.right);
        }
        if let Some((_, replacement)) = boolean::mutate_op(&node.op) {
            self.push(span, Genre::Boolean, original.clone(), replacement);
        }
        if let Some((_, replacement)) = arithmetic::mutate(&node.op) {
            self.push(span, Genre::Arithmetic, original, replacement);
        }
        visit::visit_expr_binary(self, node);
    }

    fn visit_expr_unary(&mut self, node: &'ast syn::ExprUnary) {
        if let Some(replacement) = boolean::mutate_not(node) {
            let span: Span = {
                use syn::spanned::Spanned;
                node.span().into()
            };
            let original = crate::pretty::tokens_to_pretty_string(node);
            self.push(span, Genre::Boolean, original, replacement);
        }
        visit::visit_expr_unary(self, node);
    }

    fn visit_expr_lit(&mut self, node: &'ast syn::ExprLit) {
        if let Some(replacement) = boolean::mutate_bool_literal(node) {
            let span: Span = {
                use syn::spanned::Spanned;
                node.span().into()
            };
            let original = crate::pretty::tokens_to_pretty_string(node);
            self.push(span, Genre::Boolean, original, replacement);
        }
        visit::visit_expr_lit(self, node);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn descriptions(code: &str) -> Vec<(Genre, String, String)> {
        let source_file = Arc::new(SourceFile::for_tests("src/lib.rs", code, "demo", true));
        find_candidates(&source_file)
            .unwrap()
            .into_iter()
            .map(|c| (c.genre, c.original_text, c.replacement_text))
            .collect()
    }

    #[test]
    fn a_comparison_node_yields_two_gremlins() {
        let found = descriptions("fn f(age: u32) -> bool {\n    age >= 18\n}\n");
        let comparisons: Vec<_> = found
            .iter()
            .filter(|(genre, ..)| *genre == Genre::Comparison)
            .collect();
        assert_eq!(comparisons.len(), 2);
    }

    #[test]
    fn a_boundary_literal_on_both_sides_of_a_comparison_is_offered() {
        let found = descriptions("fn f(age: u32) -> bool {\n    18 <= age\n}\n");
        let boundaries: Vec<_> = found
            .iter()
            .filter(|(genre, ..)| *genre == Genre::Boundary)
            .collect();
        assert_eq!(boundaries.len(), 2);
        assert!(boundaries.iter().any(|(_, _, r)| r == "17"));
        assert!(boundaries.iter().any(|(_, _, r)| r == "19"));
    }

    #[test]
    fn comparison_is_discovered_before_its_own_boundary_literal() {
        let found = descriptions("fn f(age: u32) -> bool {\n    age >= 18\n}\n");
        let first_boundary = found.iter().position(|(g, ..)| *g == Genre::Boundary).unwrap();
        let first_comparison = found.iter().position(|(g, ..)| *g == Genre::Comparison).unwrap();
        assert!(first_comparison < first_boundary);
    }

    #[test]
    fn not_and_bool_literal_are_found() {
        let found = descriptions("fn f(ready: bool) -> bool {\n    !ready || true\n}\n");
        assert!(found.iter().any(|(g, o, r)| *g == Genre::Boolean && o == "!ready" && r == "ready"));
        assert!(found.iter().any(|(g, o, r)| *g == Genre::Boolean && o == "true" && r == "false"));
    }

    #[test]
    fn arithmetic_operand_literals_are_not_boundaries() {
        let found = descriptions("fn f(a: i32) -> i32 {\n    a + 18\n}\n");
        assert!(!found.iter().any(|(g, ..)| *g == Genre::Boundary));
    }
}
