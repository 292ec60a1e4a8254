//! Rewrite source text so that each gremlin's mutation is reachable behind a
//! single runtime activation check, instead of needing a rebuild per gremlin.

use crate::gremlin::Gremlin;
use crate::runtime_injection::MODULE_NAME;
use crate::span::Span;

/// Rewrite `code` so that every gremlin in `gremlins` (which must all belong
/// to the same file) is reachable through a runtime check of the active
/// gremlin id, while the unmutated behavior is preserved when no gremlin, or
/// a different one, is active.
///
/// Each mutation point is an expression, so it's rewritten in place to:
/// ```ignore
/// {
///     crate::__gremlins_runtime::touch("g007");
///     match ::std::env::var(crate::__gremlins_runtime::ACTIVE_GREMLIN_VAR) {
///         Ok(ref __id) if __id == "g007" => { <replacement> },
///         _ => { <original> },
///     }
/// }
/// ```
/// This preserves the grammatical category (still an expression) and never
/// introduces a binding that could collide with surrounding code. The
/// unconditional `touch` call is also how the coverage map is built: running
/// the instrumented tests once, with no gremlin active, records which tests
/// reach which mutation points.
///
/// Gremlins that share an exact span (for example the two variants of a
/// single comparison operator) are merged into one dispatch block with one
/// `touch` call and one match arm each, rather than rewritten independently:
/// rewriting the same span twice, using coordinates computed against the
/// unmutated text, would corrupt the second replacement.
pub fn instrument_source(code: &str, gremlins: &[&Gremlin]) -> String {
    let mut groups: Vec<(Span, Vec<&Gremlin>)> = Vec::new();
    for &gremlin in gremlins {
        match groups.iter_mut().find(|(span, _)| *span == gremlin.span) {
            Some((_, group)) => group.push(gremlin),
            None => groups.push((gremlin.span, vec![gremlin])),
        }
    }
    groups.sort_by(|a, b| {
        (b.0.start.line, b.0.start.column).cmp(&(a.0.start.line, a.0.start.column))
    });
    let mut code = code.to_owned();
    for (span, group) in groups {
        code = span.replace(&code, &dispatch_block(&group));
    }
    code
}

/// The merged dispatch block for every gremlin sharing one span. All
/// gremlins in `group` were found at the same node, so they share the same
/// original text.
fn dispatch_block(group: &[&Gremlin]) -> String {
    let touches: String = group
        .iter()
        .map(|g| format!("crate::{module}::touch({id:?}); ", module = MODULE_NAME, id = g.id))
        .collect();
    let arms: String = group
        .iter()
        .map(|g| {
            format!(
                "Ok(ref __gremlin_active) if __gremlin_active == {id:?} => {{ {replacement} }}, ",
                id = g.id,
                replacement = g.replacement_text,
            )
        })
        .collect();
    let original = &group[0].original_text;
    format!(
        "{{ {touches}match ::std::env::var(crate::{module}::ACTIVE_GREMLIN_VAR) {{ {arms}_ => {{ {original} }} }} }}",
        module = MODULE_NAME,
    )
}
