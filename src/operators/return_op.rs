//! The return operator: replace the value produced by a function with a
//! simple "empty" stand-in of the same type, or flip a boolean result.
//!
//! Unlike the binary operators, this one looks at the *type* returned by the
//! enclosing function rather than at the expression being mutated, since the
//! replacement has to type-check regardless of what the original expression
//! computed.

use syn::{ReturnType, Type};

use crate::pretty::ToPrettyString;

/// One candidate replacement for a function's return value.
pub struct ReturnReplacement {
    /// Source text of the replacement expression.
    pub replacement: String,
    /// Short human description, e.g. `"true"` or `"Default::default()"`.
    pub description: String,
}

/// Candidate replacements for a function whose declared return type is `return_type`.
///
/// Returns an empty vec for functions with no return type (`-> ()`), since
/// there's nothing meaningful to swap.
pub fn replacements_for_return_type(return_type: &ReturnType) -> Vec<ReturnReplacement> {
    let ty = match return_type {
        ReturnType::Default => return Vec::new(),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    let rendered = ty.to_pretty_string();
    if let Some(replacements) = well_known_replacements(ty, &rendered) {
        replacements
    } else {
        vec![simple(generic_fallback(&rendered))]
    }
}

fn simple(replacement: impl Into<String>) -> ReturnReplacement {
    let replacement = replacement.into();
    ReturnReplacement {
        description: replacement.clone(),
        replacement,
    }
}

fn well_known_replacements(ty: &Type, rendered: &str) -> Option<Vec<ReturnReplacement>> {
    match rendered {
        "bool" => Some(vec![simple("true"), simple("false")]),
        "String" => Some(vec![simple("String::new()")]),
        "& str" | "&str" | "& 'static str" => Some(vec![simple("\"\"")]),
        "char" => Some(vec![simple("' '")]),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some(vec![simple("0")]),
        "f32" | "f64" => Some(vec![simple("0.0")]),
        _ => {
            if rendered.starts_with("Option <") || rendered.starts_with("Option<") {
                Some(vec![simple("None")])
            } else if rendered.starts_with("Vec <") || rendered.starts_with("Vec<") {
                Some(vec![simple("vec![]")])
            } else if rendered.starts_with("Result <") || rendered.starts_with("Result<") {
                Some(vec![simple("Ok(Default::default())")])
            } else if matches!(ty, Type::Reference(_)) {
                None
            } else {
                None
            }
        }
    }
}

fn generic_fallback(rendered: &str) -> String {
    let _ = rendered;
    "Default::default()".to_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn return_type_of(src: &str) -> ReturnType {
        let item: syn::ItemFn = syn::parse_str(src).unwrap();
        item.sig.output
    }

    #[test]
    fn unit_return_has_no_replacements() {
        let rt = return_type_of("fn f() {}");
        assert!(replacements_for_return_type(&rt).is_empty());
    }

    #[test]
    fn bool_return_flips_both_ways() {
        let rt = return_type_of("fn f() -> bool { true }");
        let replacements: Vec<_> = replacements_for_return_type(&rt)
            .into_iter()
            .map(|r| r.replacement)
            .collect();
        assert_eq!(replacements, vec!["true".to_owned(), "false".to_owned()]);
    }

    #[test]
    fn numeric_return_becomes_zero() {
        let rt = return_type_of("fn f() -> u32 { 1 }");
        let replacements = replacements_for_return_type(&rt);
        assert_eq!(replacements.len(), 1);
        assert_eq!(replacements[0].replacement, "0");
    }

    #[test]
    fn option_return_becomes_none() {
        let rt = return_type_of("fn f() -> Option<u32> { None }");
        let replacements = replacements_for_return_type(&rt);
        assert_eq!(replacements[0].replacement, "None");
    }

    #[test]
    fn unknown_return_falls_back_to_default() {
        let rt = return_type_of("fn f() -> MyStruct { todo!() }");
        let replacements = replacements_for_return_type(&rt);
        assert_eq!(replacements[0].replacement, "Default::default()");
    }
}
