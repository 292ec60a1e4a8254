//! The arithmetic operator: swap `+`/`-` and `*`/`/`, and replace `%` with `*`.

use syn::BinOp;

pub fn mutate(op: &BinOp) -> Option<(BinOp, &'static str)> {
    match op {
        BinOp::Add(_) => Some((BinOp::Sub(Default::default()), "-")),
        BinOp::Sub(_) => Some((BinOp::Add(Default::default()), "+")),
        BinOp::Mul(_) => Some((BinOp::Div(Default::default()), "/")),
        BinOp::Div(_) => Some((BinOp::Mul(Default::default()), "*")),
        BinOp::Rem(_) => Some((BinOp::Mul(Default::default()), "*")),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quote::ToTokens;

    #[test]
    fn add_becomes_sub() {
        let op: BinOp = syn::parse_quote!(+);
        let (replacement, desc) = mutate(&op).unwrap();
        assert_eq!(replacement.to_token_stream().to_string(), "-");
        assert_eq!(desc, "-");
    }

    #[test]
    fn mul_becomes_div() {
        let op: BinOp = syn::parse_quote!(*);
        let (replacement, desc) = mutate(&op).unwrap();
        assert_eq!(replacement.to_token_stream().to_string(), "/");
        assert_eq!(desc, "/");
    }

    #[test]
    fn rem_becomes_mul() {
        let op: BinOp = syn::parse_quote!(%);
        let (replacement, desc) = mutate(&op).unwrap();
        assert_eq!(replacement.to_token_stream().to_string(), "*");
        assert_eq!(desc, "*");
    }

    #[test]
    fn comparison_is_not_arithmetic() {
        let op: BinOp = syn::parse_quote!(==);
        assert!(mutate(&op).is_none());
    }
}
