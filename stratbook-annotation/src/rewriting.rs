//! Reference rewriting
//!
//! A body may restate identifiers of its own document inside unrelated-looking fields. Rewriting
//! walks the candidate integer tokens of the body once (see [`tokens`](crate::tokens)), looks each
//! one up in the document's [`IdentifierMap`] and splices in the new value. Because every token is
//! looked up by its original text exactly once, the result does not depend on the order of the
//! map entries, and an identifier that was just written is never visited again.
//!
//! A token is only a reference when its text is the canonical spelling of the number: `007` is
//! left alone even if `7` is mapped.

use crate::allocation::IdentifierMap;
use crate::tokens::{integer_spans, TokenBoundary};

/// Rewrite the references in `body` with the default [`TokenBoundary::Lexical`] rule.
pub fn rewrite(body: &str, map: &IdentifierMap) -> String {
    rewrite_with(body, map, TokenBoundary::Lexical)
}

/// Rewrite the references in `body` through `map`, recognizing tokens under `boundary`.
pub fn rewrite_with(body: &str, map: &IdentifierMap, boundary: TokenBoundary) -> String {
    if map.is_identity() {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len());
    let mut copied = 0;

    for span in integer_spans(body, boundary) {
        let Some(new) = resolve(&body[span.clone()], map) else {
            continue;
        };
        out.push_str(&body[copied..span.start]);
        out.push_str(&new.to_string());
        copied = span.end;
    }

    out.push_str(&body[copied..]);
    out
}

/// New identifier for a token, if the token is a canonical old identifier in `map`.
fn resolve(token: &str, map: &IdentifierMap) -> Option<u64> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse::<u64>().ok().and_then(|old| map.get(old))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(u64, u64)]) -> IdentifierMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn rewrites_self_reference() {
        assert_eq!(rewrite("seeAlso=0", &map(&[(0, 3)])), "seeAlso=3");
    }

    #[test]
    fn identity_map_leaves_body_alone() {
        assert_eq!(rewrite("seeAlso=0", &map(&[(0, 0)])), "seeAlso=0");
    }

    #[test]
    fn never_touches_part_of_a_larger_number() {
        let m = map(&[(5, 9), (45, 99)]);
        assert_eq!(rewrite("12345", &m), "12345");
        assert_eq!(rewrite_with("12345", &m, TokenBoundary::Digit), "12345");
    }

    #[test]
    fn swaps_are_simultaneous() {
        // 1 -> 2 and 2 -> 1 must not compound into 1 -> 2 -> 1
        let m = map(&[(1, 2), (2, 1)]);
        assert_eq!(rewrite("a=1 b=2", &m), "a=2 b=1");
    }

    #[test]
    fn chains_are_not_followed() {
        let m = map(&[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(rewrite("[0, 1, 2]", &m), "[1, 2, 3]");
    }

    #[test]
    fn unmapped_numbers_are_kept() {
        let m = map(&[(0, 10)]);
        assert_eq!(rewrite("next=0 count=4", &m), "next=10 count=4");
    }

    #[test]
    fn leading_zeros_are_not_references() {
        let m = map(&[(7, 1)]);
        assert_eq!(rewrite("a=007 b=7", &m), "a=007 b=1");
    }

    #[test]
    fn lexical_rule_protects_words_and_decimals() {
        let m = map(&[(2, 40), (5, 50)]);
        let body = r#" Map = "de_dust2" Pos = [ 12.5, -5 ] Link = 5"#;
        assert_eq!(rewrite(body, &m), r#" Map = "de_dust2" Pos = [ 12.5, -5 ] Link = 50"#);
    }

    #[test]
    fn leading_dot_decimals_are_not_references() {
        let m = map(&[(5, 9)]);
        assert_eq!(rewrite("Scale = .5 Pos = 1.5", &m), "Scale = .5 Pos = 1.5");
        assert_eq!(rewrite("Scale = .5 Link = 5", &m), "Scale = .5 Link = 9");
    }

    #[test]
    fn digit_rule_rewrites_every_whole_run() {
        let m = map(&[(2, 40)]);
        assert_eq!(
            rewrite_with("node2 = 2", &m, TokenBoundary::Digit),
            "node40 = 40"
        );
        assert_eq!(rewrite("node2 = 2", &m), "node2 = 40");
    }

    #[test]
    fn empty_body() {
        assert_eq!(rewrite("", &map(&[(0, 1)])), "");
    }
}
