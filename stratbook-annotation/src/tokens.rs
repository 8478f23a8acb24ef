//! Body tokenization
//!
//! Node bodies are free-form text, so "is this digit run a reference?" is answered by a lexer
//! rather than by substring search. Two lexers are provided, one per [`TokenBoundary`]:
//!
//!     lexical   Words (`de_dust2`, `3rd`) and signed numbers (`-45`) are atomic tokens, and an
//!               integer that is part of a decimal literal (`123.5`, `1.2.3`) is skipped. Only a
//!               bare, unsigned integer is a candidate.
//!     digit     Any maximal run of ASCII digits is a candidate, whatever surrounds it.
//!
//! Both lexers cover every input character, so the spans they return can be spliced back
//! together into the original text.

use logos::Logos;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which digit runs count as whole tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenBoundary {
    #[default]
    Lexical,
    Digit,
}

impl TokenBoundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenBoundary::Lexical => "lexical",
            TokenBoundary::Digit => "digit",
        }
    }
}

impl fmt::Display for TokenBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexical" => Ok(TokenBoundary::Lexical),
            "digit" => Ok(TokenBoundary::Digit),
            other => Err(format!(
                "unknown token boundary '{}' (expected 'lexical' or 'digit')",
                other
            )),
        }
    }
}

/// Tokens of a body under [`TokenBoundary::Lexical`]
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BodyToken {
    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"-[0-9]+")]
    Signed,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    #[regex(r"[0-9]+[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    // Anything else, one character at a time
    #[regex(r"[^A-Za-z0-9_]")]
    Other,
}

/// Tokens of a body under [`TokenBoundary::Digit`]
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DigitToken {
    #[regex(r"[0-9]+")]
    Digits,

    #[regex(r"[^0-9]+")]
    Other,
}

/// Byte spans of the digit runs in `source` that are candidate identifier references.
pub fn integer_spans(source: &str, boundary: TokenBoundary) -> Vec<logos::Span> {
    match boundary {
        TokenBoundary::Lexical => BodyToken::lexer(source)
            .spanned()
            .filter(|(token, _)| matches!(token, Ok(BodyToken::Integer)))
            .map(|(_, span)| span)
            .filter(|span| !is_fraction_part(source, span))
            .collect(),
        TokenBoundary::Digit => DigitToken::lexer(source)
            .spanned()
            .filter(|(token, _)| matches!(token, Ok(DigitToken::Digits)))
            .map(|(_, span)| span)
            .collect(),
    }
}

/// True if the integer at `span` sits next to a `.` that joins it to another digit run, or follows
/// a `.` that starts a decimal such as `.5`.
fn is_fraction_part(source: &str, span: &logos::Span) -> bool {
    let bytes = source.as_bytes();
    let before = span.start >= 1
        && bytes[span.start - 1] == b'.'
        && match span.start.checked_sub(2).map(|i| bytes[i]) {
            Some(prev) => prev.is_ascii_digit() || !(prev.is_ascii_alphanumeric() || prev == b'_'),
            None => true,
        };
    let after = bytes.get(span.end) == Some(&b'.')
        && bytes.get(span.end + 1).is_some_and(u8::is_ascii_digit);
    before || after
}
