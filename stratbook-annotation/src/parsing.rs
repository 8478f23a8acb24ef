//! Document parser
//!
//! Splits raw annotation text into a preamble and node records. A record starts at an occurrence
//! of [`MARKER`] and runs up to the next occurrence or the end of the text; the digits directly
//! after the marker are the record's identifier and the rest is its body.
//!
//! The closing [`TERMINATOR`] is optional on input. When present (possibly followed by trailing
//! whitespace) it is removed before splitting, so it never ends up inside the last body.

use crate::document::{AnnotationDocument, AnnotationNode, MARKER, TERMINATOR};
use crate::error::{MalformedReason, ParseError};
use std::collections::HashSet;

/// Parse raw annotation text.
///
/// Fails with [`ParseError::MalformedRecord`] when a marker is not followed by a digit, when the
/// digits overflow a `u64`, or when two records in the text share an identifier.
pub fn parse(raw: &str) -> Result<AnnotationDocument, ParseError> {
    let content = strip_terminator(raw);
    let starts: Vec<usize> = content.match_indices(MARKER).map(|(at, _)| at).collect();

    let preamble_end = starts.first().copied().unwrap_or(content.len());
    let preamble = &content[..preamble_end];

    let mut nodes = Vec::with_capacity(starts.len());
    let mut seen = HashSet::with_capacity(starts.len());

    for (record, &start) in starts.iter().enumerate() {
        let end = starts.get(record + 1).copied().unwrap_or(content.len());
        let text = &content[start + MARKER.len()..end];
        let node =
            parse_record(text).map_err(|reason| ParseError::MalformedRecord { record, reason })?;

        if !seen.insert(node.identifier) {
            return Err(ParseError::MalformedRecord {
                record,
                reason: MalformedReason::DuplicateIdentifier(node.identifier),
            });
        }
        nodes.push(node);
    }

    Ok(AnnotationDocument::new(preamble, nodes))
}

/// Remove a single trailing terminator, if any. Text without one is returned untouched.
pub fn strip_terminator(raw: &str) -> &str {
    raw.trim_end().strip_suffix(TERMINATOR).unwrap_or(raw)
}

/// Split the text following a marker into identifier and body.
fn parse_record(text: &str) -> Result<AnnotationNode, MalformedReason> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(MalformedReason::MissingIdentifier);
    }
    let identifier = text[..digits]
        .parse::<u64>()
        .map_err(|_| MalformedReason::IdentifierOutOfRange)?;
    Ok(AnnotationNode::new(identifier, &text[digits..]))
}
