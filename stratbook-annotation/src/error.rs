//! Error types for parsing and merging annotation files

use std::fmt;
use std::path::PathBuf;

/// Why a node record could not be turned into an [`AnnotationNode`](crate::AnnotationNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// No decimal digit directly follows the marker
    MissingIdentifier,
    /// The digit run does not fit in a `u64`
    IdentifierOutOfRange,
    /// Another record of the same document already uses this identifier
    DuplicateIdentifier(u64),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingIdentifier => write!(f, "no identifier after marker"),
            MalformedReason::IdentifierOutOfRange => write!(f, "identifier out of range"),
            MalformedReason::DuplicateIdentifier(id) => write!(f, "duplicate identifier {}", id),
        }
    }
}

/// Errors from the pure document parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Record `record` (zero-based, in file order) is not `marker + digits + body`
    MalformedRecord {
        record: usize,
        reason: MalformedReason,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedRecord { record, reason } => {
                write!(f, "Malformed record #{}: {}", record, reason)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that abort a merge. Every variant names the input or output at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// An input could not be read
    ReadFailure { path: PathBuf, message: String },
    /// An input contains a record the parser rejects
    MalformedRecord {
        input: String,
        record: usize,
        reason: MalformedReason,
    },
    /// Two nodes were assigned the same identifier. Indicates a defect in allocation.
    IdentifierCollision { identifier: u64 },
    /// Allocation ran past `u64::MAX`
    IdentifierOverflow { input: String },
    /// The destination could not be written
    WriteFailure { path: PathBuf, message: String },
}

impl MergeError {
    /// Attach the input name to a parser error.
    pub fn from_parse(input: impl Into<String>, err: ParseError) -> Self {
        match err {
            ParseError::MalformedRecord { record, reason } => MergeError::MalformedRecord {
                input: input.into(),
                record,
                reason,
            },
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::ReadFailure { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            MergeError::MalformedRecord {
                input,
                record,
                reason,
            } => write!(f, "Malformed record #{} in {}: {}", record, input, reason),
            MergeError::IdentifierCollision { identifier } => write!(
                f,
                "Internal error: identifier {} was assigned twice",
                identifier
            ),
            MergeError::IdentifierOverflow { input } => {
                write!(f, "Identifier space exhausted while allocating {}", input)
            }
            MergeError::WriteFailure { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for MergeError {}
