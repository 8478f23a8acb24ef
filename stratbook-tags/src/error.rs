//! Error type for the annotation library

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from scanning, reading or writing the annotation library.
#[derive(Debug)]
pub enum TagError {
    /// A file could not be read or written
    Io { path: PathBuf, source: io::Error },
    /// A tag file is not valid JSON for its shape
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A directory could not be scanned
    Scan { path: PathBuf, message: String },
}

impl TagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TagError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TagError::Json {
            path: path.into(),
            source,
        }
    }

    /// The file or directory the error is about
    pub fn path(&self) -> &PathBuf {
        match self {
            TagError::Io { path, .. }
            | TagError::Json { path, .. }
            | TagError::Scan { path, .. } => path,
        }
    }
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            TagError::Json { path, source } => {
                write!(f, "Invalid tag file {}: {}", path.display(), source)
            }
            TagError::Scan { path, message } => {
                write!(f, "Cannot scan {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::Io { source, .. } => Some(source),
            TagError::Json { source, .. } => Some(source),
            TagError::Scan { .. } => None,
        }
    }
}
