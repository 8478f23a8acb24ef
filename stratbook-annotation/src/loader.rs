//! Document loading utilities
//!
//! `DocumentLoader` reads annotation text from a file or a string and parses it, attaching the
//! source name to any error so callers can report which input was at fault.
//!
//! # Example
//!
//! ```rust
//! use stratbook_annotation::DocumentLoader;
//!
//! let doc = DocumentLoader::from_path("smokes/window.txt")?.parse()?;
//! let doc = DocumentLoader::from_string("inline", "H\nMapAnnotationNode0x}").parse()?;
//! ```

use crate::document::AnnotationDocument;
use crate::error::MergeError;
use crate::parsing;
use std::fs;
use std::path::Path;

/// Source text plus the name it is reported under
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    name: String,
    source: String,
}

impl DocumentLoader {
    /// Read a file. Failures become [`MergeError::ReadFailure`] naming the path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| MergeError::ReadFailure {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(DocumentLoader {
            name: path.display().to_string(),
            source,
        })
    }

    pub fn from_string<N: Into<String>, S: Into<String>>(name: N, source: S) -> Self {
        DocumentLoader {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Parse the source into an [`AnnotationDocument`]
    pub fn parse(&self) -> Result<AnnotationDocument, MergeError> {
        let document =
            parsing::parse(&self.source).map_err(|err| MergeError::from_parse(&self.name, err))?;
        tracing::debug!(input = %self.name, nodes = document.len(), "parsed annotation document");
        Ok(document)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
