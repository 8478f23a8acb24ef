//! Serialization and persistence of annotation documents
//!
//! A document serializes as `preamble + (MARKER + identifier + body)* + TERMINATOR`, with nothing
//! inserted between records. Writing goes through a temporary file in the destination directory
//! that is renamed over the destination only once everything has been written, so a failed write
//! leaves whatever was there before.

use crate::document::{AnnotationDocument, MARKER, TERMINATOR};
use crate::error::MergeError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Render a document in the annotation file format.
pub fn serialize(document: &AnnotationDocument) -> String {
    let size = document.preamble.len()
        + document
            .nodes
            .iter()
            .map(|node| MARKER.len() + 20 + node.body.len())
            .sum::<usize>()
        + 1;
    let mut out = String::with_capacity(size);
    out.push_str(&document.preamble);
    for node in &document.nodes {
        out.push_str(MARKER);
        out.push_str(&node.identifier.to_string());
        out.push_str(&node.body);
    }
    out.push(TERMINATOR);
    out
}

/// Serialize `document` and atomically replace `destination` with it.
pub fn write_document(
    destination: impl AsRef<Path>,
    document: &AnnotationDocument,
) -> Result<PathBuf, MergeError> {
    let path = destination.as_ref().to_path_buf();
    let text = serialize(document);
    persist(&path, text.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote annotation document");
    Ok(path)
}

fn persist(path: &Path, bytes: &[u8]) -> Result<(), MergeError> {
    let failure = |message: String| MergeError::WriteFailure {
        path: path.to_path_buf(),
        message,
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = temp_file_for(path, parent).map_err(|err| failure(err.to_string()))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| failure(err.to_string()))?;
    temp.persist(path)
        .map_err(|err| failure(err.error.to_string()))?;
    Ok(())
}

/// Temporary file in `dir` carrying the permissions `destination` will end up with: the current
/// ones if it exists, `0644` otherwise.
fn temp_file_for(destination: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let temp = builder.tempfile_in(dir)?;
    if let Ok(metadata) = fs::metadata(destination) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(temp)
}
