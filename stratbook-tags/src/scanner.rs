//! Annotation directory scanner
//!
//! An annotation library is a directory tree where each nade lives in its own folder:
//!
//!     annotations/
//!         window-smoke/
//!             window.txt      the annotation file
//!             window.png      optional screenshot
//!
//! The folder name becomes the nade name. A `.txt` and a `.png` pair up when they share a stem and
//! a directory.

use crate::error::TagError;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One annotation file found by [`scan_annotations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFile {
    /// File name without extension
    pub stem: String,
    pub txt_path: PathBuf,
    pub png_path: Option<PathBuf>,
    /// Name of the directory holding the file
    pub parent_name: String,
}

impl AnnotationFile {
    /// File name of the annotation text file
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.stem)
    }
}

#[derive(Default)]
struct Pair {
    txt: Option<PathBuf>,
    png: Option<PathBuf>,
}

/// Walk `dir` recursively and collect its annotation files, sorted by stem.
pub fn scan_annotations(dir: impl AsRef<Path>) -> Result<Vec<AnnotationFile>, TagError> {
    let root = dir.as_ref();
    if !root.is_dir() {
        return Err(TagError::Scan {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut pairs: BTreeMap<PathBuf, Pair> = BTreeMap::new();
    for entry in WalkBuilder::new(root)
        .follow_links(true)
        .standard_filters(false) // no gitignore or hidden-file filtering
        .build()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        if ext != "txt" && ext != "png" {
            continue;
        }
        let pair = pairs.entry(path.with_extension("")).or_default();
        if ext == "txt" {
            pair.txt = Some(path.to_path_buf());
        } else {
            pair.png = Some(path.to_path_buf());
        }
    }

    let mut files: Vec<AnnotationFile> = pairs
        .into_iter()
        .filter_map(|(key, pair)| {
            let Some(txt_path) = pair.txt else {
                tracing::warn!(path = %key.display(), "image without annotation file, skipping");
                return None;
            };
            Some(AnnotationFile {
                stem: file_stem(&txt_path),
                parent_name: parent_name(&txt_path),
                png_path: pair.png,
                txt_path,
            })
        })
        .collect();

    files.sort_by(|a, b| a.stem.cmp(&b.stem).then_with(|| a.txt_path.cmp(&b.txt_path)));
    tracing::debug!(root = %root.display(), files = files.len(), "scanned annotation directory");
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
