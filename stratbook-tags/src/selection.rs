//! Ordered nade selection
//!
//! The files a user picks for a strat, in the order they were picked. The list is what gets handed
//! to the merge engine, so its order is the merge order.

use std::path::{Path, PathBuf};
use stratbook_annotation::{merge_files, MergeError, MergeOptions, MergeReport};

/// Duplicate-free, ordered list of annotation file paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NadeList {
    files: Vec<PathBuf>,
}

impl NadeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already selected.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.files.push(path);
        true
    }

    /// Remove `path` if selected, keeping the order of the rest.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.files.iter().position(|f| f == path) {
            Some(index) => {
                self.files.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.iter().any(|f| f == path.as_ref())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Merge the selected files, in selection order, into `output`.
    pub fn merge_into(
        &self,
        output: impl AsRef<Path>,
        options: MergeOptions,
    ) -> Result<MergeReport, MergeError> {
        merge_files(&self.files, output, options)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for NadeList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut list = NadeList::new();
        for path in iter {
            list.add(path);
        }
        list
    }
}
