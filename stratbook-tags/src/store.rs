//! Tag store
//!
//! The library's tags live in one JSON file shaped `{"nades": [ ... ]}`. Individual drafts are
//! saved as `<nade_name>.json` while they are being filled in. [`find_drafts`] collects them,
//! [`TagStore::merge_files`] folds them into the store and [`move_drafts`] files each one away in
//! its nade's folder.

use crate::error::TagError;
use crate::filter::FilterOptions;
use crate::metadata::NadeMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// All tagged nades of a library, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStore {
    #[serde(default)]
    nades: Vec<NadeMetadata>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tag file. A missing or blank file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TagError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no tag file, starting empty");
                return Ok(Self::new());
            }
            Err(err) => return Err(TagError::io(path, err)),
        };
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let store: TagStore =
            serde_json::from_str(&text).map_err(|err| TagError::json(path, err))?;
        tracing::debug!(path = %path.display(), nades = store.len(), "loaded tag file");
        Ok(store)
    }

    /// Write the store as pretty-printed JSON, replacing `path` atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TagError> {
        write_json(path.as_ref(), self)
    }

    pub fn nades(&self) -> &[NadeMetadata] {
        &self.nades
    }

    pub fn len(&self) -> usize {
        self.nades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nades.is_empty()
    }

    /// Add a nade unless one with the same `nade_name` is already stored.
    pub fn insert(&mut self, nade: NadeMetadata) -> bool {
        if self.nades.iter().any(|n| n.nade_name == nade.nade_name) {
            tracing::debug!(nade = %nade.nade_name, "nade already tagged, skipping");
            return false;
        }
        self.nades.push(nade);
        true
    }

    /// Read single-nade JSON files and insert them. Returns how many were new.
    ///
    /// Every file is read and parsed before the store changes, so a bad file leaves it untouched.
    pub fn merge_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, TagError> {
        let drafts = paths
            .iter()
            .map(|path| read_draft(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(drafts
            .into_iter()
            .map(|draft| self.insert(draft))
            .filter(|inserted| *inserted)
            .count())
    }

    /// Annotation file paths of the nades matching `options`, ready to hand to a merge.
    pub fn paths_for(&self, options: &FilterOptions) -> Vec<PathBuf> {
        crate::filter::filter(&self.nades, options)
            .into_iter()
            .map(|nade| PathBuf::from(&nade.file_path))
            .collect()
    }

    /// Distinct map names in first-seen order
    pub fn unique_maps(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nades
            .iter()
            .map(|nade| nade.map_name.as_str())
            .filter(|map| seen.insert(*map))
            .collect()
    }
}

/// Save one draft as `<nade_name>.json` inside `dir`.
pub fn save_draft(dir: impl AsRef<Path>, nade: &NadeMetadata) -> Result<PathBuf, TagError> {
    let path = dir.as_ref().join(format!("{}.json", nade.nade_name));
    write_json(&path, nade)?;
    Ok(path)
}

/// File names that are never drafts even though they are JSON
const RESERVED_FILES: [&str; 2] = ["tags.json", "settings.json"];

/// Draft files (`*.json`) directly inside `dir`, sorted by path. `tags.json` and `settings.json`
/// are skipped.
pub fn find_drafts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, TagError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|err| TagError::io(dir, err))?;
    let mut drafts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| TagError::io(dir, err))?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let reserved = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| RESERVED_FILES.contains(&name));
        if path.is_file() && is_json && !reserved {
            drafts.push(path);
        }
    }
    drafts.sort();
    Ok(drafts)
}

/// Move every `<name>.json` draft to `<annotation_path>/<name>/<name>.json`, creating the folder
/// when needed. Returns the new locations in the order given.
pub fn move_drafts<P: AsRef<Path>>(
    annotation_path: impl AsRef<Path>,
    drafts: &[P],
) -> Result<Vec<PathBuf>, TagError> {
    let root = annotation_path.as_ref();
    let mut moved = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let draft = draft.as_ref();
        let (Some(stem), Some(name)) = (draft.file_stem(), draft.file_name()) else {
            return Err(TagError::Scan {
                path: draft.to_path_buf(),
                message: "not a draft file".to_string(),
            });
        };
        let folder = root.join(stem);
        fs::create_dir_all(&folder).map_err(|err| TagError::io(&folder, err))?;
        let destination = folder.join(name);
        fs::rename(draft, &destination).map_err(|err| TagError::io(draft, err))?;
        tracing::debug!(from = %draft.display(), to = %destination.display(), "moved draft");
        moved.push(destination);
    }
    Ok(moved)
}

fn read_draft(path: &Path) -> Result<NadeMetadata, TagError> {
    let text = fs::read_to_string(path).map_err(|err| TagError::io(path, err))?;
    serde_json::from_str(&text).map_err(|err| TagError::json(path, err))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TagError> {
    let json = serde_json::to_string_pretty(value).map_err(|err| TagError::json(path, err))?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = temp_file_for(path, parent).map_err(|err| TagError::io(path, err))?;
    temp.write_all(json.as_bytes())
        .map_err(|err| TagError::io(path, err))?;
    temp.persist(path)
        .map_err(|err| TagError::io(path, err.error))?;
    tracing::debug!(path = %path.display(), "wrote tag file");
    Ok(())
}

/// Temporary file in `dir` with the permissions of `destination`, or `0644` for a new file.
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
