//! Draft metadata extraction
//!
//! The annotation text already says which map it belongs to and what grenade it throws. Those two
//! fields are lifted out of the text; everything a person has to judge (description, side, site)
//! is left blank for them to fill in.

use crate::metadata::NadeMetadata;
use crate::scanner::AnnotationFile;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;

static MAP_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"de_\w+").unwrap());

static GRENADE_TYPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"GrenadeType = "([^"]+)""#).unwrap());

/// First `de_*` map name in `text`
pub fn extract_map_name(text: &str) -> Option<&str> {
    MAP_NAME_REGEX.find(text).map(|m| m.as_str())
}

/// Value of the first `GrenadeType = "..."` field in `text`
pub fn extract_grenade_type(text: &str) -> Option<&str> {
    GRENADE_TYPE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build draft metadata for `file` from its annotation text.
pub fn draft_metadata(file: &AnnotationFile, text: &str) -> NadeMetadata {
    let map_name = extract_map_name(text).unwrap_or_else(|| {
        tracing::warn!(path = %file.txt_path.display(), "no map name found");
        ""
    });
    let nade_type = extract_grenade_type(text).unwrap_or_else(|| {
        tracing::warn!(path = %file.txt_path.display(), "no grenade type found");
        ""
    });

    NadeMetadata {
        file_name: file.file_name(),
        file_path: file.txt_path.display().to_string(),
        image_path: file
            .png_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default(),
        nade_name: file.parent_name.clone(),
        map_name: map_name.to_string(),
        nade_type: nade_type.to_string(),
        ..Default::default()
    }
}

/// Read every file and draft its metadata. Unreadable files are logged and skipped.
pub fn draft_all(files: &[AnnotationFile]) -> Vec<NadeMetadata> {
    files
        .iter()
        .filter_map(|file| match fs::read_to_string(&file.txt_path) {
            Ok(text) => Some(draft_metadata(file, &text)),
            Err(err) => {
                tracing::warn!(
                    path = %file.txt_path.display(),
                    error = %err,
                    "skipping unreadable file"
                );
                None
            }
        })
        .collect()
}
