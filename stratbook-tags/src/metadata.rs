//! Nade metadata records as stored in tag files

use serde::{Deserialize, Serialize};

/// Tags describing one annotation file.
///
/// Every field is optional on input so hand-edited tag files with missing keys still load. `side`
/// and `site` are left out of the JSON when empty. Older tag files spell `site` as
/// `site_location`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NadeMetadata {
    pub file_name: String,
    pub file_path: String,
    pub image_path: String,
    pub nade_name: String,
    pub description: String,
    pub map_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub side: String,
    pub nade_type: String,
    #[serde(alias = "site_location", skip_serializing_if = "String::is_empty")]
    pub site: String,
}

impl NadeMetadata {
    /// Whether an image was found next to the annotation file
    pub fn has_image(&self) -> bool {
        !self.image_path.is_empty()
    }
}
