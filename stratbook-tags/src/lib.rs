//! # stratbook-tags
//!
//! The annotation library around the merge engine: finding annotation files on disk, drafting and
//! storing their tags, and selecting which of them to merge.
//!
//!     scanner     Walks an annotation directory and pairs text files with screenshots
//!     extract     Drafts tags from annotation text (map name, grenade type)
//!     store       The `{"nades": [...]}` tag file
//!     filter      Map, side, type and site filters over stored tags
//!     selection   The ordered list of files picked for a merge

pub mod error;
pub mod extract;
pub mod filter;
pub mod metadata;
pub mod scanner;
pub mod selection;
pub mod store;

pub use error::TagError;
pub use extract::{draft_all, draft_metadata, extract_grenade_type, extract_map_name};
pub use filter::{filter, FilterOptions, NadeType, Side, Site};
pub use metadata::NadeMetadata;
pub use scanner::{scan_annotations, AnnotationFile};
pub use selection::NadeList;
pub use store::{find_drafts, move_drafts, save_draft, TagStore};
