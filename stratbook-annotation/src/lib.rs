//! # stratbook-annotation
//!
//! Parser and merge engine for map annotation files.
//!
//! An annotation file is a preamble followed by numbered node records and a closing `}`:
//!
//!     <preamble>MapAnnotationNode0<body>MapAnnotationNode1<body>...}
//!
//! Several independently authored files are merged into one by renumbering their nodes into a
//! single identifier space and rewriting the references each body makes to the old numbers.
//!
//! Layout
//!
//!     document     The data model (documents, nodes, merged nodes) and format constants
//!     parsing      Splits raw text into a preamble and node records
//!     allocation   Assigns new identifiers under a selectable policy
//!     tokens       The logos lexers used to find identifier references in bodies
//!     rewriting    Rewrites references in one pass using a document-local map
//!     merging      Orchestrates parsing, allocation and rewriting over ordered inputs
//!     writer       Serialization and atomic persistence
//!     loader       Reading a single file from disk

pub mod allocation;
pub mod document;
pub mod error;
pub mod loader;
pub mod merging;
pub mod parsing;
pub mod rewriting;
pub mod tokens;
pub mod writer;

pub use allocation::{allocate, AllocationOverflow, AllocationPolicy, IdentifierMap};
pub use document::{
    AnnotationDocument, AnnotationNode, MergedDocument, MergedNode, MARKER, TERMINATOR,
};
pub use error::{MalformedReason, MergeError, ParseError};
pub use loader::DocumentLoader;
pub use merging::{
    merge_files, merge_sources, MergeEngine, MergeOptions, MergeReport, MergeSummary,
    SourceDocument,
};
pub use parsing::parse;
pub use rewriting::{rewrite, rewrite_with};
pub use tokens::TokenBoundary;
pub use writer::{serialize, write_document};
