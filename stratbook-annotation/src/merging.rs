//! Merge engine
//!
//! Merging runs in three steps:
//!
//!     1. Load     every input is read and parsed. Reads run in parallel, results are put back in
//!                 input order, and the first failing input (in input order) aborts the merge.
//!     2. Number   one identifier map per document is allocated under the chosen policy.
//!     3. Emit     nodes are emitted in input order, then document order, each with its new
//!                 identifier and its body rewritten through its own document's map.
//!
//! The preamble of the first input becomes the preamble of the output; later preambles are
//! dropped. Nothing is written until the whole merge has succeeded.

use crate::allocation::{allocate, find_collision, AllocationPolicy};
use crate::document::{AnnotationDocument, MergedDocument, MergedNode};
use crate::error::{MalformedReason, MergeError};
use crate::loader::DocumentLoader;
use crate::rewriting::rewrite_with;
use crate::tokens::TokenBoundary;
use crate::writer::write_document;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Knobs of a single merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub policy: AllocationPolicy,
    pub boundary: TokenBoundary,
}

impl MergeOptions {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            boundary: TokenBoundary::default(),
        }
    }

    pub fn with_boundary(mut self, boundary: TokenBoundary) -> Self {
        self.boundary = boundary;
        self
    }
}

/// A parsed input and the name errors are reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub document: AnnotationDocument,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, document: AnnotationDocument) -> Self {
        Self {
            name: name.into(),
            document,
        }
    }
}

/// Counts describing a finished merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub inputs: usize,
    pub nodes: usize,
    /// Smallest and largest emitted identifier, if any node was emitted
    pub identifier_range: Option<(u64, u64)>,
}

impl MergeSummary {
    pub fn of(document: &MergedDocument, inputs: usize) -> Self {
        let identifier_range = document
            .identifiers()
            .min()
            .zip(document.identifiers().max());
        Self {
            inputs,
            nodes: document.len(),
            identifier_range,
        }
    }
}

/// Result of [`merge_files`]: what was written and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub output: PathBuf,
    pub document: MergedDocument,
    pub summary: MergeSummary,
}

/// Merges ordered inputs under fixed [`MergeOptions`]. Holds no state between merges.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MergeOptions {
        self.options
    }

    /// Read and parse `paths`, keeping input order.
    pub fn load<P>(&self, paths: &[P]) -> Result<Vec<SourceDocument>, MergeError>
    where
        P: AsRef<Path> + Sync,
    {
        let results: Vec<Result<SourceDocument, MergeError>> = paths
            .par_iter()
            .map(|path| -> Result<SourceDocument, MergeError> {
                let loader = DocumentLoader::from_path(path)?;
                let document = loader.parse()?;
                Ok(SourceDocument::new(loader.name(), document))
            })
            .collect();

        results.into_iter().collect()
    }

    /// Read, parse and merge `paths` in the given order.
    pub fn merge_paths<P>(&self, paths: &[P]) -> Result<MergedDocument, MergeError>
    where
        P: AsRef<Path> + Sync,
    {
        let sources = self.load(paths)?;
        self.merge_sources(&sources)
    }

    /// Merge already parsed documents in the given order.
    pub fn merge_sources(&self, sources: &[SourceDocument]) -> Result<MergedDocument, MergeError> {
        let Some(first) = sources.first() else {
            return Ok(MergedDocument::default());
        };
        for source in sources {
            check_unique(source)?;
        }

        let documents = sources.iter().map(|source| &source.document);
        let maps = allocate(documents.clone(), self.options.policy).map_err(|overflow| {
            MergeError::IdentifierOverflow {
                input: sources[overflow.document].name.clone(),
            }
        })?;

        if let Some(identifier) = find_collision(&maps) {
            return Err(MergeError::IdentifierCollision { identifier });
        }

        let mut nodes = Vec::with_capacity(documents.clone().map(AnnotationDocument::len).sum());
        for (origin, (document, map)) in documents.zip(&maps).enumerate() {
            for node in &document.nodes {
                let new_identifier = map.get(node.identifier).ok_or(
                    MergeError::IdentifierCollision {
                        identifier: node.identifier,
                    },
                )?;
                nodes.push(MergedNode {
                    origin,
                    old_identifier: node.identifier,
                    new_identifier,
                    body: rewrite_with(&node.body, map, self.options.boundary),
                });
            }
        }

        tracing::info!(
            inputs = sources.len(),
            nodes = nodes.len(),
            policy = %self.options.policy,
            "merged annotation documents"
        );

        Ok(MergedDocument {
            preamble: first.document.preamble.clone(),
            nodes,
        })
    }
}

/// Merge in-memory documents.
pub fn merge_sources(
    sources: &[SourceDocument],
    options: MergeOptions,
) -> Result<MergedDocument, MergeError> {
    MergeEngine::new(options).merge_sources(sources)
}

/// Read `inputs`, merge them and write the result to `output`.
///
/// All or nothing: on any error `output` is left as it was.
pub fn merge_files<P>(
    inputs: &[P],
    output: impl AsRef<Path>,
    options: MergeOptions,
) -> Result<MergeReport, MergeError>
where
    P: AsRef<Path> + Sync,
{
    let document = MergeEngine::new(options).merge_paths(inputs)?;
    let output = write_document(output, &document.to_document())?;
    let summary = MergeSummary::of(&document, inputs.len());
    Ok(MergeReport {
        output,
        document,
        summary,
    })
}

/// In-memory documents skip the parser, so their identifiers are checked here.
fn check_unique(source: &SourceDocument) -> Result<(), MergeError> {
    let mut seen = HashSet::with_capacity(source.document.len());
    for (record, identifier) in source.document.identifiers().enumerate() {
        if !seen.insert(identifier) {
            return Err(MergeError::MalformedRecord {
                input: source.name.clone(),
                record,
                reason: MalformedReason::DuplicateIdentifier(identifier),
            });
        }
    }
    Ok(())
}
