//! Annotation data model
//!
//! A parsed input file is an [`AnnotationDocument`]: the preamble plus its node records in file
//! order, each still carrying the identifier it was authored with. The result of a merge is a
//! [`MergedDocument`], whose nodes remember where they came from and which identifier they had
//! before renumbering.

/// Literal token that introduces every node record.
pub const MARKER: &str = "MapAnnotationNode";

/// Single character closing a well-formed document.
pub const TERMINATOR: char = '}';

/// One node record as it appears in its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationNode {
    /// Identifier as written after the marker. Unique within its file only.
    pub identifier: u64,
    /// Everything after the identifier digits up to the next marker.
    pub body: String,
}

impl AnnotationNode {
    pub fn new(identifier: u64, body: impl Into<String>) -> Self {
        Self {
            identifier,
            body: body.into(),
        }
    }
}

/// A parsed annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationDocument {
    pub preamble: String,
    pub nodes: Vec<AnnotationNode>,
}

impl AnnotationDocument {
    pub fn new(preamble: impl Into<String>, nodes: Vec<AnnotationNode>) -> Self {
        Self {
            preamble: preamble.into(),
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Identifiers in node order.
    pub fn identifiers(&self) -> impl Iterator<Item = u64> + '_ {
        self.nodes.iter().map(|node| node.identifier)
    }

    pub fn max_identifier(&self) -> Option<u64> {
        self.identifiers().max()
    }
}

/// A node after renumbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedNode {
    /// Index of the input document the node came from.
    pub origin: usize,
    pub old_identifier: u64,
    pub new_identifier: u64,
    /// Body with references rewritten through the origin document's map.
    pub body: String,
}

/// Output of a merge, ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergedDocument {
    pub preamble: String,
    pub nodes: Vec<MergedNode>,
}

impl MergedDocument {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = u64> + '_ {
        self.nodes.iter().map(|node| node.new_identifier)
    }

    /// Drops the merge bookkeeping, keeping the document as it will be written.
    pub fn to_document(&self) -> AnnotationDocument {
        AnnotationDocument {
            preamble: self.preamble.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|node| AnnotationNode::new(node.new_identifier, node.body.clone()))
                .collect(),
        }
    }
}
