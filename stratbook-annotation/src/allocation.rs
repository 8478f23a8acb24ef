//! Identifier allocation
//!
//! Produces one [`IdentifierMap`] per input document. Maps are built walking documents in input
//! order and nodes in document order, so the emission order of a merge is also the order in which
//! new identifiers are handed out.

use crate::document::AnnotationDocument;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// How new identifiers are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    /// Number every node `0, 1, 2, ...` across all documents.
    #[default]
    Sequential,
    /// Keep the first document's identifiers and number every later node from its maximum + 1.
    AppendAfterBase,
}

impl AllocationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationPolicy::Sequential => "sequential",
            AllocationPolicy::AppendAfterBase => "append-after-base",
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(AllocationPolicy::Sequential),
            "append-after-base" => Ok(AllocationPolicy::AppendAfterBase),
            other => Err(format!(
                "unknown allocation policy '{}' (expected 'sequential' or 'append-after-base')",
                other
            )),
        }
    }
}

/// Old-to-new identifier mapping of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifierMap {
    /// Pairs in node order
    entries: Vec<(u64, u64)>,
    lookup: HashMap<u64, u64>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `old -> new`. Returns false (and changes nothing) if `old` is already mapped.
    pub fn insert(&mut self, old: u64, new: u64) -> bool {
        if self.lookup.contains_key(&old) {
            return false;
        }
        self.lookup.insert(old, new);
        self.entries.push((old, new));
        true
    }

    pub fn get(&self, old: u64) -> Option<u64> {
        self.lookup.get(&old).copied()
    }

    /// `(old, new)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn new_identifiers(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|&(_, new)| new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every identifier maps to itself, i.e. rewriting is a no-op.
    pub fn is_identity(&self) -> bool {
        self.entries.iter().all(|(old, new)| old == new)
    }
}

impl FromIterator<(u64, u64)> for IdentifierMap {
    fn from_iter<T: IntoIterator<Item = (u64, u64)>>(iter: T) -> Self {
        let mut map = IdentifierMap::new();
        for (old, new) in iter {
            map.insert(old, new);
        }
        map
    }
}

/// Allocation ran past `u64::MAX` while numbering document `document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationOverflow {
    pub document: usize,
}

/// Build the identifier map of every document under `policy`.
///
/// The returned vector is parallel to `documents`.
pub fn allocate<'a, I>(
    documents: I,
    policy: AllocationPolicy,
) -> Result<Vec<IdentifierMap>, AllocationOverflow>
where
    I: IntoIterator<Item = &'a AnnotationDocument>,
{
    let mut documents = documents.into_iter();
    match policy {
        AllocationPolicy::Sequential => number_from(documents, Some(0), 0),
        AllocationPolicy::AppendAfterBase => {
            let Some(base) = documents.next() else {
                return Ok(Vec::new());
            };
            let base_map: IdentifierMap = base.identifiers().map(|id| (id, id)).collect();
            let next = base
                .max_identifier()
                .map_or(Some(0), |max| max.checked_add(1));
            let mut maps = vec![base_map];
            maps.extend(number_from(documents, next, 1)?);
            Ok(maps)
        }
    }
}

/// Number every node of `documents` consecutively starting at `next`; `None` means the
/// identifier space is already used up. `offset` is the caller's index of the first document,
/// used for error reporting.
fn number_from<'a>(
    documents: impl Iterator<Item = &'a AnnotationDocument>,
    mut next: Option<u64>,
    offset: usize,
) -> Result<Vec<IdentifierMap>, AllocationOverflow> {
    let mut maps = Vec::new();

    for (index, document) in documents.enumerate() {
        let mut map = IdentifierMap::new();
        for old in document.identifiers() {
            let new = next.ok_or(AllocationOverflow {
                document: offset + index,
            })?;
            map.insert(old, new);
            next = new.checked_add(1);
        }
        maps.push(map);
    }

    Ok(maps)
}

/// Find an identifier assigned by more than one map entry, if any.
pub fn find_collision(maps: &[IdentifierMap]) -> Option<u64> {
    let mut seen = HashSet::new();
    maps.iter()
        .flat_map(|map| map.new_identifiers())
        .find(|&id| !seen.insert(id))
}
