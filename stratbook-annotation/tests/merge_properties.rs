//! Property tests for merging
//!
//! Generated documents use arbitrary distinct identifiers in arbitrary order. Each node refers to
//! the next node of its own document, so every body carries exactly one live reference.

use proptest::prelude::*;
use std::collections::HashSet;
use stratbook_annotation::{
    merge_sources, parse, serialize, AllocationPolicy, MergeOptions, MergedDocument,
    SourceDocument,
};

fn document_text(index: usize, ids: &[u64]) -> String {
    let mut text = format!("HEADER{}\n", index);
    for (i, id) in ids.iter().enumerate() {
        let target = ids[(i + 1) % ids.len()];
        text.push_str(&format!("MapAnnotationNode{} ref={}\n", id, target));
    }
    text.push('}');
    text
}

fn identifiers() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(0u64..5000, 0..8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

fn inputs() -> impl Strategy<Value = Vec<Vec<u64>>> {
    prop::collection::vec(identifiers(), 1..6)
}

fn sources(inputs: &[Vec<u64>]) -> Vec<SourceDocument> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, ids)| {
            let doc = parse(&document_text(i, ids)).expect("generated text parses");
            SourceDocument::new(format!("doc{}", i), doc)
        })
        .collect()
}

fn new_identifier_of(merged: &MergedDocument, origin: usize, old: u64) -> Option<u64> {
    merged
        .nodes
        .iter()
        .find(|node| node.origin == origin && node.old_identifier == old)
        .map(|node| node.new_identifier)
}

fn policy() -> impl Strategy<Value = AllocationPolicy> {
    prop_oneof![
        Just(AllocationPolicy::Sequential),
        Just(AllocationPolicy::AppendAfterBase),
    ]
}

proptest! {
    #[test]
    fn node_count_is_preserved(inputs in inputs(), policy in policy()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::new(policy)).unwrap();
        let expected: usize = inputs.iter().map(Vec::len).sum();
        prop_assert_eq!(merged.len(), expected);
    }

    #[test]
    fn emitted_identifiers_are_unique(inputs in inputs(), policy in policy()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::new(policy)).unwrap();
        let unique: HashSet<u64> = merged.identifiers().collect();
        prop_assert_eq!(unique.len(), merged.len());
    }

    #[test]
    fn sequential_identifiers_are_dense(inputs in inputs()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::default()).unwrap();
        let ids: Vec<u64> = merged.identifiers().collect();
        let dense: Vec<u64> = (0..merged.len() as u64).collect();
        prop_assert_eq!(ids, dense);
    }

    #[test]
    fn emission_follows_input_then_document_order(inputs in inputs(), policy in policy()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::new(policy)).unwrap();
        let emitted: Vec<(usize, u64)> = merged
            .nodes
            .iter()
            .map(|node| (node.origin, node.old_identifier))
            .collect();
        let expected: Vec<(usize, u64)> = inputs
            .iter()
            .enumerate()
            .flat_map(|(origin, ids)| ids.iter().map(move |id| (origin, *id)))
            .collect();
        prop_assert_eq!(emitted, expected);
    }

    #[test]
    fn references_follow_their_targets(inputs in inputs(), policy in policy()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::new(policy)).unwrap();
        for node in &merged.nodes {
            let ids = &inputs[node.origin];
            let position = ids.iter().position(|id| *id == node.old_identifier).unwrap();
            let target = ids[(position + 1) % ids.len()];
            let new_target = new_identifier_of(&merged, node.origin, target).unwrap();
            prop_assert_eq!(&node.body, &format!(" ref={}\n", new_target));
        }
    }

    #[test]
    fn preamble_comes_from_the_first_input(inputs in inputs(), policy in policy()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::new(policy)).unwrap();
        prop_assert_eq!(merged.preamble.as_str(), "HEADER0\n");
    }

    #[test]
    fn merging_a_merged_document_again_changes_nothing(inputs in inputs()) {
        let merged = merge_sources(&sources(&inputs), MergeOptions::default()).unwrap();
        let text = serialize(&merged.to_document());

        let again = SourceDocument::new("merged", parse(&text).unwrap());
        let remerged = merge_sources(&[again], MergeOptions::default()).unwrap();
        prop_assert_eq!(serialize(&remerged.to_document()), text);
    }

    #[test]
    fn reordering_inputs_keeps_each_document_intact(inputs in inputs()) {
        let forward = merge_sources(&sources(&inputs), MergeOptions::default()).unwrap();
        let mut reversed_inputs = inputs.clone();
        reversed_inputs.reverse();
        let reversed = merge_sources(&sources(&reversed_inputs), MergeOptions::default()).unwrap();

        let last = inputs.len() - 1;
        for origin in 0..inputs.len() {
            prop_assert_eq!(
                local_links(&forward, origin),
                local_links(&reversed, last - origin)
            );
        }
    }
}

/// Each node of `origin` as (position in its block, position of its reference target), with
/// positions counted from the first identifier of the block.
fn local_links(merged: &MergedDocument, origin: usize) -> Vec<(u64, u64)> {
    let block: Vec<_> = merged.nodes.iter().filter(|node| node.origin == origin).collect();
    let Some(start) = block.first().map(|node| node.new_identifier) else {
        return Vec::new();
    };
    block
        .iter()
        .map(|node| {
            let target: u64 = node.body.trim().trim_start_matches("ref=").parse().unwrap();
            (node.new_identifier - start, target - start)
        })
        .collect()
}
