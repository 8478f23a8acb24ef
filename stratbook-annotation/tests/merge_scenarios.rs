//! Merge scenarios over in-memory documents and the files in `tests/fixtures`
//!
//! Each test states its inputs in full so the expected renumbering can be read off directly.

use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use stratbook_annotation::{
    merge_files, merge_sources, parse, serialize, AllocationPolicy, MalformedReason, MergeEngine,
    MergeError, MergeOptions, SourceDocument, TokenBoundary,
};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn source(name: &str, text: &str) -> SourceDocument {
    SourceDocument::new(name, parse(text).expect("fixture text parses"))
}

fn merged_text(sources: &[SourceDocument], options: MergeOptions) -> String {
    serialize(&merge_sources(sources, options).expect("merge").to_document())
}

#[test]
fn two_headers_four_nodes() {
    let a = source("A", "HEADER\nMapAnnotationNode0FOO\nMapAnnotationNode1BAR}");
    let b = source("B", "HEADER2\nMapAnnotationNode0BAZ\nMapAnnotationNode1QUX}");

    let text = merged_text(&[a, b], MergeOptions::default());
    insta::assert_snapshot!(text, @r###"
    HEADER
    MapAnnotationNode0FOO
    MapAnnotationNode1BAR
    MapAnnotationNode2BAZ
    MapAnnotationNode3QUX}
    "###);
}

#[rstest]
#[case::sole_input(&[], 0, "seeAlso=0")]
#[case::after_three_nodes(&["H\nMapAnnotationNode0a MapAnnotationNode1b MapAnnotationNode2c}"], 3, "seeAlso=3")]
fn self_reference_follows_its_node(
    #[case] before: &[&str],
    #[case] expected_id: u64,
    #[case] expected_body: &str,
) {
    let mut sources: Vec<SourceDocument> = before
        .iter()
        .enumerate()
        .map(|(i, text)| source(&format!("before-{i}"), text))
        .collect();
    sources.push(source("A", "H\nMapAnnotationNode0seeAlso=0}"));

    let merged = merge_sources(&sources, MergeOptions::default()).unwrap();
    let last = merged.nodes.last().unwrap();
    assert_eq!(last.new_identifier, expected_id);
    assert_eq!(last.body, expected_body);
}

#[test]
fn same_old_identifier_in_two_documents_maps_independently() {
    let a = source("A", "MapAnnotationNode7ref=7 MapAnnotationNode8ref=7}");
    let b = source("B", "MapAnnotationNode7ref=7}");

    let merged = merge_sources(&[a, b], MergeOptions::default()).unwrap();
    let bodies: Vec<_> = merged.nodes.iter().map(|n| n.body.as_str()).collect();
    assert_eq!(bodies, vec!["ref=0 ", "ref=0", "ref=2"]);
}

#[test]
fn numerals_containing_identifiers_are_untouched() {
    let a = source("A", "MapAnnotationNode5x MapAnnotationNode45y}");
    let b = source("B", "MapAnnotationNode5seed=12345 self=5}");

    let merged = merge_sources(&[a, b], MergeOptions::default()).unwrap();
    assert_eq!(merged.nodes[2].body, "seed=12345 self=2");
}

#[test]
fn single_dense_document_is_a_no_op() {
    let text = "H\nMapAnnotationNode0a=1 MapAnnotationNode1b=0 MapAnnotationNode2c=2}";
    let merged = merged_text(&[source("A", text)], MergeOptions::default());
    assert_eq!(merged, text);
}

#[rstest]
#[case(AllocationPolicy::Sequential, vec![0, 1, 2, 3])]
#[case(AllocationPolicy::AppendAfterBase, vec![3, 5, 6, 7])]
fn policies_assign_expected_identifiers(
    #[case] policy: AllocationPolicy,
    #[case] expected: Vec<u64>,
) {
    let base = source("base", "H\nMapAnnotationNode3a MapAnnotationNode5b}");
    let extra = source("extra", "H2\nMapAnnotationNode0c MapAnnotationNode1d}");

    let merged = merge_sources(&[base, extra], MergeOptions::new(policy)).unwrap();
    assert_eq!(merged.identifiers().collect::<Vec<_>>(), expected);
}

#[test]
fn fixture_files_merge_with_relinked_parents() {
    let inputs = [fixture("window_smoke.txt"), fixture("b_stack_flash.txt")];
    let merged = MergeEngine::default().merge_paths(&inputs).unwrap();

    assert_eq!(merged.len(), 5);
    assert!(merged.preamble.contains("MapName = \"de_mirage\""));

    let flash = &merged.nodes[2..];
    assert!(flash[0].body.contains("ParentNode = 2"));
    assert!(flash[0].body.contains("Position = [ 10.0, 2.5, 1.0 ]"));
    assert!(flash[0].body.contains("Label = \"B2 stack\""));
    assert!(flash[1].body.contains("ParentNode = 2"));
    assert!(flash[2].body.contains("ParentNode = 3"));
    assert!(flash[2].body.contains("128 tick"));

    let window = &merged.nodes[..2];
    assert!(window[0].body.contains("Position = [ -1234.5, 56.0, -160.0 ]"));
    assert!(window[1].body.contains("ParentNode = 0"));
}

#[test]
fn digit_boundary_also_rewrites_inside_decimals() {
    let a = source("A", "MapAnnotationNode0a");
    let b = source("B", "MapAnnotationNode3pos=3.5 ref=3}");

    let lexical = merge_sources(&[a.clone(), b.clone()], MergeOptions::default()).unwrap();
    assert_eq!(lexical.nodes[1].body, "pos=3.5 ref=1");

    let options = MergeOptions::default().with_boundary(TokenBoundary::Digit);
    let digit = merge_sources(&[a, b], options).unwrap();
    assert_eq!(digit.nodes[1].body, "pos=1.5 ref=1");
}

#[test]
fn merge_files_writes_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("merged.txt");
    let inputs = [fixture("window_smoke.txt"), fixture("b_stack_flash.txt")];

    let report = merge_files(&inputs, &output, MergeOptions::default()).unwrap();
    assert_eq!(report.output, output);
    assert_eq!(report.summary.inputs, 2);
    assert_eq!(report.summary.nodes, 5);
    assert_eq!(report.summary.identifier_range, Some((0, 4)));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.ends_with('}'));
    assert_eq!(written.matches("MapAnnotationNode").count(), 5);
    for id in 0..5 {
        assert!(written.contains(&format!("MapAnnotationNode{id} =")));
    }
}

#[test]
fn malformed_input_aborts_without_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("merged.txt");
    fs::write(&output, "previous").unwrap();
    let inputs = [fixture("window_smoke.txt"), fixture("malformed.txt")];

    let err = merge_files(&inputs, &output, MergeOptions::default()).unwrap_err();
    match err {
        MergeError::MalformedRecord {
            input,
            record,
            reason,
        } => {
            assert!(input.ends_with("malformed.txt"));
            assert_eq!(record, 1);
            assert_eq!(reason, MalformedReason::MissingIdentifier);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn first_unreadable_input_is_reported() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("merged.txt");
    let missing_a = dir.path().join("missing-a.txt");
    let missing_b = dir.path().join("missing-b.txt");
    let inputs = [fixture("window_smoke.txt"), missing_a.clone(), missing_b];

    let err = merge_files(&inputs, &output, MergeOptions::default()).unwrap_err();
    assert!(matches!(err, MergeError::ReadFailure { ref path, .. } if *path == missing_a));
    assert!(!output.exists());
}
