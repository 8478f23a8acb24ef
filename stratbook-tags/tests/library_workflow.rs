//! Scan, tag, select and merge a small annotation library on disk

use std::fs;
use std::path::Path;
use stratbook_annotation::MergeOptions;
use stratbook_tags::{
    draft_all, scan_annotations, FilterOptions, NadeList, NadeType, Side, TagStore,
};
use tempfile::tempdir;

fn annotation(map: &str, grenade: &str) -> String {
    format!(
        "{{\n    MapName = \"{map}\"\n    MapAnnotationNode0 =\n    {{\n        GrenadeType = \"{grenade}\"\n        ParentNode = 0\n    }}\n}}\n"
    )
}

fn write_nade(root: &Path, folder: &str, stem: &str, map: &str, grenade: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{stem}.txt")), annotation(map, grenade)).unwrap();
}

#[test]
fn scanned_drafts_select_and_merge() {
    let lib = tempdir().unwrap();
    write_nade(lib.path(), "window-smoke", "window", "de_mirage", "smoke");
    write_nade(lib.path(), "stairs-flash", "stairs", "de_mirage", "flash");
    write_nade(lib.path(), "banana-molly", "banana", "de_inferno", "molotov");

    let files = scan_annotations(lib.path()).unwrap();
    let mut drafts = draft_all(&files);
    assert_eq!(drafts.len(), 3);
    for draft in &mut drafts {
        draft.side = "T".to_string();
    }

    let tags_path = lib.path().join("tags.json");
    let mut store = TagStore::load(&tags_path).unwrap();
    for draft in drafts {
        store.insert(draft);
    }
    store.save(&tags_path).unwrap();

    let store = TagStore::load(&tags_path).unwrap();
    assert_eq!(store.unique_maps(), vec!["de_inferno", "de_mirage"]);

    let options = FilterOptions::for_map("de_mirage").with_side(Side::T);
    let selection: NadeList = store.paths_for(&options).into_iter().collect();
    assert_eq!(selection.len(), 2);

    let output = lib.path().join("merged.txt");
    let report = selection
        .merge_into(&output, MergeOptions::default())
        .unwrap();
    assert_eq!(report.summary.nodes, 2);

    let merged = fs::read_to_string(&output).unwrap();
    assert!(merged.contains("MapAnnotationNode0 ="));
    assert!(merged.contains("MapAnnotationNode1 ="));
    assert!(merged.contains("ParentNode = 1"));

    let flashes = FilterOptions::for_map("de_mirage").with_type(NadeType::Flash);
    assert_eq!(store.paths_for(&flashes).len(), 1);
}
